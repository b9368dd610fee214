//! Cheat sheet view state
//!
//! [`CheatSheetView`] owns the user-controlled state of one table (sort and
//! page) and the values derived from it:
//!
//! ```text
//! sheet data ──┬─> cheat sheet metadata
//!              │
//! sort state ──┴─> sorted rows ──┬─> rows on page
//!                                │
//! current page ──────────────────┤
//! page size ─────────────────────┴─> page count
//! ```
//!
//! Derived values follow combine-latest rules, so nothing is shown until the
//! first data load arrives.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use futures::StreamExt;
use log::{debug, warn};

use crate::config::ViewConfig;
use crate::error::{ConfigError, FieldError, PageError};
use crate::model::{CheatSheet, FieldDef, SheetData, SheetRow};
use crate::provider::DataProvider;
use crate::query::{PageState, SortState, page_count, paginate, sort_by_state};
use crate::reactive::{ReadSignal, Signal, combine2, combine3};

/// Sortable, paginated view over one cheat sheet.
///
/// # Example
///
/// ```
/// use cheatsheet_lib::config::ViewConfig;
/// use cheatsheet_lib::model::{CheatSheet, PayoffRecord, SheetData};
/// use cheatsheet_lib::view::CheatSheetView;
///
/// let view = CheatSheetView::<PayoffRecord>::new(ViewConfig::default()).unwrap();
/// assert!(view.data_on_page().get().is_none());
///
/// view.load(SheetData::new(
///     CheatSheet::new("Payoffs", ""),
///     vec![PayoffRecord::new("B"), PayoffRecord::new("A")],
/// ));
/// view.adjust_sort("product").unwrap();
///
/// let rows = view.data_on_page().get().unwrap();
/// assert_eq!(rows[0].product, "A");
/// ```
pub struct CheatSheetView<R: SheetRow> {
    name: String,
    data: Signal<SheetData<R>>,
    sort: Signal<SortState>,
    current_page: Signal<NonZeroUsize>,
    page_size: Signal<NonZeroUsize>,
    cheat_sheet: Signal<CheatSheet>,
    sorted: Signal<Vec<R>>,
    data_on_page: Signal<Vec<R>>,
    page_count: Signal<usize>,
}

impl<R: SheetRow> CheatSheetView<R> {
    /// Creates a view from its configuration.
    ///
    /// Fails if the row type's registry is inconsistent, the sort key is not
    /// a field of `R`, or a page value is zero.
    pub fn new(config: ViewConfig) -> Result<Self, ConfigError> {
        R::validate_registry()?;
        let sort_state = config.sort_state::<R>()?;
        let page_state = config.page_state()?;

        let data = Signal::<SheetData<R>>::empty();
        let sort = Signal::new(sort_state);
        let current_page = Signal::new(page_state.current_page());
        let page_size = Signal::new(page_state.page_size());

        let cheat_sheet = data.map(|data| data.cheat_sheet.clone());
        let sorted = combine2(&data, &sort, |data, sort| {
            sort_by_state(data.records(), sort)
        });
        let data_on_page = combine3(&sorted, &current_page, &page_size, |rows, page, size| {
            paginate(rows, *page, *size).to_vec()
        });
        let page_count = combine2(&sorted, &page_size, |rows, size| page_count(rows.len(), *size));

        Ok(Self {
            name: config.name,
            data,
            sort,
            current_page,
            page_size,
            cheat_sheet,
            sorted,
            data_on_page,
            page_count,
        })
    }

    /// Returns the sheet name requested from data providers.
    pub fn name(&self) -> &str {
        &self.name
    }

    // =========================================================================
    // Data loading
    // =========================================================================

    /// Replaces the loaded sheet data.
    pub fn load(&self, data: impl Into<Arc<SheetData<R>>>) {
        let data = data.into();
        debug!(
            "Loaded {} rows for sheet '{}'",
            data.records().len(),
            self.name
        );
        self.data.replace(data);
    }

    /// Feeds every emission of the provider's stream into the view.
    ///
    /// Runs until the stream ends and returns the number of successful
    /// loads. Failed emissions are logged and the last good data stays in
    /// place.
    pub async fn bind<P>(&self, provider: &P) -> usize
    where
        P: DataProvider<R> + ?Sized,
    {
        let mut stream = provider.cheat_sheet_data(&self.name);
        let mut loads = 0;

        while let Some(item) = stream.next().await {
            match item {
                Ok(data) => {
                    self.load(data);
                    loads += 1;
                }
                Err(err) => warn!("Data load for sheet '{}' failed: {}", self.name, err),
            }
        }
        loads
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Handles activation of a column header.
    ///
    /// Activating the current sort column flips the direction; any other
    /// column becomes the sort column, ascending. Unknown keys are rejected
    /// and leave the sort state unchanged.
    pub fn adjust_sort(&self, key: &str) -> Result<(), FieldError> {
        let def = R::field_def(key).inspect_err(|err| {
            warn!("Ignoring sort request: {}", err);
        })?;

        self.sort.update(|sort| sort.toggle(def.name));
        if let Some(sort) = self.sort.get() {
            debug!("Sorting '{}' by {} {}", self.name, sort.key(), sort.direction());
        }
        Ok(())
    }

    /// Shows the given 1-based page. Pages past the end show no rows.
    pub fn set_current_page(&self, page: usize) -> Result<(), PageError> {
        let page = NonZeroUsize::new(page).ok_or(PageError::ZeroPage)?;
        self.current_page.set(page);
        Ok(())
    }

    /// Sets the number of rows per page. The current page is kept.
    pub fn set_page_size(&self, size: usize) -> Result<(), PageError> {
        let size = NonZeroUsize::new(size).ok_or(PageError::ZeroPageSize)?;
        self.page_size.set(size);
        Ok(())
    }

    /// Moves to the next page if there is one. Returns `true` if it moved.
    pub fn next_page(&self) -> bool {
        let Some(count) = self.page_count.get() else {
            return false;
        };
        let current = self.page_state().current_page();
        if current.get() >= *count {
            return false;
        }
        self.current_page.set(current.saturating_add(1));
        true
    }

    /// Moves to the previous page if there is one. Returns `true` if it moved.
    pub fn previous_page(&self) -> bool {
        if !self.data.has_value() {
            return false;
        }
        let current = self.page_state().current_page();
        let Some(previous) = NonZeroUsize::new(current.get() - 1) else {
            return false;
        };
        self.current_page.set(previous);
        true
    }

    // =========================================================================
    // Outputs
    // =========================================================================

    /// Field identifiers rendered as table columns, in display order.
    pub fn displayed_columns(&self) -> &'static [&'static str] {
        R::DISPLAYED_COLUMNS
    }

    /// Definitions of the displayed columns, for header labels.
    pub fn columns(&self) -> Vec<&'static FieldDef<R>> {
        R::DISPLAYED_COLUMNS
            .iter()
            .filter_map(|name| R::field_def(name).ok())
            .collect()
    }

    /// Rows visible on the current page.
    pub fn data_on_page(&self) -> ReadSignal<Vec<R>> {
        self.data_on_page.read_only()
    }

    /// All rows in the current sort order.
    pub fn sorted(&self) -> ReadSignal<Vec<R>> {
        self.sorted.read_only()
    }

    /// Metadata of the loaded sheet.
    pub fn cheat_sheet(&self) -> ReadSignal<CheatSheet> {
        self.cheat_sheet.read_only()
    }

    /// Current sort column and direction.
    pub fn sort_state(&self) -> ReadSignal<SortState> {
        self.sort.read_only()
    }

    /// Number of pages the loaded rows fill.
    pub fn page_count(&self) -> ReadSignal<usize> {
        self.page_count.read_only()
    }

    /// Current page and page size.
    pub fn page_state(&self) -> PageState {
        let current = self.current_page.get().map_or(NonZeroUsize::MIN, |p| *p);
        let size = self
            .page_size
            .get()
            .map_or(crate::query::DEFAULT_PAGE_SIZE, |s| *s);
        PageState::from_parts(current, size)
    }
}

impl<R: SheetRow> fmt::Debug for CheatSheetView<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheatSheetView")
            .field("name", &self.name)
            .field("sort", &self.sort.get())
            .field("page", &self.page_state())
            .field("loaded", &self.data.has_value())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PayoffRecord;
    use crate::query::Direction;

    fn row(product: &str, speed: &str) -> PayoffRecord {
        PayoffRecord::new(product)
            .with_field("payoff_speed_prod", speed)
            .unwrap()
    }

    fn scenario() -> SheetData<PayoffRecord> {
        SheetData::new(
            CheatSheet::new("Productivity module payoffs", "Payoff times"),
            vec![row("A", "3"), row("B", "1"), row("C", "2")],
        )
    }

    fn shown(view: &CheatSheetView<PayoffRecord>) -> Vec<String> {
        view.data_on_page()
            .get()
            .map(|rows| rows.iter().map(|r| r.product.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_scenario_pages() {
        let config = ViewConfig::default().with_page_size(2);
        let view = CheatSheetView::<PayoffRecord>::new(config).unwrap();
        view.load(scenario());

        assert_eq!(shown(&view), vec!["B", "C"]);
        view.set_current_page(2).unwrap();
        assert_eq!(shown(&view), vec!["A"]);
        view.set_current_page(3).unwrap();
        assert!(shown(&view).is_empty());
        assert!(view.data_on_page().has_value());
    }

    #[test]
    fn test_nothing_shown_before_data() {
        let view = CheatSheetView::<PayoffRecord>::new(ViewConfig::default()).unwrap();

        view.adjust_sort("product").unwrap();
        view.set_current_page(2).unwrap();
        assert!(!view.data_on_page().has_value());
        assert!(!view.cheat_sheet().has_value());
        assert!(!view.page_count().has_value());
    }

    #[test]
    fn test_adjust_sort_toggles() {
        let view = CheatSheetView::<PayoffRecord>::new(ViewConfig::default()).unwrap();
        let sort = view.sort_state();

        view.adjust_sort("payoff_speed_prod").unwrap();
        assert_eq!(sort.get().unwrap().direction(), Direction::Desc);

        view.adjust_sort("payoff_speed_prod").unwrap();
        assert_eq!(sort.get().unwrap().direction(), Direction::Asc);

        view.adjust_sort("payoff_speed_prod").unwrap();
        view.adjust_sort("product").unwrap();
        let state = sort.get().unwrap();
        assert_eq!(state.key(), "product");
        assert_eq!(state.direction(), Direction::Asc);
    }

    #[test]
    fn test_adjust_sort_rejects_unknown_key() {
        let view = CheatSheetView::<PayoffRecord>::new(ViewConfig::default()).unwrap();
        let before = view.sort_state().get().unwrap();

        let err = view.adjust_sort("price").unwrap_err();
        assert_eq!(err, FieldError::unknown("price"));
        assert_eq!(view.sort_state().get().unwrap(), before);
        assert_eq!(view.sort_state().version(), 1);
    }

    #[test]
    fn test_sort_change_resorts_current_page() {
        let view = CheatSheetView::<PayoffRecord>::new(ViewConfig::default()).unwrap();
        view.load(scenario());

        view.adjust_sort("payoff_speed_prod").unwrap();
        assert_eq!(shown(&view), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_reload_replaces_rows() {
        let view = CheatSheetView::<PayoffRecord>::new(ViewConfig::default()).unwrap();
        view.load(scenario());

        view.load(SheetData::new(
            CheatSheet::new("Updated", ""),
            vec![row("Z", "0")],
        ));
        assert_eq!(shown(&view), vec!["Z"]);
        assert_eq!(view.cheat_sheet().get().unwrap().title, "Updated");
    }

    #[test]
    fn test_page_navigation() {
        let config = ViewConfig::default().with_page_size(1);
        let view = CheatSheetView::<PayoffRecord>::new(config).unwrap();
        assert!(!view.next_page());
        assert!(!view.previous_page());

        view.load(scenario());
        assert_eq!(*view.page_count().get().unwrap(), 3);
        assert!(!view.previous_page());
        assert!(view.next_page());
        assert!(view.next_page());
        assert!(!view.next_page());
        assert_eq!(view.page_state().current_page().get(), 3);
        assert_eq!(shown(&view), vec!["A"]);
        assert!(view.previous_page());
        assert_eq!(shown(&view), vec!["C"]);
    }

    #[test]
    fn test_zero_page_values_rejected() {
        let view = CheatSheetView::<PayoffRecord>::new(ViewConfig::default()).unwrap();

        assert_eq!(view.set_current_page(0), Err(PageError::ZeroPage));
        assert_eq!(view.set_page_size(0), Err(PageError::ZeroPageSize));
        assert_eq!(view.page_state(), PageState::default());
    }

    #[test]
    fn test_invalid_config() {
        let err = CheatSheetView::<PayoffRecord>::new(
            ViewConfig::default().with_sort("price", Direction::Asc),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Field(_)));

        let err = CheatSheetView::<PayoffRecord>::new(ViewConfig::default().with_current_page(0))
            .unwrap_err();
        assert_eq!(err, ConfigError::Page(PageError::ZeroPage));
    }

    #[test]
    fn test_columns_are_static() {
        let view = CheatSheetView::<PayoffRecord>::new(ViewConfig::default()).unwrap();
        let before = view.displayed_columns();

        view.adjust_sort("description").unwrap();
        assert_eq!(view.displayed_columns(), before);
        assert_eq!(view.columns()[0].label, "Product");
        assert_eq!(view.columns().len(), before.len());
    }
}
