//! View configuration

use serde::Deserialize;

use crate::error::{FieldError, PageError};
use crate::model::SheetRow;
use crate::query::{Direction, PageState, SortState};

/// Name of the sheet shown when none is configured.
pub const DEFAULT_SHEET_NAME: &str = "productivity-module-payoffs";

/// Initial state of a cheat sheet view.
///
/// Values are checked when the view is built, not here, because the valid
/// sort keys depend on the row type.
///
/// # Example
///
/// ```
/// use cheatsheet_lib::config::ViewConfig;
/// use cheatsheet_lib::query::Direction;
///
/// let config = ViewConfig::default()
///     .with_sort("payoff_prod", Direction::Desc)
///     .with_page_size(25);
///
/// assert_eq!(config.current_page, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Sheet name requested from the data provider.
    ///
    /// Default: `productivity-module-payoffs`
    pub name: String,

    /// Initial sort column.
    ///
    /// Default: the row type's `DEFAULT_SORT_KEY`
    pub sort_key: Option<String>,

    /// Initial sort direction.
    ///
    /// Default: ascending
    pub direction: Direction,

    /// Initial page, 1-based.
    ///
    /// Default: 1
    pub current_page: usize,

    /// Rows per page.
    ///
    /// Default: 10
    pub page_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SHEET_NAME.to_string(),
            sort_key: None,
            direction: Direction::Asc,
            current_page: 1,
            page_size: 10,
        }
    }
}

impl ViewConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sheet name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the initial sort column and direction.
    pub fn with_sort(mut self, key: impl Into<String>, direction: Direction) -> Self {
        self.sort_key = Some(key.into());
        self.direction = direction;
        self
    }

    /// Sets the initial page.
    pub fn with_current_page(mut self, page: usize) -> Self {
        self.current_page = page;
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Resolves the initial sort state for row type `R`.
    pub fn sort_state<R: SheetRow>(&self) -> Result<SortState, FieldError> {
        let key = self.sort_key.as_deref().unwrap_or(R::DEFAULT_SORT_KEY);
        SortState::new::<R>(key, self.direction)
    }

    /// Resolves the initial page state.
    pub fn page_state(&self) -> Result<PageState, PageError> {
        PageState::new(self.current_page, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PayoffRecord;

    #[test]
    fn test_defaults() {
        let config = ViewConfig::default();
        let sort = config.sort_state::<PayoffRecord>().unwrap();

        assert_eq!(config.name, "productivity-module-payoffs");
        assert_eq!(sort.key(), "payoff_speed_prod");
        assert_eq!(sort.direction(), Direction::Asc);
        assert_eq!(config.page_state().unwrap(), PageState::default());
    }

    #[test]
    fn test_unknown_sort_key_fails() {
        let config = ViewConfig::default().with_sort("price", Direction::Asc);
        assert!(config.sort_state::<PayoffRecord>().is_err());
    }

    #[test]
    fn test_zero_page_size_fails() {
        let config = ViewConfig::default().with_page_size(0);
        assert_eq!(config.page_state(), Err(PageError::ZeroPageSize));
    }

    #[test]
    fn test_deserialize_partial() {
        let json = r#"{"sort_key": "product", "direction": "desc", "page_size": 5}"#;
        let config: ViewConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.name, DEFAULT_SHEET_NAME);
        assert_eq!(config.direction, Direction::Desc);
        assert_eq!(config.page_size, 5);
        assert_eq!(config.current_page, 1);
    }
}
