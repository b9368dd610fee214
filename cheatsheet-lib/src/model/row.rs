//! Typed field registry for table rows

use crate::error::FieldError;

/// A named column of a row type with its typed accessor.
///
/// Field definitions are declared once per row type in
/// [`SheetRow::FIELDS`] and replace dynamic name-based indexing: a field
/// name either resolves to an accessor or fails with [`FieldError`].
pub struct FieldDef<R> {
    /// Field identifier as used in data files and sort keys.
    pub name: &'static str,
    /// Column header text.
    pub label: &'static str,
    /// Extracts the raw string value from a row.
    pub accessor: fn(&R) -> &str,
}

impl<R> FieldDef<R> {
    /// Returns the value of this field for the given row.
    pub fn value<'a>(&self, row: &'a R) -> &'a str {
        (self.accessor)(row)
    }
}

impl<R> Clone for FieldDef<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for FieldDef<R> {}

impl<R> std::fmt::Debug for FieldDef<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Trait for records that can be shown as rows of a cheat sheet.
///
/// Every field is string-typed. Rows are immutable once loaded and compare
/// by content.
///
/// # Example
///
/// ```
/// use cheatsheet_lib::model::{FieldDef, SheetRow};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Item {
///     name: String,
///     cost: String,
/// }
///
/// impl Item {
///     fn name(&self) -> &str { &self.name }
///     fn cost(&self) -> &str { &self.cost }
/// }
///
/// impl SheetRow for Item {
///     const FIELDS: &'static [FieldDef<Self>] = &[
///         FieldDef { name: "name", label: "Name", accessor: Item::name },
///         FieldDef { name: "cost", label: "Cost", accessor: Item::cost },
///     ];
///     const DISPLAYED_COLUMNS: &'static [&'static str] = &["name", "cost"];
///     const DEFAULT_SORT_KEY: &'static str = "name";
/// }
///
/// let item = Item { name: "belt".into(), cost: "3".into() };
/// assert_eq!(item.field_value("cost"), Some("3"));
/// assert!(Item::field_def("weight").is_err());
/// ```
pub trait SheetRow: Clone + PartialEq + Send + Sync + 'static {
    /// All fields of the row type, in declaration order.
    const FIELDS: &'static [FieldDef<Self>];

    /// Field identifiers rendered as table columns, in display order.
    ///
    /// Independent of the current sort key and never changes.
    const DISPLAYED_COLUMNS: &'static [&'static str];

    /// Sort key used when a view is not configured with one.
    const DEFAULT_SORT_KEY: &'static str;

    /// Resolves a field name to its definition.
    fn field_def(name: &str) -> Result<&'static FieldDef<Self>, FieldError> {
        Self::FIELDS
            .iter()
            .find(|def| def.name == name)
            .ok_or_else(|| FieldError::unknown(name))
    }

    /// Returns the raw value of a field, or `None` for unknown names.
    fn field_value(&self, name: &str) -> Option<&str> {
        Self::field_def(name).ok().map(|def| def.value(self))
    }

    /// Checks that the displayed columns and default sort key are registered.
    fn validate_registry() -> Result<(), FieldError> {
        for column in Self::DISPLAYED_COLUMNS {
            Self::field_def(column)?;
        }
        Self::field_def(Self::DEFAULT_SORT_KEY)?;
        Ok(())
    }
}
