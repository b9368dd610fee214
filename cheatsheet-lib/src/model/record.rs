//! Productivity module payoff rows

use serde::{Deserialize, Serialize};

use super::{FieldDef, SheetRow};

/// One row of the productivity module payoff cheat sheet.
///
/// Payoff metrics are kept as the strings found in the data file; sorting
/// compares them lexicographically.
///
/// # Example
///
/// ```
/// use cheatsheet_lib::model::{PayoffRecord, SheetRow};
///
/// let row = PayoffRecord::new("Productivity module 1")
///     .with_field("payoff_speed_prod", "3")
///     .unwrap();
///
/// assert_eq!(row.field_value("payoff_speed_prod"), Some("3"));
/// assert_eq!(row.field_value("description"), Some(""));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoffRecord {
    pub product: String,
    pub description: String,
    pub payoff_speed_prod: String,
    pub payoff_prod: String,
    pub payoff_beacon_8x8: String,
    pub payoff_beacon_12: String,
}

impl PayoffRecord {
    /// Creates a row for the given product with every other field empty.
    pub fn new(product: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            ..Default::default()
        }
    }

    /// Sets a field by name (builder pattern).
    pub fn with_field(
        mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Self, crate::error::FieldError> {
        let slot = match name {
            "product" => &mut self.product,
            "description" => &mut self.description,
            "payoff_speed_prod" => &mut self.payoff_speed_prod,
            "payoff_prod" => &mut self.payoff_prod,
            "payoff_beacon_8x8" => &mut self.payoff_beacon_8x8,
            "payoff_beacon_12" => &mut self.payoff_beacon_12,
            _ => return Err(crate::error::FieldError::unknown(name)),
        };
        *slot = value.into();
        Ok(self)
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn payoff_speed_prod(&self) -> &str {
        &self.payoff_speed_prod
    }

    pub fn payoff_prod(&self) -> &str {
        &self.payoff_prod
    }

    pub fn payoff_beacon_8x8(&self) -> &str {
        &self.payoff_beacon_8x8
    }

    pub fn payoff_beacon_12(&self) -> &str {
        &self.payoff_beacon_12
    }
}

impl SheetRow for PayoffRecord {
    const FIELDS: &'static [FieldDef<Self>] = &[
        FieldDef {
            name: "product",
            label: "Product",
            accessor: PayoffRecord::product,
        },
        FieldDef {
            name: "description",
            label: "Description",
            accessor: PayoffRecord::description,
        },
        FieldDef {
            name: "payoff_speed_prod",
            label: "Payoff (speed + prod)",
            accessor: PayoffRecord::payoff_speed_prod,
        },
        FieldDef {
            name: "payoff_prod",
            label: "Payoff (prod only)",
            accessor: PayoffRecord::payoff_prod,
        },
        FieldDef {
            name: "payoff_beacon_8x8",
            label: "Payoff (8x8 beacon)",
            accessor: PayoffRecord::payoff_beacon_8x8,
        },
        FieldDef {
            name: "payoff_beacon_12",
            label: "Payoff (12 beacon)",
            accessor: PayoffRecord::payoff_beacon_12,
        },
    ];

    // Description is shown under the product name, not as its own column.
    const DISPLAYED_COLUMNS: &'static [&'static str] = &[
        "product",
        "payoff_speed_prod",
        "payoff_prod",
        "payoff_beacon_8x8",
        "payoff_beacon_12",
    ];

    const DEFAULT_SORT_KEY: &'static str = "payoff_speed_prod";
}
