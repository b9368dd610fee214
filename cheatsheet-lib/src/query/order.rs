//! Sort state for table columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::model::SheetRow;

/// Sort direction for ordering rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Returns the short name used in data files and URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

/// The column a table is sorted by and in which direction.
///
/// Unlike a multi-field ordering there is exactly one key and no secondary
/// sort; ties keep their input order.
///
/// # Example
///
/// ```
/// use cheatsheet_lib::model::PayoffRecord;
/// use cheatsheet_lib::query::{Direction, SortState};
///
/// let mut sort = SortState::asc::<PayoffRecord>("product").unwrap();
///
/// sort.toggle("product");
/// assert_eq!(sort.direction(), Direction::Desc);
///
/// sort.toggle("payoff_prod");
/// assert_eq!(sort.key(), "payoff_prod");
/// assert_eq!(sort.direction(), Direction::Asc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortState {
    key: String,
    direction: Direction,
}

impl SortState {
    /// Creates a sort state, checking the key against the row's fields.
    pub fn new<R: SheetRow>(key: &str, direction: Direction) -> Result<Self, FieldError> {
        let def = R::field_def(key)?;
        Ok(Self {
            key: def.name.to_string(),
            direction,
        })
    }

    /// Creates an ascending sort state on a field.
    pub fn asc<R: SheetRow>(key: &str) -> Result<Self, FieldError> {
        Self::new::<R>(key, Direction::Asc)
    }

    /// Creates a descending sort state on a field.
    pub fn desc<R: SheetRow>(key: &str) -> Result<Self, FieldError> {
        Self::new::<R>(key, Direction::Desc)
    }

    /// Creates a sort state without validating the key.
    ///
    /// Sorting by a key no field answers to leaves rows in input order.
    pub fn unchecked(key: impl Into<String>, direction: Direction) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    /// Returns the field name rows are sorted by.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the sort direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Applies a column-header activation.
    ///
    /// Activating the current key flips the direction; any other key becomes
    /// the new key with the direction reset to ascending.
    pub fn toggle(&mut self, key: &str) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key.to_string();
            self.direction = Direction::Asc;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PayoffRecord;

    #[test]
    fn test_new_rejects_unknown_key() {
        let err = SortState::asc::<PayoffRecord>("price").unwrap_err();
        assert_eq!(err, FieldError::unknown("price"));
    }

    #[test]
    fn test_toggle_same_key_flips_direction() {
        let mut sort = SortState::asc::<PayoffRecord>("payoff_prod").unwrap();

        sort.toggle("payoff_prod");
        assert_eq!(sort.key(), "payoff_prod");
        assert_eq!(sort.direction(), Direction::Desc);

        sort.toggle("payoff_prod");
        assert_eq!(sort.direction(), Direction::Asc);
    }

    #[test]
    fn test_toggle_other_key_resets_to_ascending() {
        let mut sort = SortState::desc::<PayoffRecord>("payoff_prod").unwrap();

        sort.toggle("product");
        assert_eq!(sort.key(), "product");
        assert_eq!(sort.direction(), Direction::Asc);
    }

    #[test]
    fn test_direction_parse_and_display() {
        assert_eq!("asc".parse::<Direction>().unwrap(), Direction::Asc);
        assert_eq!("DESC".parse::<Direction>().unwrap(), Direction::Desc);
        assert!("sideways".parse::<Direction>().is_err());
        assert_eq!(Direction::Desc.to_string(), "desc");
    }

    #[test]
    fn test_direction_serde_lowercase() {
        let json = serde_json::to_string(&Direction::Asc).unwrap();
        assert_eq!(json, "\"asc\"");
    }
}
