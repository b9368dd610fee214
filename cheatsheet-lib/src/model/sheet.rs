//! Cheat sheet metadata and data-load payloads

use serde::{Deserialize, Serialize};

/// Descriptive metadata for a cheat sheet (heading and description text).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheatSheet {
    /// Sheet heading.
    pub title: String,
    /// Introductory text shown above the table.
    pub description: String,
    /// Footnotes shown below the table.
    pub notes: Vec<String>,
}

impl CheatSheet {
    /// Creates sheet metadata with a title and description.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            notes: Vec::new(),
        }
    }

    /// Adds a footnote (builder pattern).
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// One emission of a data provider: sheet metadata plus the full row list.
///
/// Each emission replaces the previously loaded rows wholesale.
///
/// The JSON layout matches the sheet data files:
///
/// ```json
/// { "cheatSheet": { "title": "...", "description": "..." }, "data": [ ... ] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetData<R> {
    #[serde(rename = "cheatSheet", default)]
    pub cheat_sheet: CheatSheet,
    #[serde(default = "Vec::new")]
    pub data: Vec<R>,
}

impl<R> SheetData<R> {
    /// Creates a payload from metadata and rows.
    pub fn new(cheat_sheet: CheatSheet, data: Vec<R>) -> Self {
        Self { cheat_sheet, data }
    }

    /// Returns the rows in source order.
    pub fn records(&self) -> &[R] {
        &self.data
    }
}
