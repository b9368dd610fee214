//! Data provider error types

use std::path::Path;

/// Errors that can occur while loading cheat sheet data.
///
/// Messages are kept as strings so a single failure can be handed to every
/// subscriber of a sheet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// No data exists for the requested sheet name.
    #[error("Cheat sheet '{name}' not found")]
    NotFound { name: String },

    /// The sheet name cannot be mapped to a source, e.g. it contains a path
    /// separator.
    #[error("Invalid cheat sheet name '{name}'")]
    InvalidName { name: String },

    /// Reading the sheet source failed.
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// The sheet source could not be parsed.
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

impl ProviderError {
    /// Creates a new not found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Creates a new invalid name error.
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }

    /// Creates an I/O error for the given path.
    pub fn io(path: &Path, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    /// Creates a parse error for the given path.
    pub fn parse(path: &Path, err: &serde_json::Error) -> Self {
        Self::Parse {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}
