//! View configuration errors

use super::{FieldError, PageError};

/// Errors that can occur when building a view from its configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The configured sort key or a registered column is unknown.
    #[error("Invalid sort configuration: {0}")]
    Field(#[from] FieldError),

    /// The configured page or page size is zero.
    #[error("Invalid page configuration: {0}")]
    Page(#[from] PageError),
}
