//! FieldError for row field lookups

/// Error type for resolving a field name against a row's field registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The requested field is not registered for the row type.
    #[error("Field '{field}' is not a known column")]
    Unknown { field: String },
}

impl FieldError {
    /// Creates a new unknown field error.
    pub fn unknown(field: impl Into<String>) -> Self {
        Self::Unknown {
            field: field.into(),
        }
    }

    /// Returns the offending field name.
    pub fn field(&self) -> &str {
        match self {
            Self::Unknown { field } => field,
        }
    }
}
