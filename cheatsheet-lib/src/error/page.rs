//! Page state validation errors

/// Errors raised when page state would break its `>= 1` invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// Pages are numbered from 1.
    #[error("Current page must be at least 1")]
    ZeroPage,

    /// A page must hold at least one row.
    #[error("Page size must be at least 1")]
    ZeroPageSize,
}
