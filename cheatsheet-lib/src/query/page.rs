//! Client-side pagination.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::PageError;

/// Default number of rows shown per page.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = NonZeroUsize::new(10).unwrap();

/// The page currently shown and how many rows a page holds.
///
/// Both values are at least 1. A page past the end of the data is valid and
/// simply shows no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageState {
    current_page: NonZeroUsize,
    page_size: NonZeroUsize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: NonZeroUsize::MIN,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageState {
    /// Creates a page state from plain integers.
    pub fn new(current_page: usize, page_size: usize) -> Result<Self, PageError> {
        Ok(Self {
            current_page: NonZeroUsize::new(current_page).ok_or(PageError::ZeroPage)?,
            page_size: NonZeroUsize::new(page_size).ok_or(PageError::ZeroPageSize)?,
        })
    }

    /// Creates a page state from values already known to be non-zero.
    pub fn from_parts(current_page: NonZeroUsize, page_size: NonZeroUsize) -> Self {
        Self {
            current_page,
            page_size,
        }
    }

    /// Returns the 1-based current page.
    pub fn current_page(&self) -> NonZeroUsize {
        self.current_page
    }

    /// Returns the number of rows per page.
    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Returns the index of the first row on the current page.
    pub fn start_index(&self) -> usize {
        start_index(self.current_page, self.page_size)
    }

    /// Returns the rows of `records` on the current page.
    pub fn slice<'a, R>(&self, records: &'a [R]) -> &'a [R] {
        paginate(records, self.current_page, self.page_size)
    }
}

fn start_index(current_page: NonZeroUsize, page_size: NonZeroUsize) -> usize {
    (current_page.get() - 1).saturating_mul(page_size.get())
}

/// Returns the rows shown on `current_page`.
///
/// Equivalent to `records[(p - 1) * size .. (p - 1) * size + size]` clamped
/// to the slice bounds. A page starting past the end yields an empty slice.
///
/// # Example
///
/// ```
/// use std::num::NonZeroUsize;
/// use cheatsheet_lib::query::paginate;
///
/// let rows = [1, 2, 3];
/// let size = NonZeroUsize::new(2).unwrap();
///
/// assert_eq!(paginate(&rows, NonZeroUsize::new(1).unwrap(), size), &[1, 2]);
/// assert_eq!(paginate(&rows, NonZeroUsize::new(2).unwrap(), size), &[3]);
/// assert!(paginate(&rows, NonZeroUsize::new(3).unwrap(), size).is_empty());
/// ```
pub fn paginate<R>(records: &[R], current_page: NonZeroUsize, page_size: NonZeroUsize) -> &[R] {
    let start = start_index(current_page, page_size);
    if start >= records.len() {
        return &records[records.len()..];
    }
    let end = start.saturating_add(page_size.get()).min(records.len());
    &records[start..end]
}

/// Returns how many pages `len` rows fill. Zero rows fill zero pages.
pub fn page_count(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get())
}
