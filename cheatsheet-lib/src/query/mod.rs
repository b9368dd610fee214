//! Sorting and pagination of cheat sheet rows.

mod order;
mod page;
mod sort;

pub use order::*;
pub use page::*;
pub use sort::*;
