//! Cheat sheet table core
//!
//! Sortable, paginated reference tables ("cheat sheets") driven by reactive
//! state: sheet data from a [`provider::DataProvider`], a sort column and
//! direction, and the current page combine into the rows to display.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod query;
pub mod reactive;
pub mod view;

pub use view::CheatSheetView;
