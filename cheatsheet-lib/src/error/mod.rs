//! Error types

mod config;
mod field;
mod page;
mod provider;

pub use config::*;
pub use field::*;
pub use page::*;
pub use provider::*;
