//! Data model types

mod record;
mod row;
mod sheet;

pub use record::*;
pub use row::*;
pub use sheet::*;
