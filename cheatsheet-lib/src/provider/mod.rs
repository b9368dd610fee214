//! Cheat sheet data providers
//!
//! A [`DataProvider`] turns a sheet name into a stream of [`SheetData`]
//! emissions. Each emission replaces the previously loaded rows; a provider
//! may emit again whenever its source changes.

mod file;
mod memory;

pub use file::*;
pub use memory::*;

use std::sync::Arc;

use futures::stream::BoxStream;

use crate::error::ProviderError;
use crate::model::{SheetData, SheetRow};

/// Stream of data-load events for one sheet.
pub type SheetStream<R> = BoxStream<'static, Result<Arc<SheetData<R>>, ProviderError>>;

/// Trait for sources of cheat sheet data.
///
/// Implementations must:
/// - eventually emit at least once for a sheet that exists
/// - emit the full row list every time (no incremental updates)
/// - report failures as stream items rather than ending silently
///
/// # Example
///
/// ```
/// use cheatsheet_lib::model::{CheatSheet, PayoffRecord, SheetData};
/// use cheatsheet_lib::provider::{DataProvider, StaticProvider};
/// use futures::StreamExt;
///
/// # futures::executor::block_on(async {
/// let provider = StaticProvider::<PayoffRecord>::new();
/// provider.publish("payoffs", SheetData::new(CheatSheet::default(), vec![]));
///
/// let mut stream = provider.cheat_sheet_data("payoffs");
/// let first = stream.next().await.unwrap().unwrap();
/// assert!(first.records().is_empty());
/// # });
/// ```
pub trait DataProvider<R: SheetRow>: Send + Sync {
    /// Subscribes to the data of the named sheet.
    fn cheat_sheet_data(&self, name: &str) -> SheetStream<R>;
}

impl<R: SheetRow, P: DataProvider<R> + ?Sized> DataProvider<R> for Arc<P> {
    fn cheat_sheet_data(&self, name: &str) -> SheetStream<R> {
        (**self).cheat_sheet_data(name)
    }
}
