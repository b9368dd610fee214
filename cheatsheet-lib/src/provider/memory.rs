//! In-memory data provider

use std::sync::Arc;

use dashmap::DashMap;
use log::debug;
use tokio::sync::watch;

use super::{DataProvider, SheetStream};
use crate::error::ProviderError;
use crate::model::{SheetData, SheetRow};

type Slot<R> = Option<Arc<SheetData<R>>>;

/// A data provider backed by in-memory sheets.
///
/// Publishing a sheet again re-emits it to every open stream, which is how
/// hot reloads reach subscribed views. Subscribing to a sheet that has not
/// been published yet waits for the first `publish`. When several publishes
/// happen before a subscriber polls, it only sees the latest one.
#[derive(Debug)]
pub struct StaticProvider<R> {
    sheets: DashMap<String, watch::Sender<Slot<R>>>,
}

impl<R> Default for StaticProvider<R> {
    fn default() -> Self {
        Self {
            sheets: DashMap::new(),
        }
    }
}

impl<R: SheetRow> StaticProvider<R> {
    /// Creates a provider with no sheets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes (or replaces) the data of a sheet.
    pub fn publish(&self, name: &str, data: SheetData<R>) {
        debug!("Publishing {} rows for sheet '{}'", data.records().len(), name);
        self.with_sender(name, |tx| tx.send_replace(Some(Arc::new(data))));
    }

    /// Returns the latest published data of a sheet.
    pub fn get(&self, name: &str) -> Option<Arc<SheetData<R>>> {
        self.sheets.get(name).and_then(|tx| tx.borrow().clone())
    }

    /// Returns the number of sheets that are published or awaited by an
    /// open stream.
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Returns `true` if no sheet is published or awaited.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    fn with_sender<T>(&self, name: &str, f: impl FnOnce(&watch::Sender<Slot<R>>) -> T) -> T {
        // Drop requests for sheets that were never published and nobody waits for.
        self.sheets
            .retain(|_, tx| tx.borrow().is_some() || tx.receiver_count() > 0);
        let tx = self
            .sheets
            .entry(name.to_string())
            .or_insert_with(|| watch::channel(None).0);
        f(&tx)
    }
}

impl<R: SheetRow> DataProvider<R> for StaticProvider<R> {
    fn cheat_sheet_data(&self, name: &str) -> SheetStream<R> {
        let mut rx = self.with_sender(name, |tx| tx.subscribe());

        Box::pin(async_stream::stream! {
            loop {
                let current = rx.borrow_and_update().clone();
                if let Some(data) = current {
                    yield Ok::<_, ProviderError>(data);
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::StreamExt;

    use super::*;
    use crate::model::{CheatSheet, PayoffRecord};

    fn sheet(title: &str, products: &[&str]) -> SheetData<PayoffRecord> {
        SheetData::new(
            CheatSheet::new(title, ""),
            products.iter().map(|p| PayoffRecord::new(*p)).collect(),
        )
    }

    #[tokio::test]
    async fn test_emits_published_data() {
        let provider = StaticProvider::new();
        provider.publish("payoffs", sheet("v1", &["A"]));

        let mut stream = provider.cheat_sheet_data("payoffs");
        let data = stream.next().await.unwrap().unwrap();
        assert_eq!(data.cheat_sheet.title, "v1");
    }

    #[tokio::test]
    async fn test_republish_reemits() {
        let provider = StaticProvider::new();
        let mut stream = provider.cheat_sheet_data("payoffs");

        provider.publish("payoffs", sheet("v1", &["A"]));
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.cheat_sheet.title, "v1");

        provider.publish("payoffs", sheet("v2", &["A", "B"]));
        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(second.cheat_sheet.title, "v2");
        assert_eq!(second.records().len(), 2);
    }

    #[tokio::test]
    async fn test_unpublished_sheet_waits() {
        let provider = StaticProvider::<PayoffRecord>::new();
        let mut stream = provider.cheat_sheet_data("missing");

        let waited = tokio::time::timeout(Duration::from_millis(20), stream.next()).await;
        assert!(waited.is_err());
        assert_eq!(provider.len(), 1);
    }

    #[test]
    fn test_abandoned_requests_are_forgotten() {
        let provider = StaticProvider::<PayoffRecord>::new();
        for i in 0..50 {
            drop(provider.cheat_sheet_data(&format!("missing-{i}")));
        }
        provider.publish("payoffs", sheet("v1", &["A"]));

        assert_eq!(provider.len(), 1);
        assert!(provider.get("payoffs").is_some());
    }

    #[test]
    fn test_published_sheets_survive_without_streams() {
        let provider = StaticProvider::new();
        provider.publish("payoffs", sheet("v1", &["A"]));
        drop(provider.cheat_sheet_data("other"));
        provider.publish("more", sheet("v1", &["B"]));

        assert_eq!(provider.len(), 2);
        assert_eq!(provider.get("payoffs").unwrap().records().len(), 1);
    }

    #[test]
    fn test_get_latest() {
        let provider = StaticProvider::new();
        assert!(provider.get("payoffs").is_none());

        provider.publish("payoffs", sheet("v1", &[]));
        provider.publish("payoffs", sheet("v2", &[]));
        assert_eq!(provider.get("payoffs").unwrap().cheat_sheet.title, "v2");
    }
}
