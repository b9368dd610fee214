//! JSON file data provider

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use tokio::sync::watch;

use super::{DataProvider, SheetStream};
use crate::error::ProviderError;
use crate::model::{SheetData, SheetRow};

/// A data provider that reads sheets from `<root>/<name>.json`.
///
/// Every stream reads the file when it is first polled and again after each
/// [`reload`](FileProvider::reload) of that sheet. Read and parse failures
/// are yielded as errors; the stream keeps waiting for the next reload.
///
/// # Example
///
/// ```no_run
/// use cheatsheet_lib::model::PayoffRecord;
/// use cheatsheet_lib::provider::{DataProvider, FileProvider};
///
/// let provider = FileProvider::new("assets/data");
/// let stream =
///     DataProvider::<PayoffRecord>::cheat_sheet_data(&provider, "productivity-module-payoffs");
/// ```
#[derive(Debug)]
pub struct FileProvider {
    root: PathBuf,
    /// Reload generation per sheet name.
    generations: DashMap<String, watch::Sender<u64>>,
}

impl FileProvider {
    /// Creates a provider reading from the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            generations: DashMap::new(),
        }
    }

    /// Returns the data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file a sheet is read from, or `None` for names that are
    /// not a plain file stem.
    pub fn path_for(&self, name: &str) -> Option<PathBuf> {
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        plain.then(|| self.root.join(format!("{name}.json")))
    }

    /// Makes every open stream of the sheet read its file again.
    ///
    /// Does nothing if no stream of the sheet is open; the next stream reads
    /// the file anyway.
    pub fn reload(&self, name: &str) {
        match self.generations.get(name) {
            Some(tx) => {
                debug!("Reloading sheet '{}'", name);
                tx.send_modify(|generation| *generation += 1);
            }
            None => debug!("Sheet '{}' has no open streams; nothing to reload", name),
        }
    }

    /// Returns the number of sheet names tracked for reloads.
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    /// Returns `true` if no sheet is tracked for reloads.
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    fn subscribe(&self, name: &str) -> watch::Receiver<u64> {
        // Forget sheets whose streams have all been dropped.
        self.generations.retain(|_, tx| tx.receiver_count() > 0);
        self.generations
            .entry(name.to_string())
            .or_insert_with(|| watch::channel(0).0)
            .subscribe()
    }
}

/// Reads and parses one sheet file.
pub async fn load_sheet<R: DeserializeOwned>(
    name: &str,
    path: &Path,
) -> Result<SheetData<R>, ProviderError> {
    let bytes = tokio::fs::read(path).await.map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            ProviderError::not_found(name)
        } else {
            ProviderError::io(path, &err)
        }
    })?;
    serde_json::from_slice(&bytes).map_err(|err| ProviderError::parse(path, &err))
}

impl<R: SheetRow + DeserializeOwned> DataProvider<R> for FileProvider {
    fn cheat_sheet_data(&self, name: &str) -> SheetStream<R> {
        let name = name.to_string();
        let Some(path) = self.path_for(&name) else {
            warn!("Rejecting sheet name '{}'", name);
            let err = ProviderError::invalid_name(name);
            return Box::pin(futures::stream::once(async move {
                Err::<Arc<SheetData<R>>, _>(err)
            }));
        };
        let mut generations = self.subscribe(&name);

        Box::pin(async_stream::stream! {
            loop {
                match load_sheet::<R>(&name, &path).await {
                    Ok(data) => {
                        debug!("Loaded {} rows from {}", data.records().len(), path.display());
                        yield Ok(Arc::new(data));
                    }
                    Err(err) => {
                        warn!("Failed to load sheet '{}': {}", name, err);
                        yield Err(err);
                    }
                }
                if generations.changed().await.is_err() {
                    break;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PayoffRecord;

    #[test]
    fn test_path_for_plain_names() {
        let provider = FileProvider::new("/data");

        assert_eq!(
            provider.path_for("productivity-module-payoffs"),
            Some(PathBuf::from("/data/productivity-module-payoffs.json"))
        );
        assert_eq!(provider.path_for(""), None);
        assert_eq!(provider.path_for(".."), None);
        assert_eq!(provider.path_for("../secrets"), None);
        assert_eq!(provider.path_for("a\\b"), None);
    }

    #[test]
    fn test_dropped_streams_are_forgotten() {
        let provider = FileProvider::new("/data");

        for name in ["a", "b", "c"] {
            drop(DataProvider::<PayoffRecord>::cheat_sheet_data(&provider, name));
        }
        provider.reload("d");
        let _open = DataProvider::<PayoffRecord>::cheat_sheet_data(&provider, "e");

        assert_eq!(provider.len(), 1);
    }
}
