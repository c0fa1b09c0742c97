use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::config::Config;
use crate::database::ArchiveStore;
use crate::error::{LotteryError, Result};
use crate::types::RawTable;
use crate::utils::decode_latin1;

type Slot = Arc<OnceCell<Arc<RawTable>>>;

const MAX_INFLATE_RATIO: u64 = 64;

/// Per-run memo of decoded archives keyed by URL.
///
/// Concurrent callers asking for the same URL share one retrieval.
#[derive(Default)]
pub struct ArchiveCache {
    entries: Mutex<HashMap<String, Slot>>,
}

impl ArchiveCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, url: &str) -> Slot {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(url.to_string()).or_default())
    }

    pub async fn get_or_try_fetch<F, Fut>(&self, url: &str, fetch: F) -> Result<Arc<RawTable>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RawTable>>,
    {
        let slot = self.slot(url);
        let table = slot
            .get_or_try_init(|| async move { fetch().await.map(Arc::new) })
            .await?;
        Ok(Arc::clone(table))
    }

    pub fn replace(&self, url: &str, table: Arc<RawTable>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(url.to_string(), Arc::new(OnceCell::from(table)));
    }

    /// Number of URLs fetched successfully so far.
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.values().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Downloads FDJ archives and decodes them into [`RawTable`]s.
pub struct ArchiveFetcher {
    client: reqwest::Client,
    cache: ArchiveCache,
    store: Option<ArchiveStore>,
}

impl ArchiveFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LotteryError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            cache: ArchiveCache::new(),
            store: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = Self::new(config.timeout)?;
        if config.use_store {
            Ok(fetcher.with_store(ArchiveStore::open(&config.store_path)?))
        } else {
            Ok(fetcher)
        }
    }

    pub fn with_store(mut self, store: ArchiveStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn cache(&self) -> &ArchiveCache {
        &self.cache
    }

    pub fn store(&self) -> Option<&ArchiveStore> {
        self.store.as_ref()
    }

    /// Returns the archive at `url`, from memo, then store, then network.
    pub async fn fetch(&self, url: &str) -> Result<Arc<RawTable>> {
        self.cache.get_or_try_fetch(url, || self.load(url)).await
    }

    /// Downloads `url` again, bypassing memo and store, and overwrites both.
    pub async fn refresh(&self, url: &str) -> Result<Arc<RawTable>> {
        let table = Arc::new(self.download(url).await?);
        self.cache.replace(url, Arc::clone(&table));
        Ok(table)
    }

    async fn load(&self, url: &str) -> Result<RawTable> {
        if let Some(store) = &self.store {
            if let Some(payload) = store.get(url)? {
                debug!(url, "archive found in store");
                match decode_archive(url, &payload) {
                    Ok(table) => return Ok(table),
                    Err(e) => {
                        warn!(url, error = %e, "stored archive unreadable, downloading again")
                    }
                }
            }
        }
        self.download(url).await
    }

    async fn download(&self, url: &str) -> Result<RawTable> {
        info!(url, "downloading archive");
        let payload = self.get_bytes(url).await?;
        let table = decode_archive(url, &payload)?;

        if let Some(store) = &self.store {
            store.put(url, &payload)?;
        }
        Ok(table)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                LotteryError::retrieval(url, "request timed out")
            } else {
                LotteryError::retrieval(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LotteryError::retrieval(url, format!("HTTP status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LotteryError::retrieval(url, e))?;
        Ok(body.to_vec())
    }
}

/// Reads the single CSV entry of a ZIP payload.
pub fn decode_archive(url: &str, payload: &[u8]) -> Result<RawTable> {
    let mut archive =
        ZipArchive::new(Cursor::new(payload)).map_err(|e| LotteryError::retrieval(url, e))?;

    if archive.len() == 0 {
        return Err(LotteryError::retrieval(url, "archive has no entries"));
    }
    if archive.len() > 1 {
        warn!(url, entries = archive.len(), "archive has several entries, reading the first");
    }

    let mut entry = archive
        .by_index(0)
        .map_err(|e| LotteryError::retrieval(url, e))?;
    // declared sizes are untrusted; cap the buffer by a plausible deflate ratio
    let declared = entry.size().min(payload.len() as u64 * MAX_INFLATE_RATIO);
    let mut bytes = Vec::with_capacity(usize::try_from(declared).unwrap_or(0));
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| LotteryError::retrieval(url, e))?;

    let table = RawTable::from_csv(&decode_latin1(&bytes))
        .map_err(|e| LotteryError::retrieval(url, format!("invalid CSV: {e}")))?;
    debug!(url, entry = entry.name(), rows = table.len(), "decoded archive");
    Ok(table)
}
