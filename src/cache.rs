//! TTL cache for the aggregate headline set.
//!
//! The store holds at most one [`CacheEntry`] and mirrors it to the headlines
//! file (`{"headlines": [...], "last_updated": <epoch>}`).
//!
//! # Lifecycle
//!
//! ```text
//! Empty --write--> Fresh --(ttl elapses)--> Stale --is_stale()--> Empty --write--> Fresh
//! ```
//!
//! A stale entry is never served again: the first [`CacheStore::is_stale`]
//! check that observes it deletes both the in-memory entry and the file, so
//! an interrupted refresh cannot resurrect old data. Writes replace the
//! entry wholesale (last writer wins) and are serialized by the store's lock.

use crate::error::Result;
use crate::models::{CacheEntry, Headline};
use crate::utils::write_json_atomic;
use chrono::{DateTime, TimeDelta, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

#[derive(Debug)]
pub struct CacheStore {
    path: PathBuf,
    ttl: TimeDelta,
    entry: RwLock<Option<CacheEntry>>,
}

impl CacheStore {
    /// Open the cache at `path`. A missing or unreadable file yields an empty
    /// cache; it is rebuilt by the next fetch cycle.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>, ttl: Duration) -> Self {
        let path = path.as_ref().to_path_buf();

        let entry = match fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<CacheEntry>(&raw) {
                Ok(entry) => {
                    info!(count = entry.headlines.len(), stored_at = %entry.stored_at, "Loaded headline cache");
                    Some(entry)
                }
                Err(e) => {
                    warn!(error = %e, "Headline cache is corrupt; starting empty");
                    None
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(error = %e, "Headline cache is unreadable; starting empty");
                None
            }
        };

        Self {
            path,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            entry: RwLock::new(entry),
        }
    }

    /// True if there is no entry or the entry has outlived the TTL.
    /// A stale entry is destroyed as a side effect.
    pub async fn is_stale(&self) -> bool {
        self.is_stale_at(Utc::now()).await
    }

    /// [`CacheStore::is_stale`] evaluated at an explicit instant.
    #[instrument(level = "debug", skip(self))]
    pub async fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        let mut entry = self.entry.write().await;
        let stored_at = match entry.as_ref() {
            None => return true,
            Some(current) if !current.is_stale(now, self.ttl) => return false,
            Some(current) => current.stored_at,
        };

        *entry = None;
        match fs::remove_file(&self.path).await {
            Ok(()) => info!(%stored_at, "Headline cache expired and was deleted"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, "Failed to delete expired headline cache"),
        }
        true
    }

    /// The current entry, if any. Does not check staleness.
    pub async fn read(&self) -> Option<CacheEntry> {
        self.entry.read().await.clone()
    }

    /// Headlines of the current entry, or an empty list.
    pub async fn headlines(&self) -> Vec<Headline> {
        self.entry
            .read()
            .await
            .as_ref()
            .map(|e| e.headlines.clone())
            .unwrap_or_default()
    }

    /// Replace the entry with `headlines`, stamped now, and persist it.
    ///
    /// The file is written before the in-memory entry is swapped, so readers
    /// never observe data that did not make it to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache file cannot be written.
    #[instrument(level = "info", skip_all, fields(count = headlines.len()))]
    pub async fn write(&self, headlines: Vec<Headline>) -> Result<CacheEntry> {
        let mut entry = self.entry.write().await;
        let fresh = CacheEntry {
            headlines,
            stored_at: Utc::now(),
        };

        if let Err(e) = write_json_atomic(&self.path, &fresh).await {
            error!(error = %e, "Failed to persist headline cache");
            return Err(e);
        }

        *entry = Some(fresh.clone());
        info!(stored_at = %fresh.stored_at, "Headline cache updated");
        Ok(fresh)
    }
}
