//! The source registry: which sites to scrape and how.
//!
//! The registry owns the list of [`SourceDescriptor`]s and is the single
//! source of truth for every fetch cycle. It is persisted as a JSON array and
//! every mutation writes the whole list back (atomically) before returning,
//! so a crash between calls loses at most the call in flight.
//!
//! # Bootstrap
//!
//! When no registry file exists, the [`default_sources`] are seeded and
//! persisted before first use. A file that is not a JSON array is treated
//! the same way: it is logged and reseeded. Inside a valid array, a single
//! malformed entry is skipped and the rest are kept.
//!
//! # Concurrency
//!
//! Reads share an `RwLock`; writers take it exclusively for the whole
//! read-modify-persist sequence, so two simultaneous registrations get
//! distinct ids and both land in the file.

use crate::error::{Error, Result};
use crate::models::{NewSource, SourceDescriptor, default_sources, host_name};
use crate::scrapers::extract::parse_selector;
use crate::utils::write_json_atomic;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

#[derive(Debug)]
pub struct SourceRegistry {
    path: PathBuf,
    sources: RwLock<Vec<SourceDescriptor>>,
}

impl SourceRegistry {
    /// Load the registry at `path`, seeding the defaults if there is none.
    ///
    /// # Errors
    ///
    /// Fails only if the file exists but cannot be read, or the seeded
    /// defaults cannot be written.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let sources = match fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
                Ok(entries) => {
                    let sources = load_entries(entries);
                    info!(count = sources.len(), "Loaded source registry");
                    sources
                }
                Err(e) => {
                    warn!(error = %e, "Source registry is corrupt; reseeding defaults");
                    seed(&path).await?
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No source registry found; seeding defaults");
                seed(&path).await?
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            sources: RwLock::new(sources),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All registered sources, disabled ones included, in registration order.
    pub async fn list(&self) -> Vec<SourceDescriptor> {
        self.sources.read().await.clone()
    }

    pub async fn get(&self, id: u64) -> Result<SourceDescriptor> {
        self.sources
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Source not found".to_string()))
    }

    /// The subset a fetch cycle should visit.
    pub async fn enabled(&self) -> Vec<SourceDescriptor> {
        self.sources
            .read()
            .await
            .iter()
            .filter(|s| s.enabled)
            .cloned()
            .collect()
    }

    /// Register a new source and persist the registry.
    ///
    /// Assigns `max(existing ids) + 1` (or 1 for an empty registry) and
    /// defaults `enabled` to true. The in-memory list is only updated after
    /// the file has been written, so a failed write leaves no trace.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if `url` or `selector` is missing, empty, or invalid
    /// - [`Error::Io`] / [`Error::Json`] if the registry cannot be persisted
    #[instrument(level = "info", skip_all)]
    pub async fn add(&self, new: NewSource) -> Result<SourceDescriptor> {
        let (url, selector) = validate(&new)?;

        let mut sources = self.sources.write().await;
        let id = sources.iter().map(|s| s.id).max().unwrap_or(0) + 1;

        let name = new
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .or_else(|| host_name(&url))
            .unwrap_or_else(|| url.clone());

        let source = SourceDescriptor {
            id,
            name,
            url,
            selector,
            enabled: new.enabled.unwrap_or(true),
        };

        let mut updated = sources.clone();
        updated.push(source.clone());
        if let Err(e) = write_json_atomic(&self.path, &updated).await {
            error!(error = %e, "Failed to persist source registry");
            return Err(e);
        }
        *sources = updated;

        info!(id = source.id, name = %source.name, url = %source.url, "Registered source");
        Ok(source)
    }
}

/// Decode registry entries one by one. A malformed entry is logged and
/// skipped rather than costing the whole file; a missing name is filled in
/// from the URL host.
fn load_entries(entries: Vec<serde_json::Value>) -> Vec<SourceDescriptor> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            match serde_json::from_value::<SourceDescriptor>(entry) {
                Ok(mut source) => {
                    if source.name.trim().is_empty() {
                        source.name = host_name(&source.url).unwrap_or_else(|| source.url.clone());
                    }
                    Some(source)
                }
                Err(e) => {
                    warn!(index, error = %e, "Skipping malformed source registry entry");
                    None
                }
            }
        })
        .collect()
}

async fn seed(path: &Path) -> Result<Vec<SourceDescriptor>> {
    let defaults = default_sources();
    write_json_atomic(path, &defaults).await?;
    Ok(defaults)
}

fn validate(new: &NewSource) -> Result<(String, String)> {
    let url = new.url.as_deref().map(str::trim).unwrap_or_default();
    let selector = new.selector.as_deref().map(str::trim).unwrap_or_default();

    if url.is_empty() || selector.is_empty() {
        return Err(Error::Validation(
            "Missing required fields: url, selector".to_string(),
        ));
    }

    url::Url::parse(url)
        .map_err(|e| Error::Validation(format!("Invalid url '{url}': {e}")))?;
    parse_selector(selector).map_err(|e| Error::Validation(e.to_string()))?;

    Ok((url.to_string(), selector.to_string()))
}
