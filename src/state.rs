//! Shared application state and the operations built on top of it.
//!
//! [`AppState`] owns handles to the registry, the cache, and the fetcher.
//! It is cloned into every request handler (and used directly by the CLI
//! subcommands); the components themselves serialize their own writers.

use crate::cache::CacheStore;
use crate::config::Settings;
use crate::error::Result;
use crate::models::{CacheEntry, Headline, SourceDescriptor};
use crate::normalize::Normalizer;
use crate::registry::SourceRegistry;
use crate::scrapers::{ExtractorTable, Fetcher, fetch_all};
use crate::search::{EmptyKeyword, MatchMode, SearchOptions, search};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<SourceRegistry>,
    pub cache: Arc<CacheStore>,
    pub fetcher: Fetcher,
    pub match_mode: MatchMode,
}

/// Summary of a search, shaped like the `/search` response.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SearchOutcome {
    pub keyword: String,
    pub total: usize,
    pub found: usize,
    pub results: Vec<Headline>,
}

impl AppState {
    /// Open (or bootstrap) the persisted state described by `settings`.
    ///
    /// # Errors
    ///
    /// Fails if the normalizer configuration is invalid, the HTTP client
    /// cannot be built, or the source registry cannot be read or seeded.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let normalizer = Normalizer::new(&settings.normalizer)?;
        let fetcher = Fetcher::new(
            &settings.fetch,
            normalizer,
            ExtractorTable::with_known_publishers(),
        )?;
        let registry = SourceRegistry::open(&settings.sources_path).await?;
        let cache = CacheStore::open(&settings.cache_path, settings.cache_ttl).await;

        Ok(Self {
            registry: Arc::new(registry),
            cache: Arc::new(cache),
            fetcher,
            match_mode: settings.match_mode,
        })
    }

    /// Run a full fetch cycle over the enabled sources and store the result.
    ///
    /// The cache is written once, after every worker has finished.
    #[instrument(level = "info", skip_all)]
    pub async fn run_cycle(&self) -> Result<CacheEntry> {
        let sources = self.registry.enabled().await;
        let headlines = fetch_all(&self.fetcher, sources).await;
        self.cache.write(headlines).await
    }

    /// Fetch one source without touching the cache.
    pub async fn fetch_one(&self, id: u64) -> Result<(SourceDescriptor, Vec<Headline>)> {
        let source = self.registry.get(id).await?;
        let headlines = self.fetcher.fetch_source(&source).await;
        Ok((source, headlines))
    }

    /// Cached headlines if still fresh, otherwise a new fetch cycle.
    ///
    /// A stale cache is deleted by the staleness check before refreshing.
    #[instrument(level = "info", skip(self))]
    pub async fn fresh_or_refresh(&self, force: bool) -> Result<CacheEntry> {
        if !force && !self.cache.is_stale().await {
            if let Some(entry) = self.cache.read().await {
                info!(stored_at = %entry.stored_at, "Using cached headlines");
                return Ok(entry);
            }
        }
        self.run_cycle().await
    }

    /// Filter `headlines` by `keyword`; an empty keyword matches everything.
    pub fn search_in(
        &self,
        headlines: &[Headline],
        keyword: &str,
        mode: Option<MatchMode>,
    ) -> SearchOutcome {
        let options = SearchOptions {
            mode: mode.unwrap_or(self.match_mode),
            on_empty: EmptyKeyword::MatchAll,
        };
        let results = search(headlines, keyword, options);
        SearchOutcome {
            keyword: keyword.to_string(),
            total: headlines.len(),
            found: results.len(),
            results,
        }
    }
}
