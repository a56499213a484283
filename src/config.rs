//! Resolved runtime configuration.
//!
//! [`Settings`] is what the library consumes. The binary builds it from the
//! command line (see [`crate::cli::Cli::settings`]); tests build it directly.

use crate::normalize::NormalizerConfig;
use crate::scrapers::FetchSettings;
use crate::search::MatchMode;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SOURCES_FILE: &str = "sources.json";
pub const DEFAULT_CACHE_FILE: &str = "headlines.json";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// JSON array of source descriptors.
    pub sources_path: PathBuf,
    /// JSON object holding the last fetch cycle's headlines.
    pub cache_path: PathBuf,
    pub cache_ttl: Duration,
    pub fetch: FetchSettings,
    pub normalizer: NormalizerConfig,
    /// Match mode used by `/search` when the request does not pick one.
    pub match_mode: MatchMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sources_path: PathBuf::from(DEFAULT_SOURCES_FILE),
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
            cache_ttl: DEFAULT_CACHE_TTL,
            fetch: FetchSettings::default(),
            normalizer: NormalizerConfig::default(),
            match_mode: MatchMode::Contains,
        }
    }
}

impl Settings {
    /// Defaults with both state files placed under `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            sources_path: dir.join(DEFAULT_SOURCES_FILE),
            cache_path: dir.join(DEFAULT_CACHE_FILE),
            ..Self::default()
        }
    }
}
