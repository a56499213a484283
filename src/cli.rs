//! Command-line interface definitions.
//!
//! All storage, fetch, and normalization options can be provided via flags
//! or environment variables and must appear before the subcommand. Without
//! a subcommand the API server is started on the default address.

use crate::config::{DEFAULT_CACHE_FILE, DEFAULT_SOURCES_FILE, Settings};
use crate::normalize::NormalizerConfig;
use crate::scrapers::FetchSettings;
use crate::search::MatchMode;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Serve the JSON API on localhost:8000
/// headline_hub
///
/// # Serve on another interface with a 15 minute cache
/// headline_hub --cache-ttl-secs 900 serve --bind 0.0.0.0:9000
///
/// # One-shot refresh (reuses a fresh cache unless --force)
/// headline_hub --strip-prefix FAZ,SZ,BBC scrape
///
/// # Search the cache and export matches
/// headline_hub search climate --whole-word --export climate.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path of the source registry (JSON array)
    #[arg(long, env = "HEADLINES_SOURCES_FILE", default_value = DEFAULT_SOURCES_FILE)]
    pub sources_file: PathBuf,

    /// Path of the headline cache
    #[arg(long, env = "HEADLINES_CACHE_FILE", default_value = DEFAULT_CACHE_FILE)]
    pub cache_file: PathBuf,

    /// Seconds after which cached headlines are stale
    #[arg(long, env = "HEADLINES_CACHE_TTL_SECS", default_value_t = 3600)]
    pub cache_ttl_secs: u64,

    /// Per-source request timeout in seconds
    #[arg(long, env = "HEADLINES_FETCH_TIMEOUT_SECS", default_value_t = 10)]
    pub fetch_timeout_secs: u64,

    /// User-Agent header sent to news sites
    #[arg(long, env = "HEADLINES_USER_AGENT", default_value = "Mozilla/5.0")]
    pub user_agent: String,

    /// Shortest accepted headline, in characters
    #[arg(long, default_value_t = 1)]
    pub min_chars: usize,

    /// Longest accepted headline, in characters
    #[arg(long, default_value_t = 99)]
    pub max_chars: usize,

    /// Publisher names to strip from the start of headlines (comma separated or repeated)
    #[arg(long = "strip-prefix", value_delimiter = ',')]
    pub strip_prefixes: Vec<String>,

    /// Match whole words instead of substrings when searching
    #[arg(long)]
    pub whole_word: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the JSON API
    Serve {
        /// Address to bind
        #[arg(short, long, env = "HEADLINES_BIND", default_value = DEFAULT_BIND)]
        bind: SocketAddr,
    },
    /// Refresh the cache if it is stale and print the headlines
    Scrape {
        /// Refresh even if the cache is still fresh
        #[arg(long)]
        force: bool,
    },
    /// Search cached headlines (refreshing a stale cache first)
    Search {
        keyword: String,

        /// Match whole words instead of substrings
        #[arg(long)]
        whole_word: bool,

        /// Write the matches to this file as a JSON array
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            sources_path: self.sources_file.clone(),
            cache_path: self.cache_file.clone(),
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            fetch: FetchSettings {
                timeout: Duration::from_secs(self.fetch_timeout_secs),
                user_agent: self.user_agent.clone(),
            },
            normalizer: NormalizerConfig {
                min_chars: self.min_chars,
                max_chars: self.max_chars,
                strip_prefixes: self.strip_prefixes.clone(),
            },
            match_mode: if self.whole_word {
                MatchMode::WholeWord
            } else {
                MatchMode::Contains
            },
        }
    }

    /// The subcommand to run; `serve` on the default address if none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
        })
    }
}
