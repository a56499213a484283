//! # Headline Hub
//!
//! A headline-aggregation engine: it fetches a configurable set of news
//! front pages in parallel, extracts and cleans their headlines, caches the
//! aggregate with a time-to-live, and serves sources, headlines, and keyword
//! search over a JSON HTTP API.
//!
//! ## Architecture
//!
//! 1. **Registry** ([`registry`]): persisted list of sources and their selectors
//! 2. **Fetching** ([`scrapers`]): one worker per enabled source, joined into one set
//! 3. **Normalization** ([`normalize`]): allow-list, whitespace, prefix, length window
//! 4. **Caching** ([`cache`]): one entry, replaced atomically per cycle, deleted once stale
//! 5. **Serving** ([`api`]): axum router over [`state::AppState`]

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod registry;
pub mod scrapers;
pub mod search;
pub mod state;
pub mod utils;

pub use config::Settings;
pub use error::{Error, Result};
pub use state::AppState;

/// Build the router the binary serves, opening the state described by `settings`.
pub async fn app(settings: &Settings) -> Result<axum::Router> {
    let state = AppState::from_settings(settings).await?;
    Ok(api::router(state))
}
