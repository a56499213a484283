//! Data models for sources, headlines, and the cached headline set.
//!
//! This module defines the core data structures used throughout the application:
//! - [`SourceDescriptor`]: A registered news origin and how to extract headlines from it
//! - [`NewSource`]: The registration payload, before an id is assigned
//! - [`Headline`]: One cleaned headline produced by a fetch worker
//! - [`CacheEntry`]: The aggregate of one fetch cycle plus the time it was stored
//!
//! Field names follow the JSON written to `sources.json` and `headlines.json`.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A configured news origin.
///
/// The `id` is assigned by the registry (`max(ids) + 1`) and never changes.
/// Older files spelled the flag `enable`; both spellings are accepted. Those
/// files may also omit `name`, which the registry backfills from the URL host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub url: String,
    /// CSS selector identifying the elements that hold headline text.
    pub selector: String,
    #[serde(alias = "enable", default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// A source registration request. Only `url` and `selector` are required;
/// the registry validates them and fills in the rest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSource {
    pub name: Option<String>,
    pub url: Option<String>,
    pub selector: Option<String>,
    #[serde(alias = "enable")]
    pub enabled: Option<bool>,
}

/// A single cleaned headline.
///
/// Created by a fetch worker after normalization and never modified. `source`
/// is the descriptor's name at fetch time, a weak reference that survives the
/// source being disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub text: String,
    pub source: String,
    #[serde(alias = "scraped_at", with = "epoch_seconds")]
    pub fetched_at: DateTime<Utc>,
}

/// The aggregate result of one fetch cycle, as held by the cache store and
/// persisted to the headlines file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub headlines: Vec<Headline>,
    /// Wall-clock time of the cycle that produced `headlines`.
    #[serde(rename = "last_updated", with = "epoch_seconds")]
    pub stored_at: DateTime<Utc>,
}

/// Epoch-second timestamps. Written as whole seconds; read back from either
/// an integer or a float, since existing files may carry fractional seconds.
mod epoch_seconds {
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Epoch {
        Whole(i64),
        Fractional(f64),
    }

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(at.timestamp())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let at = match Epoch::deserialize(deserializer)? {
            Epoch::Whole(secs) => DateTime::from_timestamp(secs, 0),
            Epoch::Fractional(secs) if secs.is_finite() => {
                DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)
            }
            Epoch::Fractional(_) => None,
        };
        at.ok_or_else(|| D::Error::custom("epoch timestamp out of range"))
    }
}

impl CacheEntry {
    /// An entry is stale once strictly more than `ttl` has elapsed since it was stored.
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now.signed_duration_since(self.stored_at) > ttl
    }
}

/// The sources seeded into an empty registry on first start.
pub fn default_sources() -> Vec<SourceDescriptor> {
    [
        ("FAZ", "https://www.faz.net/aktuell/", "h3"),
        ("SZ.de", "https://www.sueddeutsche.de/", "h3"),
        ("The New York Times", "https://www.nytimes.com/", "div.css-xdandi"),
        ("BBC", "https://www.bbc.com/", "h2"),
    ]
    .into_iter()
    .zip(1u64..)
    .map(|((name, url, selector), id)| SourceDescriptor {
        id,
        name: name.to_string(),
        url: url.to_string(),
        selector: selector.to_string(),
        enabled: true,
    })
    .collect()
}

/// Host part of a URL, used as the display name of sources registered without one.
/// For example: "https://lite.cnn.com/article" -> "lite.cnn.com"
pub fn host_name(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
}
