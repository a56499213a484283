//! Fetch worker: one source in, cleaned headlines out.
//!
//! A [`Fetcher`] downloads a source's page with a bounded timeout and a
//! browser-like `User-Agent` (some sites reject the default one), resolves
//! the extraction strategy for the source, and runs every candidate through
//! the [`Normalizer`].
//!
//! [`Fetcher::fetch_source`] never fails: transport errors, non-success
//! statuses, and bad selectors are logged and produce an empty list, so one
//! broken site cannot take down a fetch cycle.

use crate::error::Result;
use crate::models::{Headline, SourceDescriptor};
use crate::normalize::Normalizer;
use crate::scrapers::extract::ExtractorTable;
use chrono::Utc;
use scraper::Html;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Network settings for fetch workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

/// Cheap to clone; every clone shares the HTTP connection pool, the
/// normalizer, and the extractor table.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    normalizer: Arc<Normalizer>,
    extractors: Arc<ExtractorTable>,
}

impl Fetcher {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. TLS backend
    /// initialization fails).
    pub fn new(
        settings: &FetchSettings,
        normalizer: Normalizer,
        extractors: ExtractorTable,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            normalizer: Arc::new(normalizer),
            extractors: Arc::new(extractors),
        })
    }

    /// Fetch and extract headlines for one source. Failures yield an empty list.
    #[instrument(level = "info", skip_all, fields(source = %source.name, url = %source.url))]
    pub async fn fetch_source(&self, source: &SourceDescriptor) -> Vec<Headline> {
        let t0 = Instant::now();
        match self.try_fetch(source).await {
            Ok(headlines) => {
                info!(
                    count = headlines.len(),
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Fetched headlines"
                );
                headlines
            }
            Err(e) => {
                warn!(
                    error = %e,
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Fetch failed; contributing no headlines"
                );
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, source: &SourceDescriptor) -> Result<Vec<Headline>> {
        let body = self
            .client
            .get(&source.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!(bytes = body.len(), "Downloaded page");
        self.headlines_from_html(source, &body)
    }

    /// Extract and normalize headlines from an already downloaded page.
    pub fn headlines_from_html(
        &self,
        source: &SourceDescriptor,
        html: &str,
    ) -> Result<Vec<Headline>> {
        let document = Html::parse_document(html);
        let candidates = self.extractors.resolve(source).extract(&document, source)?;
        let candidate_count = candidates.len();
        let fetched_at = Utc::now();

        let headlines: Vec<Headline> = candidates
            .iter()
            .filter_map(|raw| self.normalizer.clean(raw))
            .map(|text| Headline {
                text,
                source: source.name.clone(),
                fetched_at,
            })
            .collect();

        debug!(
            candidates = candidate_count,
            kept = headlines.len(),
            "Normalized candidates"
        );
        Ok(headlines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NormalizerConfig;

    fn fetcher() -> Fetcher {
        let normalizer = Normalizer::new(&NormalizerConfig {
            min_chars: 5,
            max_chars: 99,
            strip_prefixes: vec!["BBC".to_string()],
        })
        .unwrap();
        Fetcher::new(
            &FetchSettings::default(),
            normalizer,
            ExtractorTable::with_known_publishers(),
        )
        .unwrap()
    }

    fn source(name: &str, selector: &str) -> SourceDescriptor {
        SourceDescriptor {
            id: 1,
            name: name.to_string(),
            url: "http://127.0.0.1:1/".to_string(),
            selector: selector.to_string(),
            enabled: true,
        }
    }

    #[test]
    fn test_headlines_from_html_normalizes_and_filters() {
        let html = r#"
            <h3>Sample Headline</h3>
            <h3>Ad</h3>
            <h3>  Weather:   sunny &amp; warm  </h3>
        "#;
        let headlines = fetcher()
            .headlines_from_html(&source("Local", "h3"), html)
            .unwrap();

        let texts: Vec<&str> = headlines.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Sample Headline", "Weather sunny warm"]);
        assert!(headlines.iter().all(|h| h.source == "Local"));
    }

    #[test]
    fn test_headlines_from_html_uses_publisher_override() {
        let html = "<h2>BBC: Storm hits coast</h2><h3>Ignored heading</h3>";
        let headlines = fetcher()
            .headlines_from_html(&source("BBC", "h3"), html)
            .unwrap();
        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].text, "Storm hits coast");
    }

    #[tokio::test]
    async fn test_fetch_source_swallows_transport_errors() {
        // Port 1 on loopback refuses connections.
        let headlines = fetcher().fetch_source(&source("Down", "h3")).await;
        assert!(headlines.is_empty());
    }
}
