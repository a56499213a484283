//! Extraction strategies: which elements of a page hold headlines.
//!
//! Most sources are fine with the CSS selector they were registered with.
//! Some publishers need a different rule than the one declared, so the
//! [`ExtractorTable`] maps a source name to an [`Extractor`] and falls back
//! to [`DeclaredSelector`] for everything else. The strategy is resolved
//! once per fetch, not through per-publisher conditionals.

use crate::error::{Error, Result};
use crate::models::SourceDescriptor;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Pulls raw candidate strings out of a parsed document.
pub trait Extractor: fmt::Debug + Send + Sync {
    fn extract(&self, document: &Html, source: &SourceDescriptor) -> Result<Vec<String>>;
}

/// Uses the selector stored on the descriptor.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclaredSelector;

impl Extractor for DeclaredSelector {
    fn extract(&self, document: &Html, source: &SourceDescriptor) -> Result<Vec<String>> {
        select_text(document, &source.selector)
    }
}

/// Ignores the descriptor and always applies its own selector.
#[derive(Debug, Clone)]
pub struct FixedSelector(pub String);

impl Extractor for FixedSelector {
    fn extract(&self, document: &Html, _source: &SourceDescriptor) -> Result<Vec<String>> {
        select_text(document, &self.0)
    }
}

#[derive(Debug, Clone)]
pub struct ExtractorTable {
    by_name: HashMap<String, Arc<dyn Extractor>>,
    fallback: Arc<dyn Extractor>,
}

impl ExtractorTable {
    /// A table with no overrides: every source uses its declared selector.
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
            fallback: Arc::new(DeclaredSelector),
        }
    }

    /// Overrides for the bootstrap publishers, whose markup is known.
    pub fn with_known_publishers() -> Self {
        [
            ("FAZ", "h3"),
            ("SZ.de", "h3"),
            ("BBC", "h2"),
            ("The New York Times", "div.css-xdandi"),
        ]
        .into_iter()
        .fold(Self::new(), |table, (name, css)| {
            table.with_override(name, FixedSelector(css.to_string()))
        })
    }

    pub fn with_override(mut self, name: impl Into<String>, extractor: impl Extractor + 'static) -> Self {
        self.by_name.insert(name.into(), Arc::new(extractor));
        self
    }

    pub fn resolve(&self, source: &SourceDescriptor) -> &dyn Extractor {
        self.by_name
            .get(&source.name)
            .unwrap_or(&self.fallback)
            .as_ref()
    }
}

impl Default for ExtractorTable {
    fn default() -> Self {
        Self::with_known_publishers()
    }
}

pub fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// Trimmed text of every element matching `css`; elements without text are skipped.
pub fn select_text(document: &Html, css: &str) -> Result<Vec<String>> {
    let selector = parse_selector(css)?;
    Ok(document
        .select(&selector)
        .map(|element| element.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .filter(|text| !text.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <h2>Second level</h2>
          <h3>First <b>story</b></h3>
          <h3>   </h3>
          <div class="css-xdandi">Times story</div>
          <div class="teaser">Teaser story</div>
        </body></html>
    "#;

    fn source(name: &str, selector: &str) -> SourceDescriptor {
        SourceDescriptor {
            id: 1,
            name: name.to_string(),
            url: "http://example.test".to_string(),
            selector: selector.to_string(),
            enabled: true,
        }
    }

    #[test]
    fn test_select_text_joins_nested_nodes_and_skips_empty() {
        let doc = Html::parse_document(PAGE);
        let texts = select_text(&doc, "h3").unwrap();
        assert_eq!(texts, vec!["First  story"]);
    }

    #[test]
    fn test_select_text_rejects_invalid_selector() {
        let doc = Html::parse_document(PAGE);
        let err = select_text(&doc, "div[[").unwrap_err();
        assert!(matches!(err, Error::Selector { .. }));
    }

    #[test]
    fn test_unknown_source_uses_declared_selector() {
        let doc = Html::parse_document(PAGE);
        let table = ExtractorTable::with_known_publishers();
        let src = source("Somewhere", "div.teaser");

        let texts = table.resolve(&src).extract(&doc, &src).unwrap();
        assert_eq!(texts, vec!["Teaser story"]);
    }

    #[test]
    fn test_known_publisher_override_wins_over_declared_selector() {
        let doc = Html::parse_document(PAGE);
        let table = ExtractorTable::with_known_publishers();

        let bbc = source("BBC", "div.teaser");
        assert_eq!(
            table.resolve(&bbc).extract(&doc, &bbc).unwrap(),
            vec!["Second level"]
        );

        let nyt = source("The New York Times", "h3");
        assert_eq!(
            table.resolve(&nyt).extract(&doc, &nyt).unwrap(),
            vec!["Times story"]
        );
    }

    #[test]
    fn test_empty_table_has_no_overrides() {
        let doc = Html::parse_document(PAGE);
        let table = ExtractorTable::new();
        let bbc = source("BBC", "div.teaser");
        assert_eq!(
            table.resolve(&bbc).extract(&doc, &bbc).unwrap(),
            vec!["Teaser story"]
        );
    }
}
