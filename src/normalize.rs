//! Headline text normalization.
//!
//! Raw text pulled out of a page is full of markup leftovers, icons, and
//! navigation labels. [`Normalizer::clean`] turns it into a single-line
//! headline or rejects it:
//!
//! 1. Every character outside the allow-list (letters of any script, digits,
//!    whitespace and `. , ! ? -`) is replaced with a space.
//! 2. Whitespace runs collapse to one space and the ends are trimmed.
//! 3. A configured publisher prefix ("BBC: ...", "FAZ - ...") is removed.
//! 4. The result is kept only if its length in characters falls inside the
//!    configured window.
//!
//! The normalizer holds only compiled patterns and is shared between fetch
//! workers without locking.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s.,!?-]").expect("static pattern"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static pattern"));

/// Tunables for [`Normalizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Shortest accepted headline, in characters (inclusive).
    pub min_chars: usize,
    /// Longest accepted headline, in characters (inclusive).
    pub max_chars: usize,
    /// Publisher names stripped from the start of a headline.
    pub strip_prefixes: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            min_chars: 1,
            max_chars: 99,
            strip_prefixes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    min_chars: usize,
    max_chars: usize,
    prefix: Option<Regex>,
}

impl Normalizer {
    /// # Errors
    ///
    /// [`Error::Config`] if `min_chars` is zero or exceeds `max_chars`; an
    /// empty string is never a headline.
    pub fn new(config: &NormalizerConfig) -> Result<Self> {
        if config.min_chars == 0 {
            return Err(Error::Config("min_chars must be at least 1".to_string()));
        }
        if config.min_chars > config.max_chars {
            return Err(Error::Config(format!(
                "min_chars ({}) is greater than max_chars ({})",
                config.min_chars, config.max_chars
            )));
        }

        let prefixes: Vec<String> = config
            .strip_prefixes
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(regex::escape)
            .collect();

        let prefix = if prefixes.is_empty() {
            None
        } else {
            let pattern = format!(r"(?i)^(?:{})\b[\s:\-]*", prefixes.join("|"));
            Some(Regex::new(&pattern)?)
        };

        Ok(Self {
            min_chars: config.min_chars,
            max_chars: config.max_chars,
            prefix,
        })
    }

    /// Clean `raw`, returning `None` when the result falls outside the length window.
    pub fn clean(&self, raw: &str) -> Option<String> {
        let allowed = DISALLOWED.replace_all(raw, " ");
        let collapsed = WHITESPACE.replace_all(&allowed, " ");
        let mut text = collapsed.trim();

        if let Some(prefix) = &self.prefix {
            if let Some(m) = prefix.find(text) {
                text = text[m.end()..].trim_start();
            }
        }

        let len = text.chars().count();
        (len > 0 && (self.min_chars..=self.max_chars).contains(&len)).then(|| text.to_string())
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            min_chars: NormalizerConfig::default().min_chars,
            max_chars: NormalizerConfig::default().max_chars,
            prefix: None,
        }
    }
}
