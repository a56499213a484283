//! Keyword search over a headline set.
//!
//! A linear, case-insensitive filter recomputed per query; the sets involved
//! are a few hundred headlines, so there is no index to maintain. Matches are
//! returned in input order.

use crate::models::Headline;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// `keyword` appears anywhere in the text.
    #[default]
    Contains,
    /// `keyword` appears delimited by word boundaries.
    WholeWord,
}

/// What an empty keyword means; the caller decides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyKeyword {
    #[default]
    MatchAll,
    MatchNone,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub mode: MatchMode,
    pub on_empty: EmptyKeyword,
}

pub fn search(headlines: &[Headline], keyword: &str, options: SearchOptions) -> Vec<Headline> {
    if keyword.is_empty() {
        return match options.on_empty {
            EmptyKeyword::MatchAll => headlines.to_vec(),
            EmptyKeyword::MatchNone => Vec::new(),
        };
    }

    let results: Vec<Headline> = match options.mode {
        MatchMode::Contains => {
            let needle = keyword.to_lowercase();
            headlines
                .iter()
                .filter(|h| h.text.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        }
        MatchMode::WholeWord => match whole_word_pattern(keyword) {
            Some(pattern) => headlines
                .iter()
                .filter(|h| pattern.is_match(&h.text))
                .cloned()
                .collect(),
            None => Vec::new(),
        },
    };

    debug!(%keyword, mode = ?options.mode, total = headlines.len(), found = results.len(), "Searched headlines");
    results
}

/// `None` only if the keyword blows the regex size limit.
fn whole_word_pattern(keyword: &str) -> Option<Regex> {
    RegexBuilder::new(&format!(r"\b{}\b", regex::escape(keyword)))
        .case_insensitive(true)
        .build()
        .ok()
}
