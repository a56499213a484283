//! Crate-wide error type.
//!
//! Fetch faults never reach this type's callers in the API: the fetch worker
//! converts them to an empty result. Everything else (validation, lookups,
//! persistence) is propagated with `?` and mapped to an HTTP status by
//! [`crate::api`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The caller sent something we refuse to store or act on.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl Error {
    /// True for faults caused by the request rather than by the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::NotFound(_) | Error::Selector { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
