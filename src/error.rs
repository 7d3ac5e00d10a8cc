//! Error types for the search library.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The page could not be fetched (network error, timeout, non-2xx status).
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// No engines were selected for the search.
    #[error("No used engine was selected, cannot perform the search")]
    NoEnginesSelected,

    /// Some selected engines are neither known nor force-allowed.
    #[error("Expected engines from {supported:?}, got unsupported {requested:?}")]
    EngineNotSupported {
        requested: Vec<String>,
        supported: Vec<String>,
    },

    /// An extraction target is malformed.
    #[error("Invalid extraction target: {0}")]
    InvalidTarget(String),

    /// Invalid query.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A paid search path was called without accepting its usage terms.
    #[error("Usage not accepted: {0}")]
    UsageNotAccepted(String),

    /// The engine explicitly reported that nothing was found.
    #[error("Engine '{engine}' responded with `no results found` for '{query}' (called url: {url})")]
    NoResults {
        engine: String,
        query: String,
        url: String,
    },

    /// A required attribute is missing, the selectors no longer match the page.
    #[error("Could not retrieve attribute '{attribute}' for {target} selector '{selector}'")]
    ExtractionMismatch {
        target: String,
        selector: String,
        attribute: String,
    },

    /// A multi-request protocol broke (e.g. the session token is missing).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Cache backend failure.
    #[error("Cache error: {0}")]
    Cache(String),

    /// JSON (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

impl SearchError {
    /// Returns true for errors caused by the caller's configuration.
    ///
    /// These are the only errors the orchestrator surfaces; everything else
    /// is absorbed into an empty result list.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::NoEnginesSelected
                | Self::EngineNotSupported { .. }
                | Self::InvalidTarget(_)
                | Self::InvalidQuery(_)
                | Self::UsageNotAccepted(_)
        )
    }

    /// Returns true when the engine positively reported zero results.
    pub fn is_no_results(&self) -> bool {
        matches!(self, Self::NoResults { .. })
    }
}
