//! Search result types.

use serde::{Deserialize, Serialize};

/// A single search result scraped from an engine's result page.
///
/// All fields are flat text so that a list of results serializes into a
/// plain cache record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The query this result was found for.
    pub searched_string: String,
    /// Public host of the engine that returned the result.
    pub engine_url: String,
    /// Absolute URL of the result.
    pub link: String,
    /// Result title.
    pub title: String,
    /// Result description/snippet.
    #[serde(default)]
    pub description: Option<String>,
}

impl SearchResult {
    /// Creates a new search result.
    pub fn new(link: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            searched_string: String::new(),
            engine_url: String::new(),
            link: link.into(),
            title: title.into(),
            description: None,
        }
    }

    /// Sets the description. Empty descriptions are stored as `None`.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    /// Sets the searched string.
    pub fn with_searched_string(mut self, searched_string: impl Into<String>) -> Self {
        self.searched_string = searched_string.into();
        self
    }

    /// Sets the engine host.
    pub fn with_engine_url(mut self, engine_url: impl Into<String>) -> Self {
        self.engine_url = engine_url.into();
        self
    }

    /// Returns the file extension of the link's path, lowercased, if any.
    ///
    /// Only the last path segment is inspected so that query strings and
    /// fragments never leak into the extension.
    pub fn link_extension(&self) -> Option<String> {
        let path = match url::Url::parse(&self.link) {
            Ok(url) => url.path().to_string(),
            Err(_) => self
                .link
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .to_string(),
        };

        let segment = path.rsplit('/').next()?;
        let (stem, extension) = segment.rsplit_once('.')?;
        if stem.is_empty() || extension.is_empty() {
            return None;
        }
        Some(extension.to_lowercase())
    }
}
