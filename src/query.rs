//! Search query representation.

use serde::{Deserialize, Serialize};

use crate::proxy::ProxyPolicy;

/// A search query with its per-call parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The search terms.
    pub query: String,
    /// Locale / target country (e.g., "de"). Only locale-sensitive engines
    /// include it in their cache key.
    pub locale: Option<String>,
    /// Proxy policy handed to the page fetcher.
    #[serde(default)]
    pub proxy: ProxyPolicy,
}

impl SearchQuery {
    /// Creates a new search query with the given terms.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            locale: None,
            proxy: ProxyPolicy::default(),
        }
    }

    /// Sets the locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Sets the proxy policy.
    pub fn with_proxy(mut self, proxy: ProxyPolicy) -> Self {
        self.proxy = proxy;
        self
    }

    /// Returns true if the query has no searchable terms.
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }
}
