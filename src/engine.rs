//! Search engine trait and configuration.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Result, SearchQuery, SearchResult};

/// Configuration for a search engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Display name of the engine.
    pub name: String,
    /// Identity of the engine (e.g., "ddg_html"). Used for selection and as
    /// the cache namespace.
    pub shortcut: String,
    /// Pause after every crawl attempt, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Whether the query locale takes part in the cache key.
    #[serde(default)]
    pub locale_sensitive: bool,
    /// Fewer results than this are logged as suspicious.
    #[serde(default = "default_min_expected_results")]
    pub min_expected_results: usize,
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_min_expected_results() -> usize {
    4
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            shortcut: String::new(),
            delay_ms: default_delay_ms(),
            locale_sensitive: false,
            min_expected_results: default_min_expected_results(),
        }
    }
}

impl EngineConfig {
    pub fn new(name: impl Into<String>, shortcut: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shortcut: shortcut.into(),
            ..Default::default()
        }
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_locale_sensitive(mut self, locale_sensitive: bool) -> Self {
        self.locale_sensitive = locale_sensitive;
        self
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// The locale that belongs in the cache key for `query`.
    pub fn cache_locale<'a>(&self, query: &'a SearchQuery) -> Option<&'a str> {
        if self.locale_sensitive {
            query.locale.as_deref()
        } else {
            None
        }
    }
}

/// Trait for implementing search engines.
///
/// `search` returns an empty list both when the engine found nothing and
/// when every attempt failed; failures are only visible through logs and
/// diagnostic artifacts.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Returns the engine configuration.
    fn config(&self) -> &EngineConfig;

    /// Performs a search and returns results.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>>;

    /// Returns the engine name.
    fn name(&self) -> &str {
        &self.config().name
    }

    /// Returns the engine shortcut.
    fn shortcut(&self) -> &str {
        &self.config().shortcut
    }

    /// The keyword this engine understands as a boolean OR, if any.
    fn or_operator(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_default() {
        let config = EngineConfig::default();
        assert_eq!(config.name, "");
        assert_eq!(config.shortcut, "");
        assert_eq!(config.delay_ms, 1000);
        assert!(!config.locale_sensitive);
        assert_eq!(config.min_expected_results, 4);
    }

    #[test]
    fn test_engine_config_builders() {
        let config = EngineConfig::new("Bing", "bing")
            .with_delay_ms(0)
            .with_locale_sensitive(true);
        assert_eq!(config.name, "Bing");
        assert_eq!(config.shortcut, "bing");
        assert_eq!(config.delay(), Duration::ZERO);
        assert!(config.locale_sensitive);
    }

    #[test]
    fn test_cache_locale() {
        let query = SearchQuery::new("q").with_locale("de");
        assert_eq!(EngineConfig::new("a", "a").cache_locale(&query), None);
        assert_eq!(
            EngineConfig::new("a", "a")
                .with_locale_sensitive(true)
                .cache_locale(&query),
            Some("de")
        );
    }

    #[test]
    fn test_engine_config_serialization() {
        let config = EngineConfig::new("Test", "t");
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"name\":\"Test\""));
        assert!(json.contains("\"shortcut\":\"t\""));
    }

    #[test]
    fn test_engine_config_deserialization() {
        let json = r#"{"name":"Test","shortcut":"t"}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.name, "Test");
        assert_eq!(config.delay_ms, 1000); // default
        assert_eq!(config.min_expected_results, 4); // default
        assert!(!config.locale_sensitive); // default
    }
}
