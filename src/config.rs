//! Process-level settings read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const ENV_PROXY_ENABLED: &str = "SCRAPE_SEARCH_PROXY_ENABLED";
pub const ENV_ARTIFACT_DIR: &str = "SCRAPE_SEARCH_ARTIFACT_DIR";
pub const ENV_CACHE_DIR: &str = "SCRAPE_SEARCH_CACHE_DIR";
pub const ENV_DELAY_MS: &str = "SCRAPE_SEARCH_DELAY_MS";
pub const ENV_TIMEOUT_SECS: &str = "SCRAPE_SEARCH_TIMEOUT_SECS";

/// Settings shared by every engine built for one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Whether engines route their requests through the proxy pool.
    #[serde(default)]
    pub proxy_enabled: bool,
    /// Where diagnostic page snapshots go. `None` disables them.
    #[serde(default)]
    pub artifact_dir: Option<PathBuf>,
    /// Directory of the file-backed cache. `None` keeps the cache in memory.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Overrides every engine's inter-call delay when set.
    #[serde(default)]
    pub delay_ms: Option<u64>,
    /// Fetch timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            proxy_enabled: false,
            artifact_dir: None,
            cache_dir: None,
            delay_ms: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Settings {
    /// Reads settings from `SCRAPE_SEARCH_*` variables. Unset or unparsable
    /// values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            proxy_enabled: non_empty(ENV_PROXY_ENABLED)
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.proxy_enabled),
            artifact_dir: non_empty(ENV_ARTIFACT_DIR).map(PathBuf::from),
            cache_dir: non_empty(ENV_CACHE_DIR).map(PathBuf::from),
            delay_ms: non_empty(ENV_DELAY_MS).and_then(|v| v.trim().parse().ok()),
            timeout_secs: non_empty(ENV_TIMEOUT_SECS)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[]));
        assert_eq!(settings, Settings::default());
        assert!(!settings.proxy_enabled);
        assert_eq!(settings.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_reads_all_variables() {
        let settings = Settings::from_lookup(lookup(&[
            (ENV_PROXY_ENABLED, "TRUE"),
            (ENV_ARTIFACT_DIR, "/tmp/artifacts"),
            (ENV_CACHE_DIR, "/tmp/cache"),
            (ENV_DELAY_MS, "250"),
            (ENV_TIMEOUT_SECS, "12"),
        ]));
        assert!(settings.proxy_enabled);
        assert_eq!(settings.artifact_dir, Some(PathBuf::from("/tmp/artifacts")));
        assert_eq!(settings.cache_dir, Some(PathBuf::from("/tmp/cache")));
        assert_eq!(settings.delay_ms, Some(250));
        assert_eq!(settings.timeout_secs, 12);
    }

    #[test]
    fn test_proxy_flag_values() {
        for (value, expected) in [("1", true), ("true", true), ("0", false), ("yes", false)] {
            let settings = Settings::from_lookup(lookup(&[(ENV_PROXY_ENABLED, value)]));
            assert_eq!(settings.proxy_enabled, expected, "value {:?}", value);
        }
    }

    #[test]
    fn test_unparsable_numbers_fall_back() {
        let settings = Settings::from_lookup(lookup(&[
            (ENV_DELAY_MS, "soon"),
            (ENV_TIMEOUT_SECS, "-3"),
            (ENV_ARTIFACT_DIR, "  "),
        ]));
        assert_eq!(settings.delay_ms, None);
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.artifact_dir, None);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"proxy_enabled":true}"#).unwrap();
        assert!(settings.proxy_enabled);
        assert_eq!(settings.timeout_secs, 30);
    }
}
