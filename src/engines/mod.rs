//! Search engine implementations.

use std::sync::Arc;
use std::time::Duration;

use crate::artifact::ArtifactSink;
use crate::cache::{FileStore, ResultCache};
use crate::config::Settings;
use crate::fetcher::PageFetcher;
use crate::fetcher_http::HttpFetcher;
use crate::proxy::ProxyPool;
use crate::Result;

mod dom;

// Scraped result pages
mod bing;
mod duckduckgo_html;
mod google;
mod yahoo;

// Token protocol
mod duckduckgo;

pub use dom::{DomEngine, DomProfile};

pub use bing::{Bing, BingProfile};
pub use duckduckgo_html::{DuckDuckGoHtml, DuckDuckGoHtmlProfile};
pub use google::{Google, GoogleProfile};
pub use yahoo::{Yahoo, YahooProfile};

pub use duckduckgo::{DuckDuckGo, Region};

/// Collaborators shared by every engine of one registry.
///
/// Cheap to clone; clones share the fetcher, cache store and artifact directory.
#[derive(Clone)]
pub struct EngineContext {
    pub fetcher: Arc<dyn PageFetcher>,
    pub cache: ResultCache,
    pub artifacts: ArtifactSink,
    /// Replaces every engine's own inter-call delay when set.
    pub delay_override: Option<Duration>,
}

impl EngineContext {
    /// In-memory cache, no artifacts, engine-defined delays.
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            cache: ResultCache::in_memory(),
            artifacts: ArtifactSink::disabled(),
            delay_override: None,
        }
    }

    /// Builds an HTTP-backed context from process settings.
    pub fn from_settings(settings: &Settings, proxy_pool: Arc<ProxyPool>) -> Result<Self> {
        let fetcher = HttpFetcher::with_proxy_pool(proxy_pool, settings.timeout())?;
        let mut context = Self::new(Arc::new(fetcher));

        if let Some(dir) = &settings.cache_dir {
            context.cache = ResultCache::new(Arc::new(FileStore::new(dir)));
        }
        if let Some(dir) = &settings.artifact_dir {
            context.artifacts = ArtifactSink::new(dir);
        }
        context.delay_override = settings.delay_ms.map(Duration::from_millis);

        Ok(context)
    }

    pub fn with_cache(mut self, cache: ResultCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_artifacts(mut self, artifacts: ArtifactSink) -> Self {
        self.artifacts = artifacts;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_override = Some(delay);
        self
    }

    /// The pause to apply after a crawl for an engine configured with `configured`.
    pub fn delay_for(&self, configured: Duration) -> Duration {
        self.delay_override.unwrap_or(configured)
    }
}
