//! DuckDuckGo search engine implementation.
//!
//! The full DuckDuckGo page loads its results with JavaScript, so a search
//! takes two requests: the landing page for the `vqd` session token, then
//! the `d.js` results script for that token.

mod payload;
mod token;
mod urls;

pub use urls::Region;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::engines::EngineContext;
use crate::fetcher::{ContentKind, FetchRequest};
use crate::headers::Headers;
use crate::user_agents::CHROME_101;
use crate::{Engine, EngineConfig, Result, SearchQuery, SearchResult};

const ENGINE_URL: &str = "duckduckgo.com";

/// DuckDuckGo search engine (token protocol).
///
/// Never fails past its own boundary: every error collapses into an empty
/// result list after being logged.
pub struct DuckDuckGo {
    config: EngineConfig,
    context: EngineContext,
    region: Region,
}

impl DuckDuckGo {
    /// Creates a new DuckDuckGo engine.
    pub fn new(context: EngineContext) -> Self {
        Self {
            config: EngineConfig::new("DuckDuckGo", "ddg"),
            context,
            region: Region::default(),
        }
    }

    /// Creates with custom configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    async fn fetch_results(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        let token_url = urls::token_page_url(&query.query);
        let token_request = FetchRequest::new(&token_url, CHROME_101)
            .with_headers(
                Headers::new()
                    .with("User-Agent", CHROME_101)
                    .with("Accept", "*/*")
                    .with("Host", ENGINE_URL),
            )
            .with_proxy(query.proxy.clone());
        let token_page = self.context.fetcher.fetch(&token_request).await?;
        let token = token::extract_token(&token_page)?;
        debug!(engine = %self.shortcut(), "Obtained vqd token");

        let results_url = urls::results_url(&query.query, &token, &self.region);
        let results_request = FetchRequest::new(&results_url, CHROME_101)
            .with_headers(results_headers())
            .with_proxy(query.proxy.clone())
            .with_kind(ContentKind::Raw);
        let body = self.context.fetcher.fetch(&results_request).await?;

        payload::parse_results(&body, &query.query, ENGINE_URL, &results_url)
    }
}

/// Headers of the results request. `Sec-ch-ua` must describe the browser
/// named by the User-Agent or the endpoint answers with an empty set.
fn results_headers() -> Headers {
    Headers::new()
        .with("User-Agent", CHROME_101)
        .with("Host", "links.duckduckgo.com")
        .with("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9")
        .with("Accept-language", "pl-PL,pl;q=0.9,en-US;q=0.8,en;q=0.7,de;q=0.6")
        .with("Cache-control", "no-cache")
        .with("Pragma", "no-cache")
        .with("Sec-ch-ua", r#"" Not A;Brand";v="99", "Chromium";v="101", "Google Chrome";v="101""#)
        .with("Sec-ch-ua-mobile", "?0")
        .with("Sec-ch-ua-platform", r#""Linux""#)
        .with("Sec-fetch-dest", "document")
        .with("Sec-fetch-mode", "navigate")
        .with("Sec-fetch-site", "none")
        .with("Sec-fetch-user", "?1")
        .with("Upgrade-insecure-requests", "1")
}

#[async_trait]
impl Engine for DuckDuckGo {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        let locale = self.config.cache_locale(query);
        match self.context.cache.load(self.shortcut(), &query.query, locale).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(engine = %self.shortcut(), error = %e, "Ignoring unreadable cache entry"),
        }

        let fetched = self.fetch_results(query).await;
        tokio::time::sleep(self.context.delay_for(self.config.delay())).await;

        let results = match fetched {
            Ok(results) => results,
            Err(e) if e.is_no_results() => {
                info!(engine = %self.shortcut(), query = %query.query, "Engine reported no results");
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!(engine = %self.shortcut(), error = %e, "Search engine call failed");
                Vec::new()
            }
        };

        if !results.is_empty() && results.len() < self.config.min_expected_results {
            warn!(
                engine = %self.shortcut(),
                expected = self.config.min_expected_results,
                got = results.len(),
                "Too few search results"
            );
        }

        if !results.is_empty() {
            if let Err(e) = self
                .context
                .cache
                .save(&results, self.shortcut(), &query.query, locale)
                .await
            {
                warn!(engine = %self.shortcut(), error = %e, "Could not cache search results");
            }
        }

        Ok(results)
    }

    fn or_operator(&self) -> Option<&str> {
        Some("OR")
    }
}
