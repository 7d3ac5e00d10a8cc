//! Paid search through a SERP proxy.
//!
//! Queries go to exactly one restricted engine (Google) through the proxy
//! pool's `serp` usage. Each call can be billed by the proxy provider, so it
//! must be accepted explicitly.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::ResultCache;
use crate::proxy::{ProxyPolicy, PROXY_USAGE_SERP};
use crate::search::{Search, SearchOptions};
use crate::{Result, SearchError, SearchQuery, SearchResult};

/// Cache namespace of premium results.
pub const PREMIUM_CACHE_IDENTITY: &str = "premium";

/// The engine premium searches are forced onto.
pub const PREMIUM_ENGINE: &str = "google";

pub struct PremiumSearch {
    search: Arc<Search>,
    cache: ResultCache,
    proxy_enabled: bool,
    accept_usage: bool,
}

impl PremiumSearch {
    pub fn new(search: Arc<Search>, cache: ResultCache) -> Self {
        Self {
            search,
            cache,
            proxy_enabled: false,
            accept_usage: false,
        }
    }

    /// Whether the fetches go through the proxy pool at all.
    pub fn with_proxy_enabled(mut self, proxy_enabled: bool) -> Self {
        self.proxy_enabled = proxy_enabled;
        self
    }

    /// Acknowledges that calls may generate provider costs.
    pub fn with_accept_usage(mut self, accept_usage: bool) -> Self {
        self.accept_usage = accept_usage;
        self
    }

    pub fn is_accept_usage(&self) -> bool {
        self.accept_usage
    }

    /// Searches `searched`, optionally as seen from `target_country`.
    ///
    /// Results are cached per (query, country) under their own namespace.
    pub async fn search(
        &self,
        searched: &str,
        target_country: Option<&str>,
    ) -> Result<Vec<SearchResult>> {
        if !self.accept_usage {
            return Err(SearchError::UsageNotAccepted(
                "Premium search can generate high proxy costs, accept its usage first".to_string(),
            ));
        }

        match self
            .cache
            .load(PREMIUM_CACHE_IDENTITY, searched, target_country)
            .await
        {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable premium cache entry"),
        }

        let mut proxy = ProxyPolicy::disabled().with_usage(PROXY_USAGE_SERP);
        proxy.enabled = self.proxy_enabled;
        if let Some(country) = target_country {
            proxy = proxy.with_country(country);
        }

        info!(
            query = %searched,
            target_country = ?target_country,
            proxy_usage = PROXY_USAGE_SERP,
            engine = PREMIUM_ENGINE,
            "Premium search"
        );

        let options = SearchOptions::new()
            .with_proxy(proxy)
            .with_force_allow([PREMIUM_ENGINE]);
        let mut session = self.search.session(&[PREMIUM_ENGINE], options)?;
        session.select_next();

        let mut query = SearchQuery::new(searched);
        if let Some(country) = target_country {
            query = query.with_locale(country);
        }
        let results = session.run(&query).await?;

        if !results.is_empty() {
            if let Err(e) = self
                .cache
                .save(&results, PREMIUM_CACHE_IDENTITY, searched, target_country)
                .await
            {
                warn!(error = %e, "Could not cache premium search results");
            }
        }

        Ok(results)
    }
}
