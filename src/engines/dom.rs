//! Shared skeleton for engines whose result page is plain HTML.
//!
//! A [`DomProfile`] supplies the static per-engine data (URL, headers, user
//! agents, selectors) and small hooks; [`DomEngine`] runs the cache lookup,
//! the user-agent loop, extraction, post-processing and the inter-call delay.

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::dom::{self, ExtractionContext};
use crate::engines::EngineContext;
use crate::extraction::{CompiledPlan, ExtractionPlan};
use crate::fetcher::FetchRequest;
use crate::headers::Headers;
use crate::user_agents::DEFAULT_USER_AGENT;
use crate::{Engine, EngineConfig, Result, SearchError, SearchQuery, SearchResult};

/// Per-engine data and hooks for a [`DomEngine`].
pub trait DomProfile: Send + Sync + 'static {
    /// Default configuration (name, shortcut, delay).
    fn config(&self) -> EngineConfig;

    /// Scheme, host and path of the result page.
    fn base_url(&self) -> &'static str;

    /// The query string parameter holding the searched string.
    fn query_parameter(&self) -> &'static str {
        "q"
    }

    /// Static parameters appended after the query.
    fn extra_parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }

    /// Engine headers; they win over the defaults for the same key.
    fn headers(&self) -> Headers {
        Headers::new()
    }

    /// User agents tried in order.
    fn user_agents(&self) -> &'static [&'static str] {
        &[DEFAULT_USER_AGENT]
    }

    fn plan(&self) -> ExtractionPlan;

    /// True when the page is the engine's explicit "nothing found" answer.
    fn detect_no_results(&self, _page: &str) -> bool {
        false
    }

    /// Drops ads, unwraps tracking links and the like.
    fn post_process(&self, results: Vec<SearchResult>) -> Vec<SearchResult> {
        results
    }

    fn or_operator(&self) -> Option<&'static str> {
        None
    }
}

/// An [`Engine`] driven by a [`DomProfile`].
pub struct DomEngine<P> {
    profile: P,
    config: EngineConfig,
    plan: CompiledPlan,
    context: EngineContext,
}

impl<P: DomProfile + Default> DomEngine<P> {
    /// Creates the engine with its default profile.
    ///
    /// Fails with [`SearchError::InvalidTarget`] when the profile's
    /// extraction plan is malformed.
    pub fn new(context: EngineContext) -> Result<Self> {
        Self::with_profile(P::default(), context)
    }
}

impl<P: DomProfile> DomEngine<P> {
    pub fn with_profile(profile: P, context: EngineContext) -> Result<Self> {
        let plan = profile.plan().compile()?;
        Ok(Self {
            config: profile.config(),
            profile,
            plan,
            context,
        })
    }

    /// Creates with custom configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn profile(&self) -> &P {
        &self.profile
    }

    /// Builds the result page URL: base, query parameter, then the extras.
    pub fn build_url(&self, searched: &str) -> Result<url::Url> {
        let mut params: Vec<(&str, &str)> = vec![(self.profile.query_parameter(), searched)];
        params.extend_from_slice(self.profile.extra_parameters());
        Ok(url::Url::parse_with_params(self.profile.base_url(), &params)?)
    }

    fn headers_for(&self, host: &str, user_agent: &str) -> Headers {
        Headers::new()
            .with("User-Agent", user_agent)
            .with("Accept", "*/*")
            .with("Host", host)
            .merged(&self.profile.headers())
    }

    /// Tries every user agent until one yields results.
    ///
    /// Returns [`SearchError::NoResults`] as soon as the engine reports that
    /// nothing exists; an exhausted loop is an empty list.
    async fn crawl(&self, query: &SearchQuery, called_url: &url::Url) -> Result<Vec<SearchResult>> {
        let host = called_url.host_str().unwrap_or_default();
        let extraction = ExtractionContext {
            searched_string: query.query.clone(),
            engine_url: host.to_string(),
            called_url: called_url.to_string(),
        };
        let user_agents = self.profile.user_agents();
        let mut last_page = None;

        for user_agent in user_agents {
            let request = FetchRequest::new(called_url.as_str(), *user_agent)
                .with_headers(self.headers_for(host, user_agent))
                .with_proxy(query.proxy.clone());

            let page = match self.context.fetcher.fetch(&request).await {
                Ok(page) => page,
                Err(e) => {
                    debug!(engine = %self.shortcut(), user_agent = %user_agent, error = %e, "Fetching result page failed");
                    continue;
                }
            };

            if self.profile.detect_no_results(&page) {
                return Err(SearchError::NoResults {
                    engine: self.shortcut().to_string(),
                    query: query.query.clone(),
                    url: called_url.to_string(),
                });
            }

            match dom::extract(&page, &self.plan, &extraction) {
                Ok(results) if !results.is_empty() => {
                    if results.len() < self.config.min_expected_results {
                        warn!(
                            engine = %self.shortcut(),
                            expected = self.config.min_expected_results,
                            got = results.len(),
                            "Too few search results"
                        );
                    }
                    return Ok(results);
                }
                Ok(_) => {
                    debug!(engine = %self.shortcut(), user_agent = %user_agent, url = %called_url, "No results extracted for user agent");
                }
                Err(e) => {
                    error!(engine = %self.shortcut(), user_agent = %user_agent, url = %called_url, error = %e, "Result page no longer matches the extraction plan");
                }
            }
            last_page = Some(page);
        }

        let artifact = match &last_page {
            Some(page) => self.context.artifacts.persist_or_log(page).await,
            None => None,
        };
        warn!(
            engine = %self.shortcut(),
            url = %called_url,
            user_agents = ?user_agents,
            artifact = ?artifact,
            "Search engine call failed"
        );

        Ok(Vec::new())
    }
}

#[async_trait]
impl<P: DomProfile> Engine for DomEngine<P> {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        let locale = self.config.cache_locale(query);
        match self.context.cache.load(self.shortcut(), &query.query, locale).await {
            Ok(Some(cached)) => {
                debug!(engine = %self.shortcut(), count = cached.len(), "Serving results from cache");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => warn!(engine = %self.shortcut(), error = %e, "Ignoring unreadable cache entry"),
        }

        let called_url = self.build_url(&query.query)?;
        let crawled = self.crawl(query, &called_url).await;
        tokio::time::sleep(self.context.delay_for(self.config.delay())).await;

        let results = match crawled {
            Ok(results) => results,
            Err(e) if e.is_no_results() => {
                info!(engine = %self.shortcut(), url = %called_url, "Engine reported no results");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let results = self.profile.post_process(results);
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
        self.profile.or_operator()
    }
}
