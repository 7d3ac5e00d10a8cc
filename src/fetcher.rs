//! Page fetcher abstraction for retrieving raw page content.

use async_trait::async_trait;

use crate::headers::Headers;
use crate::proxy::ProxyPolicy;
use crate::Result;

/// What kind of payload the caller expects back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentKind {
    /// An HTML document that will be queried with selectors.
    #[default]
    Document,
    /// A script/JSON-like body consumed as plain text.
    Raw,
}

/// Everything a fetcher needs for one attempt. Built fresh per attempt.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub headers: Headers,
    pub user_agent: String,
    pub proxy: ProxyPolicy,
    pub kind: ContentKind,
}

impl FetchRequest {
    /// A document request with no headers and no proxy.
    pub fn new(url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Headers::new(),
            user_agent: user_agent.into(),
            proxy: ProxyPolicy::default(),
            kind: ContentKind::Document,
        }
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_proxy(mut self, proxy: ProxyPolicy) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_kind(mut self, kind: ContentKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Trait for fetching the content of a URL.
///
/// Implementations own transport concerns (timeouts, proxies, TLS); a
/// failed fetch is reported as an error and never retried here.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the body of `request.url`.
    async fn fetch(&self, request: &FetchRequest) -> Result<String>;
}
