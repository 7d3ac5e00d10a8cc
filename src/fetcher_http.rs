//! HTTP-based page fetcher using reqwest.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Proxy as ReqwestProxy};
use tracing::debug;

use crate::fetcher::{FetchRequest, PageFetcher};
use crate::proxy::ProxyPool;
use crate::{Result, SearchError};

/// A page fetcher that uses plain HTTP requests via reqwest.
///
/// Requests without a proxy share one client. Proxied requests get a
/// short-lived client bound to the proxy the pool resolves for them.
pub struct HttpFetcher {
    client: Client,
    proxy_pool: Arc<ProxyPool>,
    timeout: Duration,
}

impl HttpFetcher {
    /// Creates a new `HttpFetcher` with a 30 second timeout and no proxies.
    pub fn new() -> Result<Self> {
        Self::with_proxy_pool(Arc::new(ProxyPool::new()), Duration::from_secs(30))
    }

    /// Creates an `HttpFetcher` that resolves proxy policies against `proxy_pool`.
    pub fn with_proxy_pool(proxy_pool: Arc<ProxyPool>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Other(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            proxy_pool,
            timeout,
        })
    }

    fn client_for(&self, request: &FetchRequest) -> Result<Client> {
        let Some(proxy_config) = self.proxy_pool.select(&request.proxy) else {
            return Ok(self.client.clone());
        };

        debug!(
            "Using proxy: {}:{} (usage: {:?})",
            proxy_config.host, proxy_config.port, request.proxy.usage
        );
        let proxy = ReqwestProxy::all(proxy_config.url())
            .map_err(|e| SearchError::Other(format!("Failed to create proxy: {}", e)))?;

        Client::builder()
            .timeout(self.timeout)
            .proxy(proxy)
            .build()
            .map_err(|e| SearchError::Other(format!("Failed to create HTTP client: {}", e)))
    }
}

/// Converts the ordered header list; entries reqwest cannot represent are skipped.
fn header_map(request: &FetchRequest) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (key, value) in request.headers.iter() {
        let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) else {
            debug!(header = %key, "Skipping header that is not valid HTTP");
            continue;
        };
        map.insert(name, value);
    }
    if !map.contains_key(reqwest::header::USER_AGENT) {
        if let Ok(value) = HeaderValue::from_str(&request.user_agent) {
            map.insert(reqwest::header::USER_AGENT, value);
        }
    }
    map
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<String> {
        let client = self.client_for(request)?;
        debug!(url = %request.url, kind = ?request.kind, "Fetching page");
        let response = client
            .get(&request.url)
            .headers(header_map(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Fetch {
                url: request.url.clone(),
                reason: format!("status {}", status),
            });
        }

        Ok(response.text().await?)
    }
}
