//! Proxy policy and proxy pool.
//!
//! Engines never pick proxies themselves. They forward the caller's
//! [`ProxyPolicy`] with every fetch, and the fetcher resolves it against its
//! [`ProxyPool`].

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

/// Proxy usage tag for search engine result page traffic.
pub const PROXY_USAGE_SERP: &str = "serp";

/// Per-call proxy parameters. Opaque to the engines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyPolicy {
    /// Whether the fetch should go through a proxy at all.
    #[serde(default)]
    pub enabled: bool,
    /// Pins a specific proxy from the pool.
    pub identifier: Option<String>,
    /// What the traffic is used for (e.g. "serp").
    pub usage: Option<String>,
    /// ISO country code the exit node should be located in.
    pub country_code: Option<String>,
}

impl ProxyPolicy {
    /// A policy with proxying disabled.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// A policy with proxying enabled and no further constraints.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Pins a proxy identifier.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Sets the usage tag.
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// Sets the country code.
    pub fn with_country(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }
}

/// Proxy protocol type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProxyProtocol {
    /// HTTP proxy
    #[default]
    Http,
    /// HTTPS proxy
    Https,
    /// SOCKS5 proxy
    Socks5,
}

/// A single proxy configuration.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Proxy host (IP or domain)
    pub host: String,
    /// Proxy port
    pub port: u16,
    /// Proxy protocol
    pub protocol: ProxyProtocol,
    /// Optional username for authentication
    pub username: Option<String>,
    /// Optional password for authentication
    pub password: Option<String>,
    /// Identifier a [`ProxyPolicy`] can pin.
    pub identifier: Option<String>,
    /// Country the proxy exits in.
    pub country_code: Option<String>,
}

impl ProxyConfig {
    /// Creates a new proxy configuration.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            protocol: ProxyProtocol::Http,
            username: None,
            password: None,
            identifier: None,
            country_code: None,
        }
    }

    /// Sets the proxy protocol.
    pub fn with_protocol(mut self, protocol: ProxyProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Sets authentication credentials.
    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets the identifier.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Sets the exit country.
    pub fn with_country(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }

    /// Returns the proxy URL string.
    pub fn url(&self) -> String {
        let scheme = match self.protocol {
            ProxyProtocol::Http => "http",
            ProxyProtocol::Https => "https",
            ProxyProtocol::Socks5 => "socks5",
        };

        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => {
                format!("{}://{}:{}@{}:{}", scheme, user, pass, self.host, self.port)
            }
            _ => format!("{}://{}:{}", scheme, self.host, self.port),
        }
    }
}

/// A fixed set of proxies with round-robin rotation.
#[derive(Debug, Default)]
pub struct ProxyPool {
    proxies: Vec<ProxyConfig>,
    current_index: AtomicUsize,
}

impl ProxyPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pool with the given proxies.
    pub fn with_proxies(proxies: Vec<ProxyConfig>) -> Self {
        Self {
            proxies,
            current_index: AtomicUsize::new(0),
        }
    }

    /// Returns the number of proxies in the pool.
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    /// Returns whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// Resolves a policy to a proxy.
    ///
    /// Disabled policies never get a proxy. A pinned identifier must match
    /// exactly. Otherwise proxies in the requested country are rotated, and
    /// if none match the country the whole pool is rotated.
    pub fn select(&self, policy: &ProxyPolicy) -> Option<ProxyConfig> {
        if !policy.enabled || self.proxies.is_empty() {
            return None;
        }

        if let Some(identifier) = &policy.identifier {
            return self
                .proxies
                .iter()
                .find(|p| p.identifier.as_deref() == Some(identifier.as_str()))
                .cloned();
        }

        let candidates: Vec<&ProxyConfig> = match &policy.country_code {
            Some(country) => {
                let in_country: Vec<_> = self
                    .proxies
                    .iter()
                    .filter(|p| {
                        p.country_code
                            .as_deref()
                            .is_some_and(|c| c.eq_ignore_ascii_case(country))
                    })
                    .collect();
                if in_country.is_empty() {
                    self.proxies.iter().collect()
                } else {
                    in_country
                }
            }
            None => self.proxies.iter().collect(),
        };

        let index = self.current_index.fetch_add(1, Ordering::SeqCst) % candidates.len();
        candidates.get(index).map(|p| (*p).clone())
    }
}
