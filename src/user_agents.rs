//! User agent strings engines are known to work with.

/// Chrome 43 on Windows 7. Used when an engine declares no user agents.
pub const CHROME_43: &str = "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/43.0.2357.130 Safari/537.36";

/// Chrome 101 on Linux. Keep in sync with the `sec-ch-ua` headers that
/// accompany it.
pub const CHROME_101: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/101.0.4951.64 Safari/537.36";

/// Fallback user agent.
pub const DEFAULT_USER_AGENT: &str = CHROME_43;
