//! Reads the `vqd` session token out of the DuckDuckGo landing page.

use std::sync::LazyLock;

use regex::Regex;

use crate::{Result, SearchError};

static VQD_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"vqd=['"](?P<token>[^'"]+)['"],safe_ddg"#).expect("Invalid regex")
});

/// Extracts the token. A missing token means the page layout changed.
pub(super) fn extract_token(page: &str) -> Result<String> {
    VQD_TOKEN
        .captures(page)
        .and_then(|captures| captures.name("token"))
        .map(|token| token.as_str().to_string())
        .ok_or_else(|| {
            SearchError::Protocol(
                "Could not extract the `vqd` token from DuckDuckGo page content".to_string(),
            )
        })
}
