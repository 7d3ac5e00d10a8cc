//! DuckDuckGo HTML-only search engine implementation.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::dom::is_valid_link;
use crate::extraction::{ExtractionPlan, ExtractionTarget};
use crate::{EngineConfig, SearchResult};

use super::{DomEngine, DomProfile};

static NO_RESULTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class=["']no-results["']"#).expect("Invalid regex"));

/// DuckDuckGo search through <https://html.duckduckgo.com/html>.
///
/// Less accurate than the token-based [`DuckDuckGo`](super::DuckDuckGo)
/// but needs a single request.
pub type DuckDuckGoHtml = DomEngine<DuckDuckGoHtmlProfile>;

#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDuckGoHtmlProfile;

impl DomProfile for DuckDuckGoHtmlProfile {
    fn config(&self) -> EngineConfig {
        EngineConfig::new("DuckDuckGo HTML", "ddg_html")
    }

    fn base_url(&self) -> &'static str {
        "https://html.duckduckgo.com/html"
    }

    fn extra_parameters(&self) -> &'static [(&'static str, &'static str)] {
        // dc: offset in multiples of 30. kp=-1 avoids spurious "No results".
        &[("dc", "0"), ("kp", "-1")]
    }

    fn plan(&self) -> ExtractionPlan {
        ExtractionPlan::new(
            ExtractionTarget::text("#links .results_links > .links_deep"),
            ExtractionTarget::attribute("h2.result__title a", "href"),
            ExtractionTarget::text(".result__title"),
            ExtractionTarget::text(".result__snippet"),
        )
    }

    fn detect_no_results(&self, page: &str) -> bool {
        NO_RESULTS.is_match(page)
    }

    fn post_process(&self, results: Vec<SearchResult>) -> Vec<SearchResult> {
        results
            .into_iter()
            .filter(|result| !result.link.contains("ad_provider"))
            .map(|mut result| {
                if let Some(target) = unwrap_redirect(&result.link) {
                    result.link = target;
                }
                result
            })
            .collect()
    }

    fn or_operator(&self) -> Option<&'static str> {
        Some("OR")
    }
}

/// Returns the real target of a `duckduckgo.com/l/?uddg=...` redirect link.
fn unwrap_redirect(link: &str) -> Option<String> {
    let url = url::Url::parse(link).ok()?;
    if url.host_str() != Some("duckduckgo.com") || url.path() != "/l/" {
        return None;
    }

    let target = url
        .query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, value)| value.into_owned())?;

    if !is_valid_link(&target) {
        debug!(link = %link, "Redirect target is not a valid link, keeping the wrapped one");
        return None;
    }
    Some(target)
}
