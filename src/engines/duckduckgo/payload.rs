//! Parser for the script body returned by `links.duckduckgo.com/d.js`.
//!
//! The results are the array passed to `DDG.pageLayout.load('d', [...])`.
//! Each entry carries `u` (link), `t` (title, HTML) and `a` (abstract, HTML);
//! the trailing pagination entry has none of them.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use serde::Deserialize;
use tracing::debug;

use crate::dom::{absolutize, normalize_whitespace};
use crate::{Result, SearchError, SearchResult};

/// Start of the results call; the array itself is read by the JSON parser
/// since its strings may contain `]);`.
static RESULTS_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"DDG\.pageLayout\.load\(\s*'d'\s*,\s*\[").expect("Invalid regex")
});

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    u: Option<String>,
    #[serde(default)]
    t: Option<String>,
    #[serde(default)]
    a: Option<String>,
}

/// Parses the payload into results stamped with `searched` and `engine_url`.
///
/// An array without any link-bearing entry is the engine's "no results"
/// answer and yields [`SearchError::NoResults`].
pub(super) fn parse_results(
    body: &str,
    searched: &str,
    engine_url: &str,
    called_url: &str,
) -> Result<Vec<SearchResult>> {
    let call = RESULTS_CALL.find(body).ok_or_else(|| {
        SearchError::Protocol("Results payload not found in DuckDuckGo response".to_string())
    })?;

    // The match ends right after the opening bracket of the array.
    let array = &body[call.end() - 1..];
    let entries: Vec<Entry> = serde_json::Deserializer::from_str(array)
        .into_iter::<Vec<Entry>>()
        .next()
        .unwrap_or_else(|| Err(serde::de::Error::custom("empty results array")))
        .map_err(|e| SearchError::Parse(format!("Invalid DuckDuckGo results payload: {}", e)))?;

    let linked: Vec<_> = entries
        .into_iter()
        .filter_map(|entry| Some((entry.u?, entry.t, entry.a)))
        .collect();

    if linked.is_empty() {
        return Err(SearchError::NoResults {
            engine: "ddg".to_string(),
            query: searched.to_string(),
            url: called_url.to_string(),
        });
    }

    let mut results = Vec::with_capacity(linked.len());
    for (raw_link, title, description) in linked {
        let Some(link) = absolutize(&raw_link, called_url) else {
            debug!(link = %raw_link, "Not a valid link for search results (skipping)");
            continue;
        };
        results.push(
            SearchResult::new(link, strip_html(title.as_deref().unwrap_or_default()))
                .with_description(strip_html(description.as_deref().unwrap_or_default()))
                .with_searched_string(searched)
                .with_engine_url(engine_url),
        );
    }

    Ok(results)
}

/// Text content of an HTML fragment, entities decoded.
fn strip_html(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    normalize_whitespace(&parsed.root_element().text().collect::<String>())
}
