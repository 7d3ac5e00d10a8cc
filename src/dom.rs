//! Turns a fetched result page into [`SearchResult`]s using a [`CompiledPlan`].

use scraper::{ElementRef, Html};
use tracing::warn;

use crate::extraction::{CompiledPlan, CompiledTarget};
use crate::{Result, SearchError, SearchResult};

/// Per-call values stamped onto every extracted result.
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    /// The query the page was fetched for.
    pub searched_string: String,
    /// Public host of the engine.
    pub engine_url: String,
    /// The URL the page was fetched from; scheme-relative links inherit its scheme.
    pub called_url: String,
}

/// Extracts results from `page` in document order.
///
/// Zero matching blocks is not an error. A link target in attribute mode
/// that finds no attribute aborts the whole extraction with
/// [`SearchError::ExtractionMismatch`]. Blocks whose link is not an absolute
/// http(s) URL are skipped.
pub fn extract(
    page: &str,
    plan: &CompiledPlan,
    context: &ExtractionContext,
) -> Result<Vec<SearchResult>> {
    let document = Html::parse_document(page);
    let mut results = Vec::new();

    for block in document.select(&plan.block.selector) {
        let raw_link = read_link(block, &plan.link)?;
        let link = match absolutize(&raw_link, &context.called_url) {
            Some(link) => link,
            None => {
                warn!(link = %raw_link, url = %context.called_url, "Not a valid link for search results (skipping)");
                continue;
            }
        };

        let title = read(block, &plan.title).unwrap_or_default();
        let description = std::iter::once(&plan.description)
            .chain(plan.description_alternates.iter())
            .find_map(|target| read(block, target))
            .unwrap_or_default();

        results.push(
            SearchResult::new(link, title)
                .with_description(description)
                .with_searched_string(&context.searched_string)
                .with_engine_url(&context.engine_url),
        );
    }

    Ok(results)
}

/// Returns `link` as an absolute http(s) URL, resolving `//host/...` links
/// against the scheme of `called_url`. `None` if the link is unusable.
pub fn absolutize(link: &str, called_url: &str) -> Option<String> {
    let link = link.trim();
    let candidate = if link.starts_with("//") {
        let scheme = url::Url::parse(called_url)
            .map(|u| u.scheme().to_string())
            .unwrap_or_else(|_| "https".to_string());
        format!("{}:{}", scheme, link)
    } else {
        link.to_string()
    };

    is_valid_link(&candidate).then_some(candidate)
}

/// True for absolute http(s) URLs with a host.
pub fn is_valid_link(link: &str) -> bool {
    match url::Url::parse(link) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

fn read_link(block: ElementRef<'_>, target: &CompiledTarget) -> Result<String> {
    let Some(attribute) = target.source.attribute_name() else {
        return Ok(read(block, target).unwrap_or_default());
    };

    block
        .select(&target.selector)
        .next()
        .and_then(|node| node.value().attr(attribute))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SearchError::ExtractionMismatch {
            target: "link".to_string(),
            selector: target.source.selector().to_string(),
            attribute: attribute.to_string(),
        })
}

/// Reads the first node matching `target` inside `block`. Empty values are `None`.
fn read(block: ElementRef<'_>, target: &CompiledTarget) -> Option<String> {
    let node = block.select(&target.selector).next()?;
    let value = match target.source.attribute_name() {
        Some(attribute) => node.value().attr(attribute)?.trim().to_string(),
        None => normalize_whitespace(&node.text().collect::<String>()),
    };
    (!value.is_empty()).then_some(value)
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
