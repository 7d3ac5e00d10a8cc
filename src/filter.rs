//! Post-filters applied to engine results before they reach the caller.

use std::collections::HashSet;

use tracing::info;

use crate::SearchResult;

/// Outcome of [`ResultFilter::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    pub results: Vec<SearchResult>,
    pub removed: usize,
}

/// Removes results whose link points at an excluded file type.
#[derive(Debug, Clone, Default)]
pub struct ResultFilter {
    excluded_extensions: HashSet<String>,
}

impl ResultFilter {
    /// Extensions are compared case-insensitively, with or without a leading dot.
    pub fn new<I, S>(excluded_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            excluded_extensions: excluded_extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.excluded_extensions.is_empty()
    }

    /// Returns the kept results in their original order.
    pub fn apply(&self, results: Vec<SearchResult>) -> FilterOutcome {
        if self.is_empty() {
            return FilterOutcome {
                results,
                removed: 0,
            };
        }

        let original = results.len();
        let kept: Vec<SearchResult> = results
            .into_iter()
            .filter(|result| {
                result
                    .link_extension()
                    .map_or(true, |ext| !self.excluded_extensions.contains(&ext))
            })
            .collect();
        let removed = original - kept.len();

        if removed > 0 {
            info!(
                original_count = original,
                count_after_filtering = kept.len(),
                "Some search engine results were filtered out due to extension filter"
            );
        }

        FilterOutcome {
            results: kept,
            removed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(links: &[&str]) -> Vec<SearchResult> {
        links
            .iter()
            .map(|link| SearchResult::new(*link, "title"))
            .collect()
    }

    #[test]
    fn test_excludes_matching_extensions() {
        let filter = ResultFilter::new(["pdf"]);
        let outcome = filter.apply(results(&[
            "https://a.test/manual.pdf",
            "https://b.test/page.html",
            "https://c.test/guide.pdf",
        ]));
        assert_eq!(outcome.removed, 2);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].link, "https://b.test/page.html");
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = ResultFilter::default();
        assert!(filter.is_empty());
        let outcome = filter.apply(results(&["https://a.test/x.pdf"]));
        assert_eq!(outcome.removed, 0);
        assert_eq!(outcome.results.len(), 1);
    }

    #[test]
    fn test_extension_normalization() {
        let filter = ResultFilter::new([".PDF", " doc ", ""]);
        let outcome = filter.apply(results(&[
            "https://a.test/x.pdf?download=1",
            "https://a.test/y.Doc",
            "https://a.test/pdf",
            "https://a.test/",
        ]));
        assert_eq!(outcome.removed, 2);
        let links: Vec<_> = outcome.results.iter().map(|r| r.link.as_str()).collect();
        assert_eq!(links, vec!["https://a.test/pdf", "https://a.test/"]);
    }

    #[test]
    fn test_order_is_preserved() {
        let filter = ResultFilter::new(vec!["zip".to_string()]);
        let outcome = filter.apply(results(&[
            "https://a.test/1",
            "https://a.test/2.zip",
            "https://a.test/3",
        ]));
        let links: Vec<_> = outcome.results.iter().map(|r| r.link.as_str()).collect();
        assert_eq!(links, vec!["https://a.test/1", "https://a.test/3"]);
    }
}
