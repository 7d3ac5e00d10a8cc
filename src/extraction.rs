//! Declarative description of where result fields live in a page.

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::{Result, SearchError};

/// Where to find a single value: a CSS selector plus what to read from the
/// first matching node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionTarget {
    selector: String,
    attribute: Option<String>,
    prefer_text: bool,
}

impl ExtractionTarget {
    /// Reads the text content of the matched node.
    pub fn text(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            attribute: None,
            prefer_text: true,
        }
    }

    /// Reads the named attribute of the matched node.
    pub fn attribute(selector: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            attribute: Some(attribute.into()),
            prefer_text: false,
        }
    }

    /// Raw constructor. The combination is checked by [`ExtractionTarget::validate`].
    pub fn new(selector: impl Into<String>, attribute: Option<String>, prefer_text: bool) -> Self {
        Self {
            selector: selector.into(),
            attribute,
            prefer_text,
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn attribute_name(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    pub fn prefer_text(&self) -> bool {
        self.prefer_text
    }

    /// Checks that the target reads exactly one kind of value and that its
    /// selector parses.
    pub fn validate(&self) -> Result<()> {
        self.compile().map(|_| ())
    }

    pub(crate) fn compile(&self) -> Result<CompiledTarget> {
        match (&self.attribute, self.prefer_text) {
            (Some(attribute), true) => {
                return Err(SearchError::InvalidTarget(format!(
                    "'{}' reads both attribute '{}' and text",
                    self.selector, attribute
                )))
            }
            (None, false) => {
                return Err(SearchError::InvalidTarget(format!(
                    "'{}' reads neither an attribute nor text",
                    self.selector
                )))
            }
            (Some(attribute), false) if attribute.trim().is_empty() => {
                return Err(SearchError::InvalidTarget(format!(
                    "'{}' has an empty attribute name",
                    self.selector
                )))
            }
            _ => {}
        }

        if self.selector.trim().is_empty() {
            return Err(SearchError::InvalidTarget("empty selector".to_string()));
        }

        let selector = Selector::parse(&self.selector).map_err(|e| {
            SearchError::InvalidTarget(format!("'{}' does not parse: {:?}", self.selector, e))
        })?;

        Ok(CompiledTarget {
            source: self.clone(),
            selector,
        })
    }
}

/// Selectors for one engine's result page.
///
/// `block` matches the repeating result containers; every other target is
/// evaluated relative to each block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionPlan {
    pub block: ExtractionTarget,
    pub link: ExtractionTarget,
    pub title: ExtractionTarget,
    pub description: ExtractionTarget,
    /// Tried in order when `description` yields nothing. CSS has no "first of"
    /// combinator, so alternatives are separate targets.
    #[serde(default)]
    pub description_alternates: Vec<ExtractionTarget>,
}

impl ExtractionPlan {
    pub fn new(
        block: ExtractionTarget,
        link: ExtractionTarget,
        title: ExtractionTarget,
        description: ExtractionTarget,
    ) -> Self {
        Self {
            block,
            link,
            title,
            description,
            description_alternates: Vec::new(),
        }
    }

    pub fn with_description_alternates(mut self, alternates: Vec<ExtractionTarget>) -> Self {
        self.description_alternates = alternates;
        self
    }

    /// Validates every target and pre-parses the selectors.
    pub fn compile(&self) -> Result<CompiledPlan> {
        Ok(CompiledPlan {
            block: self.block.compile()?,
            link: self.link.compile()?,
            title: self.title.compile()?,
            description: self.description.compile()?,
            description_alternates: self
                .description_alternates
                .iter()
                .map(ExtractionTarget::compile)
                .collect::<Result<Vec<_>>>()?,
        })
    }
}

/// A validated target with its parsed selector.
#[derive(Debug, Clone)]
pub struct CompiledTarget {
    pub(crate) source: ExtractionTarget,
    pub(crate) selector: Selector,
}

impl CompiledTarget {
    pub fn target(&self) -> &ExtractionTarget {
        &self.source
    }
}

/// A validated [`ExtractionPlan`], ready to run against pages.
#[derive(Debug, Clone)]
pub struct CompiledPlan {
    pub(crate) block: CompiledTarget,
    pub(crate) link: CompiledTarget,
    pub(crate) title: CompiledTarget,
    pub(crate) description: CompiledTarget,
    pub(crate) description_alternates: Vec<CompiledTarget>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> ExtractionPlan {
        ExtractionPlan::new(
            ExtractionTarget::text("li.b_algo"),
            ExtractionTarget::attribute("h2 a", "href"),
            ExtractionTarget::text("h2"),
            ExtractionTarget::text(".b_caption p"),
        )
    }

    #[test]
    fn test_text_target() {
        let target = ExtractionTarget::text("h2");
        assert_eq!(target.selector(), "h2");
        assert!(target.attribute_name().is_none());
        assert!(target.prefer_text());
        assert!(target.validate().is_ok());
    }

    #[test]
    fn test_attribute_target() {
        let target = ExtractionTarget::attribute("h2 a", "href");
        assert_eq!(target.attribute_name(), Some("href"));
        assert!(!target.prefer_text());
        assert!(target.validate().is_ok());
    }

    #[test]
    fn test_attribute_and_text_is_invalid() {
        let target = ExtractionTarget::new("h2 a", Some("href".to_string()), true);
        let err = target.validate().unwrap_err();
        assert!(matches!(err, SearchError::InvalidTarget(_)));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_neither_attribute_nor_text_is_invalid() {
        let target = ExtractionTarget::new("h2 a", None, false);
        assert!(matches!(target.validate(), Err(SearchError::InvalidTarget(_))));
    }

    #[test]
    fn test_empty_attribute_name_is_invalid() {
        let target = ExtractionTarget::attribute("a", " ");
        assert!(matches!(target.validate(), Err(SearchError::InvalidTarget(_))));
    }

    #[test]
    fn test_unparsable_selector_is_invalid() {
        let target = ExtractionTarget::text("div[[");
        assert!(matches!(target.validate(), Err(SearchError::InvalidTarget(_))));
        assert!(ExtractionTarget::text("  ").validate().is_err());
    }

    #[test]
    fn test_plan_compile() {
        let compiled = plan()
            .with_description_alternates(vec![ExtractionTarget::text(".b_snippet")])
            .compile()
            .unwrap();
        assert_eq!(compiled.description_alternates.len(), 1);
        assert_eq!(compiled.link.target().attribute_name(), Some("href"));
    }

    #[test]
    fn test_plan_compile_fails_on_bad_alternate() {
        let result = plan()
            .with_description_alternates(vec![ExtractionTarget::new("p", Some("x".into()), true)])
            .compile();
        assert!(matches!(result, Err(SearchError::InvalidTarget(_))));
    }

    #[test]
    fn test_multiline_selector_list_parses() {
        let target = ExtractionTarget::text(
            "
            .b_caption p,
            .b_imgcap_altitle p,
            .b_snippetBigText
            ",
        );
        assert!(target.validate().is_ok());
    }
}
