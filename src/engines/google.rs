//! Google search engine implementation.
//!
//! Google bans direct scraping quickly; it is only registered as a
//! restricted engine and meant to run behind a SERP proxy.

use crate::extraction::{ExtractionPlan, ExtractionTarget};
use crate::EngineConfig;

use super::{DomEngine, DomProfile};

/// Google search engine.
pub type Google = DomEngine<GoogleProfile>;

#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleProfile;

impl DomProfile for GoogleProfile {
    fn config(&self) -> EngineConfig {
        // Results differ per exit country, so the locale is part of the cache key.
        EngineConfig::new("Google", "google").with_locale_sensitive(true)
    }

    fn base_url(&self) -> &'static str {
        "https://www.google.com/search"
    }

    fn plan(&self) -> ExtractionPlan {
        // data-sncf tells which kind of snippet a block carries.
        ExtractionPlan::new(
            ExtractionTarget::text("#search div[data-hveid][data-ved] > div[data-snc]"),
            ExtractionTarget::attribute("div a", "href"),
            ExtractionTarget::text("div a > h3"),
            ExtractionTarget::text("div:nth-of-type(2)[data-sncf=\"1\"]"),
        )
        .with_description_alternates(vec![
            ExtractionTarget::text("div:nth-of-type(3)[data-snf]"),
            ExtractionTarget::text(
                "div:nth-of-type(2)[data-sncf=\"0,1,2,3\"] + div[data-sncf=\"2\"]",
            ),
        ])
    }

    fn detect_no_results(&self, page: &str) -> bool {
        page.contains("did not match any documents")
    }

    fn or_operator(&self) -> Option<&'static str> {
        Some("OR")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{extract, ExtractionContext};

    #[test]
    fn test_google_profile() {
        assert_eq!(GoogleProfile.config().shortcut, "google");
        assert!(GoogleProfile.config().locale_sensitive);
        assert_eq!(GoogleProfile.plan().description_alternates.len(), 2);
        assert!(GoogleProfile.plan().compile().is_ok());
    }

    #[test]
    fn test_google_description_alternates() {
        let page = r#"<div id="search">
            <div data-hveid="A" data-ved="1"><div data-snc="x">
                <div><a href="https://serde.rs/"><h3>Serde</h3></a></div>
                <div data-sncf="1">Primary snippet</div>
            </div></div>
            <div data-hveid="B" data-ved="2"><div data-snc="y">
                <div><a href="https://docs.rs/serde_json"><h3>serde_json</h3></a></div>
                <div data-sncf="0">not a snippet</div>
                <div data-snf="z">Alternate snippet</div>
            </div></div>
        </div>"#;
        let context = ExtractionContext {
            searched_string: "serde".to_string(),
            engine_url: "www.google.com".to_string(),
            called_url: "https://www.google.com/search?q=serde".to_string(),
        };
        let plan = GoogleProfile.plan().compile().unwrap();
        let results = extract(page, &plan, &context).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Serde");
        assert_eq!(results[0].description.as_deref(), Some("Primary snippet"));
        assert_eq!(results[1].link, "https://docs.rs/serde_json");
        assert_eq!(results[1].description.as_deref(), Some("Alternate snippet"));
    }
}
