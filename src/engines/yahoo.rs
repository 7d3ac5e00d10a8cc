//! Yahoo search engine implementation.

use crate::extraction::{ExtractionPlan, ExtractionTarget};
use crate::EngineConfig;

use super::{DomEngine, DomProfile};

/// Yahoo search engine.
pub type Yahoo = DomEngine<YahooProfile>;

#[derive(Debug, Clone, Copy, Default)]
pub struct YahooProfile;

impl DomProfile for YahooProfile {
    fn config(&self) -> EngineConfig {
        EngineConfig::new("Yahoo", "yahoo")
    }

    fn base_url(&self) -> &'static str {
        "https://search.yahoo.com/search"
    }

    fn query_parameter(&self) -> &'static str {
        "p"
    }

    fn plan(&self) -> ExtractionPlan {
        ExtractionPlan::new(
            ExtractionTarget::text("ol.searchCenterMiddle > li .algo"),
            ExtractionTarget::attribute("h3.title a", "href"),
            ExtractionTarget::text("h3.title a"),
            ExtractionTarget::text("div.compText p"),
        )
    }

    fn detect_no_results(&self, page: &str) -> bool {
        page.contains("We did not find results for")
    }

    fn or_operator(&self) -> Option<&'static str> {
        Some("OR")
    }
}
