//! Bing search engine implementation.

use std::sync::LazyLock;

use regex::Regex;

use crate::extraction::{ExtractionPlan, ExtractionTarget};
use crate::headers::Headers;
use crate::user_agents::CHROME_101;
use crate::EngineConfig;

use super::{DomEngine, DomProfile};

static NO_RESULTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class=["']b_no["']"#).expect("Invalid regex"));

/// Bing search engine.
pub type Bing = DomEngine<BingProfile>;

/// Page layout and request shape of <https://www.bing.com/search>.
#[derive(Debug, Clone, Copy, Default)]
pub struct BingProfile;

impl DomProfile for BingProfile {
    fn config(&self) -> EngineConfig {
        EngineConfig::new("Bing", "bing")
    }

    fn base_url(&self) -> &'static str {
        "https://www.bing.com/search"
    }

    fn extra_parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[("count", "8")]
    }

    fn headers(&self) -> Headers {
        // The sec-ch-ua values must describe the same browser as CHROME_101.
        Headers::new()
            .with("cookie", "SRCHHPGUSR=SRCHLANG=en; _EDGE_V=1; SRCHD=AF=NOFORM; SUID=M")
            .with("accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9")
            .with("cache-control", "no-cache")
            .with("sec-ch-ua", r#"" Not A;Brand";v="99", "Chromium";v="101", "Google Chrome";v="101""#)
            .with("referer", "https://www.bing.com/")
            .with("sec-ch-ua-arch", "x86")
            .with("sec-ch-ua-bitness", "64")
            .with("sec-ch-ua-full-version", "101.0.4951.64")
            .with("sec-ch-ua-mobile", "?0")
            .with("sec-ch-ua-platform", r#""Linux""#)
            .with("sec-fetch-dest", "document")
            .with("sec-fetch-mode", "navigate")
            .with("sec-fetch-site", "same-origin")
            .with("sec-fetch-user", "?1")
            .with("upgrade-insecure-requests", "1")
    }

    fn user_agents(&self) -> &'static [&'static str] {
        &[CHROME_101]
    }

    fn plan(&self) -> ExtractionPlan {
        // Result blocks with images, tab boxes and rich cards keep their
        // snippet in different places.
        ExtractionPlan::new(
            ExtractionTarget::text("ol#b_results li.b_algo"),
            ExtractionTarget::attribute("h2 a", "href"),
            ExtractionTarget::text("h2, h2 > a"),
            ExtractionTarget::text(
                ".b_caption p, .b_imgcap_altitle p, .tab-content > div[data-priority=\"\"], .b_caption .b_richcard .b_mText .b_divsec span, .b_snippetBigText",
            ),
        )
    }

    fn detect_no_results(&self, page: &str) -> bool {
        NO_RESULTS.is_match(page)
    }

    fn or_operator(&self) -> Option<&'static str> {
        Some("OR")
    }
}
