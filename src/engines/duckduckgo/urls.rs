//! URLs of the two DuckDuckGo requests.

const TOKEN_PAGE_URL: &str = "https://duckduckgo.com/";
const RESULTS_URL: &str = "https://links.duckduckgo.com/d.js";

/// Region parameters sent with the results request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// `l`, e.g. "pl-pl".
    pub locale: String,
    /// `dl`, e.g. "pl".
    pub language: String,
    /// `ct`, e.g. "PL".
    pub country: String,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            locale: "pl-pl".to_string(),
            language: "pl".to_string(),
            country: "PL".to_string(),
        }
    }
}

/// Landing page carrying the `vqd` token. `kp=-1` avoids spurious "No results".
pub(super) fn token_page_url(searched: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("q", searched)
        .append_pair("kp", "-1")
        .finish();
    format!("{}?{}", TOKEN_PAGE_URL, query)
}

/// Results endpoint. The endpoint is strict about parameter order.
pub(super) fn results_url(searched: &str, token: &str, region: &Region) -> String {
    let params: [(&str, &str); 9] = [
        ("q", searched),
        ("l", &region.locale),
        ("p", "1"),
        ("s", "0"),
        ("a", "h_"),
        ("dl", &region.language),
        ("ct", &region.country),
        ("vqd", token),
        ("p_ent", ""),
    ];

    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", RESULTS_URL, query)
}
