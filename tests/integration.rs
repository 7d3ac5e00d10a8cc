//! Integration tests for the search orchestration.
//!
//! Most tests run against stub fetchers. The ones hitting real search
//! engines are marked with `#[ignore]` because they require network access
//! and may be slow or flaky.
//!
//! Run them with: `cargo test --test integration -- --ignored`

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use scrape_search::artifact::ArtifactSink;
use scrape_search::cache::{FileStore, ResultCache};
use scrape_search::engines::{Bing, DuckDuckGo, DuckDuckGoHtml, EngineContext, Region};
use scrape_search::fetcher::{FetchRequest, PageFetcher};
use scrape_search::proxy::ProxyPool;
use scrape_search::{
    Engine, EngineConfig, Result, Search, SearchError, SearchOptions, SearchQuery, SearchResult,
    SessionState, Settings,
};

/// Serves canned pages by URL prefix and records every requested URL.
#[derive(Default)]
struct StubFetcher {
    routes: Vec<(&'static str, String)>,
    requested: Mutex<Vec<String>>,
}

impl StubFetcher {
    fn route(mut self, prefix: &'static str, page: impl Into<String>) -> Self {
        self.routes.push((prefix, page.into()));
        self
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<String> {
        self.requested.lock().unwrap().push(request.url.clone());
        self.routes
            .iter()
            .find(|(prefix, _)| request.url.starts_with(prefix))
            .map(|(_, page)| page.clone())
            .ok_or_else(|| SearchError::Fetch {
                url: request.url.clone(),
                reason: "status 503 Service Unavailable".to_string(),
            })
    }
}

fn context(fetcher: Arc<StubFetcher>) -> EngineContext {
    EngineContext::new(fetcher).with_delay(Duration::ZERO)
}

const DDG_HTML_PAGE: &str = r#"<html><body><div id="links">
    <div class="results_links"><div class="links_deep">
        <h2 class="result__title"><a href="https://support.hp.com/us-en/product/hp-deskjet-2700/manuals">HP DeskJet 2700 manuals</a></h2>
        <a class="result__snippet">User guides and setup documents.</a>
    </div></div>
    <div class="results_links"><div class="links_deep">
        <h2 class="result__title"><a href="https://duckduckgo.com/y.js?ad_provider=bingv7aa&amp;u3=printer">Buy printer ink</a></h2>
        <a class="result__snippet">Sponsored.</a>
    </div></div>
    <div class="results_links"><div class="links_deep">
        <h2 class="result__title"><a href="javascript:void(0)">Broken entry</a></h2>
        <a class="result__snippet">Nothing to see.</a>
    </div></div>
    <div class="results_links"><div class="links_deep">
        <h2 class="result__title"><a href="https://duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.manualslib.com%2Fproducts%2FHp-Deskjet-2700.html">HP DeskJet 2700 Manuals | ManualsLib</a></h2>
        <a class="result__snippet">Manuals and user guides for HP DeskJet 2700.</a>
    </div></div>
</div></body></html>"#;

const BING_NO_RESULTS_PAGE: &str = r#"<html><body><ol id="b_results">
    <li class="b_no"><h1>There are no results for <strong>hp 2700 printer manual pdf</strong></h1></li>
</ol></body></html>"#;

#[tokio::test]
async fn test_end_to_end_drops_malformed_and_ad_blocks() {
    let fetcher = Arc::new(StubFetcher::default().route("https://html.duckduckgo.com/", DDG_HTML_PAGE));
    let search = Search::with_default_engines(context(fetcher.clone())).unwrap();

    let query = SearchQuery::new("hp 2700 printer manual pdf");
    let results = search
        .search(&query, &["ddg_html"], SearchOptions::new())
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    for result in &results {
        assert!(!result.title.is_empty());
        assert!(!result.link.is_empty());
        assert_eq!(result.searched_string, "hp 2700 printer manual pdf");
    }
    assert_eq!(
        results[0].link,
        "https://support.hp.com/us-en/product/hp-deskjet-2700/manuals"
    );
    assert_eq!(
        results[1].link,
        "https://www.manualslib.com/products/Hp-Deskjet-2700.html"
    );
    assert_eq!(fetcher.requested().len(), 1);
}

#[tokio::test]
async fn test_falls_back_after_no_results_page() {
    let fetcher = Arc::new(
        StubFetcher::default()
            .route("https://www.bing.com/", BING_NO_RESULTS_PAGE)
            .route("https://html.duckduckgo.com/", DDG_HTML_PAGE),
    );
    let search = Search::with_default_engines(context(fetcher.clone())).unwrap();

    let query = SearchQuery::new("hp 2700 printer manual pdf");
    let results = search
        .search(&query, &["bing", "ddg_html"], SearchOptions::new())
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    let requested = fetcher.requested();
    assert_eq!(requested.len(), 2);
    assert!(requested[0].starts_with("https://www.bing.com/search?q=hp+2700+printer+manual+pdf"));
    assert!(requested[1].starts_with("https://html.duckduckgo.com/html?q="));
}

#[tokio::test]
async fn test_every_engine_failing_yields_empty_list() {
    let fetcher = Arc::new(StubFetcher::default());
    let search = Search::with_default_engines(context(fetcher.clone())).unwrap();

    let query = SearchQuery::new("hp 2700 printer manual pdf");
    let results = search
        .search(&query, &["bing", "yahoo"], SearchOptions::new())
        .await
        .unwrap();

    assert!(results.is_empty());
    assert_eq!(fetcher.requested().len(), 2);
}

struct FixedEngine {
    config: EngineConfig,
    links: Vec<&'static str>,
}

impl FixedEngine {
    fn new(shortcut: &str, links: Vec<&'static str>) -> Self {
        Self {
            config: EngineConfig::new(shortcut.to_uppercase(), shortcut),
            links,
        }
    }
}

#[async_trait]
impl Engine for FixedEngine {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        Ok(self
            .links
            .iter()
            .map(|link| {
                SearchResult::new(*link, "HP 2700 manual")
                    .with_searched_string(&query.query)
                    .with_engine_url("stub.test")
            })
            .collect())
    }
}

#[tokio::test]
async fn test_extension_filter_applies_after_engine() {
    let mut search = Search::new();
    search.add_engine(FixedEngine::new(
        "stub",
        vec![
            "https://a.test/manual.pdf",
            "https://b.test/manual.html",
            "https://c.test/guide.PDF",
        ],
    ));

    let options = SearchOptions::new().with_excluded_extensions([".pdf"]);
    let mut session = search.session(&["stub"], options).unwrap();
    assert_eq!(session.select_next(), Some("stub"));

    let results = session.run(&SearchQuery::new("hp 2700 manual")).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].link, "https://b.test/manual.html");
    assert_eq!(
        session.state(),
        &SessionState::Finished {
            engine: "stub".to_string(),
            count: 1,
            removed: 2,
        }
    );
    assert_eq!(session.select_next(), None);
    assert_eq!(session.state(), &SessionState::Exhausted);
}

#[tokio::test]
async fn test_engine_validation() {
    let search = Search::with_default_engines(context(Arc::new(StubFetcher::default()))).unwrap();
    let query = SearchQuery::new("hp 2700 manual");

    let err = search
        .search(&query, &["bing", "altavista"], SearchOptions::new())
        .await
        .unwrap_err();
    match err {
        SearchError::EngineNotSupported {
            requested,
            supported,
        } => {
            assert_eq!(requested, vec!["altavista".to_string()]);
            assert!(supported.contains(&"bing".to_string()));
            assert!(!supported.contains(&"google".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = search
        .search(&query, &["google"], SearchOptions::new())
        .await
        .unwrap_err();
    assert!(err.is_configuration());

    let err = search
        .search(&query, &[" "], SearchOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::NoEnginesSelected));

    let err = search
        .search(&SearchQuery::new("   "), &["bing"], SearchOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::InvalidQuery(_)));
}

#[tokio::test]
async fn test_force_allow_unlocks_restricted_engine() {
    let fetcher = Arc::new(StubFetcher::default());
    let search = Search::with_default_engines(context(fetcher.clone())).unwrap();
    assert_eq!(search.restricted_engines(), vec!["google".to_string()]);

    let options = SearchOptions::new().with_force_allow(["google"]);
    let results = search
        .search(&SearchQuery::new("hp 2700 manual"), &["google"], options)
        .await
        .unwrap();

    assert!(results.is_empty());
    let requested = fetcher.requested();
    assert!(!requested.is_empty());
    assert!(requested
        .iter()
        .all(|url| url.starts_with("https://www.google.com/search?q=hp+2700+manual")));
}

#[tokio::test]
async fn test_results_cached_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ResultCache::new(Arc::new(FileStore::new(dir.path())));

    let fetcher = Arc::new(StubFetcher::default().route("https://html.duckduckgo.com/", DDG_HTML_PAGE));
    let engine = DuckDuckGoHtml::new(context(fetcher.clone()).with_cache(cache.clone())).unwrap();
    let query = SearchQuery::new("hp 2700 printer manual pdf");

    let first = engine.search(&query).await.unwrap();
    assert_eq!(first.len(), 2);

    // A fresh engine over the same directory must not touch the network.
    let offline = Arc::new(StubFetcher::default());
    let cache = ResultCache::new(Arc::new(FileStore::new(dir.path())));
    let engine = DuckDuckGoHtml::new(context(offline.clone()).with_cache(cache)).unwrap();
    let second = engine.search(&query).await.unwrap();

    assert_eq!(first, second);
    assert!(offline.requested().is_empty());
}

#[tokio::test]
async fn test_failed_engine_leaves_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let page = "<html><body><p>Our systems have detected unusual traffic</p></body></html>";
    let fetcher = Arc::new(StubFetcher::default().route("https://www.bing.com/", page));

    let engine = Bing::new(context(fetcher).with_artifacts(ArtifactSink::new(dir.path()))).unwrap();

    let results = engine.search(&SearchQuery::new("hp 2700 manual")).await.unwrap();
    assert!(results.is_empty());

    let written: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(written.len(), 1);
    assert!(std::fs::read_to_string(&written[0])
        .unwrap()
        .contains("unusual traffic"));
}

#[tokio::test]
async fn test_token_engine_uses_custom_region() {
    let fetcher = Arc::new(
        StubFetcher::default()
            .route(
                "https://duckduckgo.com/",
                r#"<script>nrje('/d.js?q=drucker',vqd="4-1234",safe_ddg=0);</script>"#,
            )
            .route(
                "https://links.duckduckgo.com/",
                r#"DDG.pageLayout.load('d',[{"a":"Handbuch","t":"HP Drucker","u":"https://support.hp.com/de-de/"}]);"#,
            ),
    );
    let region = Region {
        locale: "de-de".to_string(),
        language: "de".to_string(),
        country: "DE".to_string(),
    };
    let engine = DuckDuckGo::new(context(fetcher.clone())).with_region(region.clone());
    assert_eq!(engine.region(), &region);

    let results = engine.search(&SearchQuery::new("drucker")).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].link, "https://support.hp.com/de-de/");

    let requested = fetcher.requested();
    assert_eq!(requested.len(), 2);
    assert!(requested[1].contains("&l=de-de&"));
    assert!(requested[1].contains("&dl=de&ct=DE&"));
}

mod live {
    use super::*;

    async fn live_search(engines: &[&str], query: &str) -> Vec<SearchResult> {
        let context = EngineContext::from_settings(&Settings::from_env(), Arc::new(ProxyPool::new()))
            .expect("Failed to build engine context");
        let search = Search::with_default_engines(context).expect("Failed to register engines");
        let results = search
            .search(&SearchQuery::new(query), engines, SearchOptions::new())
            .await
            .unwrap_or_default();

        println!("{:?} returned {} results for '{}'", engines, results.len(), query);
        for (i, result) in results.iter().take(3).enumerate() {
            println!("  {}. {} - {}", i + 1, result.title, result.link);
        }
        results
    }

    #[tokio::test]
    #[ignore]
    async fn test_bing_search() {
        let results = live_search(&["bing"], "rust programming language").await;
        assert!(!results.is_empty(), "Bing should return results");
    }

    #[tokio::test]
    #[ignore]
    async fn test_duckduckgo_html_search() {
        let results = live_search(&["ddg_html"], "rust programming language").await;
        assert!(!results.is_empty(), "DuckDuckGo HTML should return results");
    }

    #[tokio::test]
    #[ignore]
    async fn test_duckduckgo_token_search() {
        let results = live_search(&["ddg"], "rust programming language").await;
        println!("Token based DuckDuckGo returned {} results", results.len());
    }

    #[tokio::test]
    #[ignore]
    async fn test_fallback_chain() {
        let results = live_search(&["bing", "ddg_html", "yahoo"], "hp 2700 printer manual").await;
        assert!(!results.is_empty(), "At least one engine should return results");
    }
}
