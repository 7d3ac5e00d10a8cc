//! # scrape-search
//!
//! Web search by scraping the result pages of several search engines.
//!
//! Engines are fragile: layouts drift, user agents get banned and some
//! answers are explicit "no results" pages. This library hides that behind
//! a uniform [`SearchResult`] and:
//!
//! - Tries the requested engines in order until one returns results
//! - Retries each engine with every user agent it is known to work with
//! - Stops immediately when an engine reports that nothing exists
//! - Caches results per engine, query and locale
//! - Filters results by file extension
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use scrape_search::{engines::EngineContext, proxy::ProxyPool, Search, SearchOptions, SearchQuery, Settings};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let context = EngineContext::from_settings(&Settings::from_env(), Arc::new(ProxyPool::new()))?;
//!     let search = Search::with_default_engines(context)?;
//!
//!     let query = SearchQuery::new("hp 2700 printer manual");
//!     let options = SearchOptions::new().with_excluded_extensions(["pdf"]);
//!     let results = search.search(&query, &["bing", "ddg_html"], options).await?;
//!
//!     for result in &results {
//!         println!("{}: {}", result.title, result.link);
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod engine;
mod error;
mod filter;
mod premium;
mod query;
mod result;
mod search;

pub mod artifact;
pub mod cache;
pub mod dom;
pub mod engines;
pub mod extraction;
pub mod fetcher;
pub mod fetcher_http;
pub mod headers;
pub mod proxy;
pub mod user_agents;

pub use config::Settings;
pub use engine::{Engine, EngineConfig};
pub use error::{Result, SearchError};
pub use filter::{FilterOutcome, ResultFilter};
pub use premium::{PremiumSearch, PREMIUM_CACHE_IDENTITY, PREMIUM_ENGINE};
pub use query::SearchQuery;
pub use result::SearchResult;
pub use search::{Search, SearchOptions, SearchSession, SessionState};
