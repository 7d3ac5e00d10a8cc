//! Search orchestration.
//!
//! [`Search`] is the engine registry. Every call works on its own
//! [`SearchSession`], which tries the requested engines one at a time in the
//! requested order and never runs the same engine twice.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::engines::{Bing, DuckDuckGo, DuckDuckGoHtml, EngineContext, Google, Yahoo};
use crate::filter::ResultFilter;
use crate::proxy::ProxyPolicy;
use crate::{Engine, Result, SearchError, SearchQuery, SearchResult};

/// Per-call options of [`Search::session`] and [`Search::search`].
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Replaces the query's own proxy policy when set.
    pub proxy: Option<ProxyPolicy>,
    /// Results linking to files with these extensions are dropped.
    pub excluded_extensions: Vec<String>,
    /// Engine ids allowed even though they are restricted or unknown.
    pub force_allow: Vec<String>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_proxy(mut self, proxy: ProxyPolicy) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn with_excluded_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_force_allow<I, S>(mut self, engines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.force_allow = engines.into_iter().map(Into::into).collect();
        self
    }
}

/// Registry of engines, keyed by shortcut.
pub struct Search {
    engines: Vec<Arc<dyn Engine>>,
    restricted: Vec<Arc<dyn Engine>>,
}

impl Search {
    /// Creates a new search instance.
    pub fn new() -> Self {
        Self {
            engines: Vec::new(),
            restricted: Vec::new(),
        }
    }

    /// Registers Bing, DuckDuckGo HTML, Yahoo and DuckDuckGo as available
    /// engines and Google as a restricted one.
    pub fn with_default_engines(context: EngineContext) -> Result<Self> {
        let mut search = Self::new();
        search.add_engine(Bing::new(context.clone())?);
        search.add_engine(DuckDuckGoHtml::new(context.clone())?);
        search.add_engine(Yahoo::new(context.clone())?);
        search.add_engine(DuckDuckGo::new(context.clone()));
        search.add_restricted_engine(Google::new(context)?);
        Ok(search)
    }

    /// Adds a search engine.
    pub fn add_engine<E: Engine + 'static>(&mut self, engine: E) {
        debug!(engine = %engine.shortcut(), "Registered engine");
        self.engines.push(Arc::new(engine));
    }

    /// Adds an engine that may only be used when force-allowed.
    pub fn add_restricted_engine<E: Engine + 'static>(&mut self, engine: E) {
        debug!(engine = %engine.shortcut(), "Registered restricted engine");
        self.restricted.push(Arc::new(engine));
    }

    /// Returns the number of configured engines, restricted ones included.
    pub fn engine_count(&self) -> usize {
        self.engines.len() + self.restricted.len()
    }

    /// Shortcuts of the engines usable without force-allowing.
    pub fn available_engines(&self) -> Vec<String> {
        self.engines.iter().map(|e| e.shortcut().to_string()).collect()
    }

    /// Shortcuts of the engines usable only when force-allowed.
    pub fn restricted_engines(&self) -> Vec<String> {
        self.restricted.iter().map(|e| e.shortcut().to_string()).collect()
    }

    /// Looks up a registered engine, restricted ones included.
    pub fn engine(&self, shortcut: &str) -> Option<Arc<dyn Engine>> {
        self.engines
            .iter()
            .chain(self.restricted.iter())
            .find(|e| e.shortcut() == shortcut)
            .cloned()
    }

    /// Validates the requested engines and opens a session over them.
    ///
    /// Every requested engine must be available or force-allowed; the error
    /// names the ones that are neither.
    pub fn session<S: AsRef<str>>(
        &self,
        requested: &[S],
        options: SearchOptions,
    ) -> Result<SearchSession> {
        let mut seen = HashSet::new();
        let requested: Vec<String> = requested
            .iter()
            .map(|id| id.as_ref().trim().to_string())
            .filter(|id| !id.is_empty() && seen.insert(id.clone()))
            .collect();

        if requested.is_empty() {
            return Err(SearchError::NoEnginesSelected);
        }

        let available = self.available_engines();
        let rejected: Vec<String> = requested
            .iter()
            .filter(|id| !available.contains(id) && !options.force_allow.contains(id))
            .cloned()
            .collect();
        if !rejected.is_empty() {
            return Err(SearchError::EngineNotSupported {
                requested: rejected,
                supported: available,
            });
        }

        let candidates = requested
            .into_iter()
            .map(|id| {
                let engine = self.engine(&id);
                (id, engine)
            })
            .collect();

        Ok(SearchSession {
            candidates,
            tried: Vec::new(),
            current: None,
            state: SessionState::Ready,
            filter: ResultFilter::new(&options.excluded_extensions),
            proxy: options.proxy,
        })
    }

    /// Tries the requested engines in order until one returns results.
    ///
    /// Only configuration problems are errors; failing engines are logged
    /// and skipped, so an empty list means every engine came back empty.
    pub async fn search<S: AsRef<str>>(
        &self,
        query: &SearchQuery,
        engines: &[S],
        options: SearchOptions,
    ) -> Result<Vec<SearchResult>> {
        if query.is_blank() {
            return Err(SearchError::InvalidQuery("Query cannot be empty".into()));
        }

        let mut session = self.session(engines, options)?;
        while session.select_next().is_some() {
            let results = session.run(query).await?;
            if !results.is_empty() {
                return Ok(results);
            }
        }

        Ok(Vec::new())
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}

/// Observable progress of a [`SearchSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Validated, nothing selected yet.
    Ready,
    /// An engine is selected and has not run yet.
    Selected { engine: String },
    /// The selected engine ran.
    Finished {
        engine: String,
        count: usize,
        removed: usize,
    },
    /// Every candidate has been tried.
    Exhausted,
}

/// One orchestration run over a validated list of engines.
///
/// An engine is marked as tried when it is selected, before it runs, so a
/// failing engine is never retried within the session.
pub struct SearchSession {
    candidates: Vec<(String, Option<Arc<dyn Engine>>)>,
    tried: Vec<String>,
    current: Option<String>,
    state: SessionState,
    filter: ResultFilter,
    proxy: Option<ProxyPolicy>,
}

impl SearchSession {
    /// Selects the first candidate not tried yet.
    pub fn select_next(&mut self) -> Option<&str> {
        let Some(next) = self
            .candidates
            .iter()
            .map(|(id, _)| id)
            .find(|id| !self.tried.contains(id))
            .cloned()
        else {
            self.state = SessionState::Exhausted;
            return None;
        };

        self.tried.push(next.clone());
        self.state = SessionState::Selected {
            engine: next.clone(),
        };
        self.current = Some(next);
        self.current.as_deref()
    }

    /// Whether some candidate has not been tried yet.
    pub fn has_next(&self) -> bool {
        self.candidates
            .iter()
            .any(|(id, _)| !self.tried.contains(id))
    }

    /// Runs the selected engine and filters its results.
    ///
    /// Engine failures are logged and reported as an empty list.
    pub async fn run(&mut self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        let Some(current) = self.current.clone() else {
            return Err(SearchError::Other(
                "No engine selected, call `select_next` first".to_string(),
            ));
        };

        let mut query = query.clone();
        if let Some(proxy) = &self.proxy {
            query.proxy = proxy.clone();
        }

        info!(engine = %current, "Searching with engine");
        let engine = self
            .candidates
            .iter()
            .find(|(id, _)| *id == current)
            .and_then(|(_, engine)| engine.clone());

        let results = match engine {
            Some(engine) => match engine.search(&query).await {
                Ok(results) => results,
                Err(e) => {
                    warn!(engine = %current, error = %e, "Search engine call failed, will try with next one");
                    Vec::new()
                }
            },
            None => {
                warn!(engine = %current, "Force-allowed engine is not registered");
                Vec::new()
            }
        };

        if results.is_empty() {
            warn!(engine = %current, query = %query.query, "Could not get any search results");
        }

        let outcome = self.filter.apply(results);
        self.state = SessionState::Finished {
            engine: current,
            count: outcome.results.len(),
            removed: outcome.removed,
        };
        Ok(outcome.results)
    }

    /// The engine picked by the last [`SearchSession::select_next`].
    pub fn current_engine(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Engines selected so far, in selection order.
    pub fn tried(&self) -> &[String] {
        &self.tried
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Makes every candidate selectable again.
    pub fn reset(&mut self) {
        self.tried.clear();
        self.current = None;
        self.state = SessionState::Ready;
    }
}
