use popcorn_models::{QueryState, SearchResult};
use popcorn_sources::{MovieCatalog, SourceError};
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};
use crate::request::{lock, pick_runtime, RequestError, RequestHandle, Settled};

pub const DEFAULT_MIN_QUERY_LEN: usize = 3;

struct Shared {
    state: QueryState,
    /// Bumped on every query change and on cancel. A completion only lands
    /// if the generation it was issued under is still current.
    generation: u64,
}

/// Drives a search from the query the user typed.
///
/// At most one request is in flight. Changing the query cancels the previous
/// request before issuing the next, so the state always reflects the most
/// recently issued query. Dropping the controller cancels whatever is still
/// running.
pub struct SearchController {
    catalog: Arc<dyn MovieCatalog>,
    min_query_len: usize,
    runtime: Option<Handle>,
    shared: Arc<Mutex<Shared>>,
    inflight: Option<RequestHandle>,
}

impl SearchController {
    /// Captures the calling thread's tokio runtime, if any, for issuing requests.
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        Self {
            catalog,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            runtime: Handle::try_current().ok(),
            shared: Arc::new(Mutex::new(Shared {
                state: QueryState::default(),
                generation: 0,
            })),
            inflight: None,
        }
    }

    pub fn with_min_query_len(mut self, min_query_len: usize) -> Self {
        self.min_query_len = min_query_len.max(1);
        self
    }

    /// Issue requests on `runtime` instead of the one captured by `new`.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> QueryState {
        lock(&self.shared).state.clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.shared).state.loading
    }

    /// Update the query. Short queries reset the state without touching the
    /// catalog; anything else issues a search on the controller's runtime.
    /// With no runtime at all the search fails into `error` instead of
    /// panicking.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.abort_inflight();

        let generation = {
            let mut shared = lock(&self.shared);
            shared.generation += 1;

            if query.trim().chars().count() < self.min_query_len {
                debug!("Query {:?} too short, not searching", query);
                shared.state = QueryState::idle(query);
                return;
            }

            shared.state = QueryState {
                query: query.clone(),
                results: Vec::new(),
                loading: true,
                error: String::new(),
            };
            shared.generation
        };

        let Some(runtime) = pick_runtime(&self.runtime) else {
            warn!("No tokio runtime to run search {:?} on", query);
            let mut shared = lock(&self.shared);
            shared.state.loading = false;
            shared.state.error = RequestError::NoRuntime.to_string();
            return;
        };

        let catalog = Arc::clone(&self.catalog);
        let shared = Arc::clone(&self.shared);
        self.inflight = Some(RequestHandle::spawn_on(&runtime, async move {
            let outcome = catalog.search(query.trim()).await;
            apply_outcome(&shared, generation, &query, outcome);
        }));
    }

    /// Abandon the in-flight request, if any. The state keeps whatever the
    /// last settled request produced, with loading cleared.
    pub fn cancel(&mut self) {
        self.abort_inflight();
        let mut shared = lock(&self.shared);
        shared.generation += 1;
        shared.state.loading = false;
    }

    /// Wait for the current request to settle. Returns `Completed` right away
    /// when nothing is in flight.
    pub async fn settled(&mut self) -> Result<Settled, RequestError> {
        match self.inflight.take() {
            Some(handle) => handle.join().await,
            None => Ok(Settled::Completed),
        }
    }

    fn abort_inflight(&mut self) {
        if let Some(handle) = self.inflight.take() {
            if !handle.is_finished() {
                debug!("Cancelling in-flight search");
            }
            handle.cancel();
        }
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.abort_inflight();
    }
}

fn apply_outcome(
    shared: &Mutex<Shared>,
    generation: u64,
    query: &str,
    outcome: Result<Vec<SearchResult>, SourceError>,
) {
    let mut shared = lock(shared);
    if shared.generation != generation {
        debug!("Discarding stale search result for {:?}", query);
        return;
    }

    let state = &mut shared.state;
    match outcome {
        Ok(results) => {
            info!("Search {:?} found {} results", query, results.len());
            state.results = results;
            state.error.clear();
        }
        Err(e) => {
            debug!("Search {:?} failed: {}", query, e);
            state.results.clear();
            state.error = e.to_string();
        }
    }
    state.loading = false;
}
