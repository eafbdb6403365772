use popcorn_models::MovieDetail;
use popcorn_sources::{MovieCatalog, SourceError};
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tracing::{debug, warn};
use crate::request::{lock, pick_runtime, RequestError, RequestHandle, Settled};
use crate::title::TitleSink;

pub const DEFAULT_TITLE: &str = "usePopcorn";

/// What the detail view shows. `detail` keeps the last loaded record until
/// the next one replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    pub selected: Option<String>,
    pub detail: Option<MovieDetail>,
    pub loading: bool,
    pub error: String,
}

impl DetailState {
    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }
}

struct Shared {
    state: DetailState,
    generation: u64,
    /// Whether the sink currently shows a movie title rather than the default.
    title_active: bool,
}

/// Loads the details of the selected movie.
///
/// Selecting a new id supersedes the previous fetch the same way a new query
/// supersedes a search: the old request is cancelled and its late result,
/// if any, is dropped.
pub struct DetailController {
    catalog: Arc<dyn MovieCatalog>,
    title_sink: Arc<dyn TitleSink>,
    default_title: String,
    runtime: Option<Handle>,
    shared: Arc<Mutex<Shared>>,
    inflight: Option<RequestHandle>,
}

impl DetailController {
    /// Captures the calling thread's tokio runtime, if any, for issuing requests.
    pub fn new(catalog: Arc<dyn MovieCatalog>, title_sink: Arc<dyn TitleSink>) -> Self {
        Self {
            catalog,
            title_sink,
            default_title: DEFAULT_TITLE.to_string(),
            runtime: Handle::try_current().ok(),
            shared: Arc::new(Mutex::new(Shared {
                state: DetailState::default(),
                generation: 0,
                title_active: false,
            })),
            inflight: None,
        }
    }

    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    /// Issue requests on `runtime` instead of the one captured by `new`.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn state(&self) -> DetailState {
        lock(&self.shared).state.clone()
    }

    pub fn selected(&self) -> Option<String> {
        lock(&self.shared).state.selected.clone()
    }

    pub fn is_open(&self) -> bool {
        lock(&self.shared).state.is_open()
    }

    /// Open the detail view for `imdb_id` and fetch its record. With no
    /// runtime to fetch on, the view opens with `error` set.
    pub fn select(&mut self, imdb_id: impl Into<String>) {
        let imdb_id = imdb_id.into();
        self.abort_inflight();

        let generation = {
            let mut shared = lock(&self.shared);
            shared.generation += 1;
            if shared.title_active {
                self.title_sink.set_title(&self.default_title);
                shared.title_active = false;
            }
            shared.state.selected = Some(imdb_id.clone());
            shared.state.loading = true;
            shared.state.error.clear();
            shared.generation
        };

        let Some(runtime) = pick_runtime(&self.runtime) else {
            warn!("No tokio runtime to fetch {} on", imdb_id);
            let mut shared = lock(&self.shared);
            shared.state.loading = false;
            shared.state.error = RequestError::NoRuntime.to_string();
            return;
        };

        let catalog = Arc::clone(&self.catalog);
        let shared = Arc::clone(&self.shared);
        let sink = Arc::clone(&self.title_sink);
        self.inflight = Some(RequestHandle::spawn_on(&runtime, async move {
            let outcome = catalog.movie_detail(&imdb_id).await;
            apply_outcome(&shared, sink.as_ref(), generation, &imdb_id, outcome);
        }));
    }

    /// Selecting the movie that is already open closes it instead.
    pub fn toggle(&mut self, imdb_id: &str) {
        if self.selected().as_deref() == Some(imdb_id) {
            self.close();
        } else {
            self.select(imdb_id);
        }
    }

    /// Close the view: cancel any fetch, forget the record, restore the default title.
    pub fn close(&mut self) {
        self.abort_inflight();
        let mut shared = lock(&self.shared);
        shared.generation += 1;
        shared.state = DetailState::default();
        self.title_sink.set_title(&self.default_title);
        shared.title_active = false;
    }

    pub async fn settled(&mut self) -> Result<Settled, RequestError> {
        match self.inflight.take() {
            Some(handle) => handle.join().await,
            None => Ok(Settled::Completed),
        }
    }

    fn abort_inflight(&mut self) {
        if let Some(handle) = self.inflight.take() {
            handle.cancel();
        }
    }
}

impl Drop for DetailController {
    fn drop(&mut self) {
        self.abort_inflight();
        let shared = lock(&self.shared);
        if shared.title_active {
            self.title_sink.set_title(&self.default_title);
        }
    }
}

fn apply_outcome(
    shared: &Mutex<Shared>,
    sink: &dyn TitleSink,
    generation: u64,
    imdb_id: &str,
    outcome: Result<MovieDetail, SourceError>,
) {
    let mut shared = lock(shared);
    if shared.generation != generation {
        debug!("Discarding stale detail for {}", imdb_id);
        return;
    }

    match outcome {
        Ok(detail) => {
            if detail.has_title() {
                sink.set_title(&format!("Movie : {}", detail.title));
                shared.title_active = true;
            }
            shared.state.detail = Some(detail);
            shared.state.error.clear();
        }
        Err(e) => {
            warn!("Detail fetch for {} failed: {}", imdb_id, e);
            shared.state.detail = None;
            shared.state.error = e.to_string();
        }
    }
    shared.state.loading = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{detail, let_tasks_run, FakeCatalog, Reply};
    use crate::title::RecordingTitleSink;

    fn controller(catalog: FakeCatalog) -> (DetailController, Arc<RecordingTitleSink>) {
        let sink = Arc::new(RecordingTitleSink::new());
        let controller = DetailController::new(Arc::new(catalog), sink.clone());
        (controller, sink)
    }

    #[tokio::test]
    async fn test_select_loads_detail_and_sets_title() {
        let (mut details, sink) = controller(
            FakeCatalog::new().reply("tt0096895", Reply::Detail(detail("tt0096895", "Batman"))),
        );

        details.select("tt0096895");
        assert!(details.state().loading);
        details.settled().await.unwrap();

        let state = details.state();
        assert_eq!(state.selected.as_deref(), Some("tt0096895"));
        assert_eq!(state.detail.unwrap().title, "Batman");
        assert!(!state.loading);
        assert_eq!(sink.current().as_deref(), Some("Movie : Batman"));
    }

    #[tokio::test]
    async fn test_close_resets_title_to_default() {
        let (mut details, sink) = controller(
            FakeCatalog::new().reply("tt0096895", Reply::Detail(detail("tt0096895", "Batman"))),
        );

        details.select("tt0096895");
        details.settled().await.unwrap();
        details.close();

        assert_eq!(details.state(), DetailState::default());
        assert_eq!(sink.current().as_deref(), Some("usePopcorn"));
    }

    #[tokio::test]
    async fn test_untitled_detail_leaves_title_alone() {
        let (mut details, sink) = controller(
            FakeCatalog::new().reply("tt1", Reply::Detail(detail("tt1", ""))),
        );

        details.select("tt1");
        details.settled().await.unwrap();

        assert!(sink.history().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_same_id_closes() {
        let (mut details, _) = controller(
            FakeCatalog::new().reply("tt0096895", Reply::Detail(detail("tt0096895", "Batman"))),
        );

        details.toggle("tt0096895");
        details.settled().await.unwrap();
        assert!(details.is_open());

        details.toggle("tt0096895");
        assert!(!details.is_open());
    }

    #[tokio::test]
    async fn test_slow_superseded_detail_is_discarded() {
        let catalog = FakeCatalog::new()
            .reply("tt0096895", Reply::Detail(detail("tt0096895", "Batman")))
            .reply("tt0103776", Reply::Detail(detail("tt0103776", "Batman Returns")));
        let slow = catalog.gate("tt0096895");
        let (mut details, sink) = controller(catalog);

        details.select("tt0096895");
        let_tasks_run().await;
        details.select("tt0103776");
        details.settled().await.unwrap();

        slow.notify_one();
        let_tasks_run().await;

        let state = details.state();
        assert_eq!(state.selected.as_deref(), Some("tt0103776"));
        assert_eq!(state.detail.unwrap().title, "Batman Returns");
        assert_eq!(sink.history(), vec!["Movie : Batman Returns".to_string()]);
    }

    #[tokio::test]
    async fn test_switching_selection_restores_default_first() {
        let catalog = FakeCatalog::new()
            .reply("tt0096895", Reply::Detail(detail("tt0096895", "Batman")))
            .reply("tt0103776", Reply::Detail(detail("tt0103776", "Batman Returns")));
        let (mut details, sink) = controller(catalog);

        details.select("tt0096895");
        details.settled().await.unwrap();
        details.select("tt0103776");
        details.settled().await.unwrap();

        assert_eq!(
            sink.history(),
            vec![
                "Movie : Batman".to_string(),
                "usePopcorn".to_string(),
                "Movie : Batman Returns".to_string(),
            ]
        );
    }

    #[test]
    fn test_select_without_any_runtime_reports_error() {
        let (mut details, sink) = controller(FakeCatalog::new());

        details.select("tt0096895");

        let state = details.state();
        assert_eq!(state.selected.as_deref(), Some("tt0096895"));
        assert!(!state.loading);
        assert_eq!(state.error, RequestError::NoRuntime.to_string());
        assert!(sink.history().is_empty());
    }

    #[test]
    fn test_select_uses_given_runtime_from_plain_thread() {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let sink = Arc::new(RecordingTitleSink::new());
        let catalog = FakeCatalog::new().reply("tt0096895", Reply::Detail(detail("tt0096895", "Batman")));
        let mut details = DetailController::new(Arc::new(catalog), sink.clone()).with_runtime(rt.handle().clone());

        details.select("tt0096895");
        rt.block_on(details.settled()).unwrap();

        assert_eq!(details.state().detail.unwrap().title, "Batman");
        assert_eq!(sink.current().as_deref(), Some("Movie : Batman"));
    }

    #[tokio::test]
    async fn test_failed_fetch_surfaces_error() {
        let (mut details, _) = controller(FakeCatalog::new().reply("tt0", Reply::NotFound("Incorrect IMDb ID.")));

        details.select("tt0");
        details.settled().await.unwrap();

        let state = details.state();
        assert_eq!(state.error, "Incorrect IMDb ID.");
        assert!(state.detail.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_drop_restores_default_title() {
        let sink = Arc::new(RecordingTitleSink::new());
        {
            let catalog = FakeCatalog::new().reply("tt0096895", Reply::Detail(detail("tt0096895", "Batman")));
            let mut details = DetailController::new(Arc::new(catalog), sink.clone())
                .with_default_title("Popcorn");
            details.select("tt0096895");
            details.settled().await.unwrap();
        }

        assert_eq!(sink.current().as_deref(), Some("Popcorn"));
    }
}
