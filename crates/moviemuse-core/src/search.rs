use moviemuse_config::SearchConfig;
use moviemuse_models::MovieRecord;
use moviemuse_sources::Catalog;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::query_cache::{search_key, QueryCache};

/// What the UI renders: the active query plus results, loading flag and an
/// inline error message.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<MovieRecord>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Debounced, cancellable search over a single query string.
///
/// Every submission takes a fresh generation number; only the task holding
/// the current generation may write results back. Superseded tasks are
/// aborted, and cooperatively so: if one slips past the abort, the
/// generation check still drops its response on the floor. Two submissions
/// of identical text get distinct generations, so same-text responses may
/// race last-writer-wins; only cross-query staleness is guarded.
pub struct SearchController {
    catalog: Arc<dyn Catalog>,
    cache: Arc<QueryCache<Vec<MovieRecord>>>,
    config: SearchConfig,
    state: Arc<Mutex<SearchState>>,
    generation: Arc<AtomicU64>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SearchController {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        cache: Arc<QueryCache<Vec<MovieRecord>>>,
        config: SearchConfig,
    ) -> Self {
        Self {
            catalog,
            cache,
            config,
            state: Arc::new(Mutex::new(SearchState::default())),
            generation: Arc::new(AtomicU64::new(0)),
            task: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SearchState {
        self.state.lock().unwrap().clone()
    }

    /// A keystroke: debounce, and cancel whatever was in flight.
    pub fn set_query(&self, query: &str) {
        self.submit(query, false);
    }

    /// An explicit submit: skips the debounce and the minimum-length gate.
    pub fn force_search(&self, query: &str) {
        self.submit(query, true);
    }

    fn submit(&self, query: &str, forced: bool) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = self.task.lock().unwrap().take() {
            previous.abort();
        }

        let query = query.trim().to_string();
        self.state.lock().unwrap().query = query.clone();

        // Short queries settle to an empty result set with no network call.
        if query.chars().count() < self.config.min_query_len && !forced {
            let mut state = self.state.lock().unwrap();
            state.results.clear();
            state.is_loading = false;
            state.error = None;
            return;
        }

        let catalog = Arc::clone(&self.catalog);
        let cache = Arc::clone(&self.cache);
        let state = Arc::clone(&self.state);
        let generations = Arc::clone(&self.generation);
        let config = self.config;

        let handle = tokio::spawn(async move {
            if !forced {
                tokio::time::sleep(Duration::from_millis(config.debounce_ms)).await;
                if generations.load(Ordering::SeqCst) != generation {
                    return;
                }
            }

            let key = search_key(&query);
            if let Some(cached) = cache.get(&key) {
                debug!("search cache hit for '{}'", query);
                apply(&state, &generations, generation, cached, None);
                return;
            }

            // The spinner flips on only if the fetch is still outstanding
            // when the delay elapses, so fast responses never flicker.
            let outstanding = Arc::new(AtomicBool::new(true));
            let spinner = {
                let state = Arc::clone(&state);
                let generations = Arc::clone(&generations);
                let outstanding = Arc::clone(&outstanding);
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(config.spinner_delay_ms)).await;
                    if outstanding.load(Ordering::SeqCst)
                        && generations.load(Ordering::SeqCst) == generation
                    {
                        state.lock().unwrap().is_loading = true;
                    }
                })
            };

            let results = catalog.search(&query, None).await;
            outstanding.store(false, Ordering::SeqCst);
            spinner.abort();

            if results.is_empty() {
                apply(
                    &state,
                    &generations,
                    generation,
                    Vec::new(),
                    Some("No results found".to_string()),
                );
                return;
            }

            cache.set(&key, results.clone());
            apply(&state, &generations, generation, results, None);
        });

        *self.task.lock().unwrap() = Some(handle);
    }

    /// Await the active request and return the final state; the
    /// synchronization point for one-shot callers.
    pub async fn settled(&self) -> SearchState {
        let handle = self.task.lock().unwrap().take();
        if let Some(handle) = handle {
            // An aborted predecessor reports JoinError; that is not an
            // outcome, just cancellation.
            let _ = handle.await;
        }
        self.state()
    }
}

/// Write results into state iff the generation is still current; stale
/// responses are dropped silently.
fn apply(
    state: &Mutex<SearchState>,
    generations: &AtomicU64,
    generation: u64,
    results: Vec<MovieRecord>,
    error: Option<String>,
) {
    if generations.load(Ordering::SeqCst) != generation {
        return;
    }
    let mut state = state.lock().unwrap();
    state.results = results;
    state.error = error;
    state.is_loading = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use moviemuse_models::{MovieDetails, MovieId};
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use tempfile::TempDir;

    fn movie(native_id: &str, title: &str) -> MovieRecord {
        MovieRecord {
            id: MovieId::tmdb(native_id),
            title: title.to_string(),
            year: "2020".to_string(),
            poster_url: Some(format!("https://image.example/{}.jpg", native_id)),
            genres: Vec::new(),
        }
    }

    /// Per-query canned results with a configurable response delay.
    #[derive(Default)]
    struct StubCatalog {
        responses: HashMap<String, Vec<MovieRecord>>,
        delays_ms: HashMap<String, u64>,
        calls: AtomicUsize,
    }

    impl StubCatalog {
        fn with(mut self, query: &str, delay_ms: u64, results: Vec<MovieRecord>) -> Self {
            self.responses.insert(query.to_string(), results);
            self.delays_ms.insert(query.to_string(), delay_ms);
            self
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Catalog for StubCatalog {
        async fn search(&self, title: &str, _year: Option<u16>) -> Vec<MovieRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays_ms.get(title) {
                tokio::time::sleep(Duration::from_millis(*delay)).await;
            }
            self.responses.get(title).cloned().unwrap_or_default()
        }

        async fn details(&self, _id: &MovieId) -> Option<MovieDetails> {
            None
        }

        async fn similar(&self, _id: &MovieId) -> Vec<MovieRecord> {
            Vec::new()
        }

        async fn recommendations(&self, _id: &MovieId) -> Vec<MovieRecord> {
            Vec::new()
        }

        async fn discover_by_genre(&self, _genre_id: u32) -> Vec<MovieRecord> {
            Vec::new()
        }
    }

    fn controller(stub: StubCatalog, dir: &TempDir) -> (SearchController, Arc<StubCatalog>) {
        let catalog = Arc::new(stub);
        let cache = Arc::new(QueryCache::new(
            dir.path().to_path_buf(),
            Duration::from_secs(1800),
        ));
        (
            SearchController::new(catalog.clone(), cache, SearchConfig::default()),
            catalog,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_short_circuits_without_network() {
        let dir = TempDir::new().unwrap();
        let (controller, catalog) = controller(StubCatalog::default(), &dir);

        controller.set_query("ba");
        let state = controller.settled().await;
        assert_eq!(state.results.len(), 0);
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
        assert_eq!(catalog.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_forced_search_bypasses_length_gate() {
        let dir = TempDir::new().unwrap();
        let stub = StubCatalog::default().with("up", 0, vec![movie("1", "Up")]);
        let (controller, catalog) = controller(stub, &dir);

        controller.force_search("up");
        let state = controller.settled().await;
        assert_eq!(state.results.len(), 1);
        assert_eq!(catalog.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_search_settles_with_results() {
        let dir = TempDir::new().unwrap();
        let stub = StubCatalog::default().with("batman", 50, vec![movie("1", "Batman")]);
        let (controller, _) = controller(stub, &dir);

        controller.set_query("batman");
        let state = controller.settled().await;
        assert_eq!(state.query, "batman");
        assert_eq!(state.results.len(), 1);
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_query_supersedes_older_in_flight() {
        let dir = TempDir::new().unwrap();
        let stub = StubCatalog::default()
            .with("bat", 300, vec![movie("1", "Bat")])
            .with("batman", 100, vec![movie("2", "Batman")]);
        let (controller, _) = controller(stub, &dir);

        controller.force_search("bat");
        // Let the slow request get past its debounce and into flight.
        tokio::task::yield_now().await;
        controller.force_search("batman");

        let state = controller.settled().await;
        assert_eq!(state.query, "batman");
        assert_eq!(state.results.len(), 1);
        assert_eq!(state.results[0].title, "Batman");

        // Even after the older response's deadline passes, nothing
        // overwrites the newer result.
        tokio::time::sleep(Duration::from_millis(500)).await;
        let state = controller.state();
        assert_eq!(state.results[0].title, "Batman");
        assert_eq!(state.error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystrokes_rearm_debounce_single_fetch() {
        let dir = TempDir::new().unwrap();
        let stub = StubCatalog::default()
            .with("matrix", 0, vec![movie("1", "The Matrix")]);
        let (controller, catalog) = controller(stub, &dir);

        controller.set_query("matr");
        controller.set_query("matri");
        controller.set_query("matrix");
        let state = controller.settled().await;
        assert_eq!(state.results.len(), 1);
        assert_eq!(catalog.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_hit_settles_without_network() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(StubCatalog::default());
        let cache = Arc::new(QueryCache::new(
            dir.path().to_path_buf(),
            Duration::from_secs(1800),
        ));
        cache.set(&search_key("matrix"), vec![movie("1", "The Matrix")]);
        let controller =
            SearchController::new(catalog.clone(), cache, SearchConfig::default());

        controller.force_search("matrix");
        let state = controller.settled().await;
        assert_eq!(state.results.len(), 1);
        assert_eq!(catalog.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_results_surface_inline_error() {
        let dir = TempDir::new().unwrap();
        let stub = StubCatalog::default().with("zzzz", 0, Vec::new());
        let (controller, _) = controller(stub, &dir);

        controller.force_search("zzzz");
        let state = controller.settled().await;
        assert!(state.results.is_empty());
        assert_eq!(state.error.as_deref(), Some("No results found"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spinner_flips_only_for_slow_fetches() {
        let dir = TempDir::new().unwrap();
        let stub = StubCatalog::default().with("slow", 1000, vec![movie("1", "Slow")]);
        let (controller, _) = controller(stub, &dir);

        controller.force_search("slow");
        // Past the spinner delay but before the response.
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(controller.state().is_loading);

        let state = controller.settled().await;
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_fetch_never_shows_spinner() {
        let dir = TempDir::new().unwrap();
        let stub = StubCatalog::default().with("fast", 50, vec![movie("1", "Fast")]);
        let (controller, _) = controller(stub, &dir);

        controller.force_search("fast");
        let state = controller.settled().await;
        assert!(!state.is_loading);

        // The lapsed spinner timer must not flip the flag afterwards.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!controller.state().is_loading);
    }
}
