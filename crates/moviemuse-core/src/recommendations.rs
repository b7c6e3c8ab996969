use moviemuse_models::{MovieId, MovieRecord, WatchlistEntry};
use moviemuse_sources::tmdb::resolve_genre_id;
use moviemuse_sources::Catalog;
use rand::seq::IndexedRandom;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::debug;

use crate::query_cache::{genre_key, recommendations_key, QueryCache};

/// Stop cascading once this many candidates have accumulated.
const MIN_CANDIDATES: usize = 3;
/// Hard cap on the suggestion list.
const MAX_RESULTS: usize = 10;
/// How many of the most recent watchlist entries seed the cascade.
const CASCADE_WINDOW: usize = 3;

/// Watchlist-driven suggestions: per-movie catalog recommendations first,
/// genre discovery as the fallback, deduplicated across both passes.
pub struct RecommendationEngine {
    catalog: Arc<dyn Catalog>,
    cache: Arc<QueryCache<Vec<MovieRecord>>>,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<dyn Catalog>, cache: Arc<QueryCache<Vec<MovieRecord>>>) -> Self {
        Self { catalog, cache }
    }

    /// Suggestions are suppressed while a search is active, and an empty
    /// watchlist yields an empty list without touching the network.
    pub async fn recommend(
        &self,
        watchlist: &[WatchlistEntry],
        query: &str,
    ) -> Vec<MovieRecord> {
        if !query.trim().is_empty() || watchlist.is_empty() {
            return Vec::new();
        }

        // Normalized ids (source tag stripped) of everything already
        // watched; nothing the user owns may be suggested back.
        let owned: HashSet<&str> = watchlist
            .iter()
            .map(|entry| entry.movie.id.normalized())
            .collect();
        let mut seen: HashSet<String> = HashSet::new();
        let mut picks: Vec<MovieRecord> = Vec::new();

        let mut entries: Vec<&WatchlistEntry> = watchlist.iter().collect();
        entries.sort_by_key(|entry| entry.date_added);

        // Most recently added entries, oldest first within the window.
        let window_start = entries.len().saturating_sub(CASCADE_WINDOW);
        for entry in &entries[window_start..] {
            let key = recommendations_key(&entry.movie.id);
            let candidates = match self.cache.get(&key) {
                Some(cached) => cached,
                None => {
                    let fetched = self.catalog.recommendations(&entry.movie.id).await;
                    self.cache.set(&key, fetched.clone());
                    fetched
                }
            };
            collect(&mut picks, &mut seen, &owned, candidates);
        }

        if picks.len() < MIN_CANDIDATES {
            let genres: BTreeSet<&str> = watchlist
                .iter()
                .flat_map(|entry| entry.movie.genres.iter().map(String::as_str))
                .collect();
            let genres: Vec<&str> = genres.into_iter().collect();

            if let Some(genre) = genres.choose(&mut rand::rng()) {
                let genre_id = resolve_genre_id(genre);
                debug!("cascade thin, discovering genre '{}' ({})", genre, genre_id);
                let key = genre_key(genre_id);
                let discovered = match self.cache.get(&key) {
                    Some(cached) => cached,
                    None => {
                        let fetched = self.catalog.discover_by_genre(genre_id).await;
                        self.cache.set(&key, fetched.clone());
                        fetched
                    }
                };
                collect(&mut picks, &mut seen, &owned, discovered);
            }
        }

        picks.truncate(MAX_RESULTS);
        picks
    }

    /// Drop the cached per-movie entry after a watchlist add/remove so
    /// stale suggestions cannot resurface.
    pub fn invalidate(&self, id: &MovieId) {
        self.cache.remove(&recommendations_key(id));
    }
}

fn collect(
    picks: &mut Vec<MovieRecord>,
    seen: &mut HashSet<String>,
    owned: &HashSet<&str>,
    candidates: Vec<MovieRecord>,
) {
    for movie in candidates {
        if !movie.is_displayable() {
            continue;
        }
        let normalized = movie.id.normalized().to_string();
        if owned.contains(normalized.as_str()) {
            continue;
        }
        if !seen.insert(normalized) {
            continue;
        }
        picks.push(movie);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, Utc};
    use moviemuse_models::MovieDetails;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    fn movie(native_id: &str, title: &str) -> MovieRecord {
        MovieRecord {
            id: MovieId::tmdb(native_id),
            title: title.to_string(),
            year: "2020".to_string(),
            poster_url: Some(format!("https://image.example/{}.jpg", native_id)),
            genres: vec!["Drama".to_string()],
        }
    }

    fn posterless(native_id: &str) -> MovieRecord {
        MovieRecord {
            poster_url: None,
            ..movie(native_id, "No Poster")
        }
    }

    fn entry(native_id: &str, title: &str, added_minutes_ago: i64) -> WatchlistEntry {
        let mut entry = WatchlistEntry::new(movie(native_id, title));
        entry.date_added = Utc::now() - ChronoDuration::minutes(added_minutes_ago);
        entry
    }

    /// Catalog stub: canned per-movie recommendations and genre listings,
    /// recording every call in order.
    #[derive(Default)]
    struct StubCatalog {
        recommendations: HashMap<String, Vec<MovieRecord>>,
        discover: Vec<MovieRecord>,
        calls: Mutex<Vec<String>>,
    }

    impl StubCatalog {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Catalog for StubCatalog {
        async fn search(&self, _title: &str, _year: Option<u16>) -> Vec<MovieRecord> {
            Vec::new()
        }

        async fn details(&self, _id: &MovieId) -> Option<MovieDetails> {
            None
        }

        async fn similar(&self, _id: &MovieId) -> Vec<MovieRecord> {
            Vec::new()
        }

        async fn recommendations(&self, id: &MovieId) -> Vec<MovieRecord> {
            self.calls.lock().unwrap().push(format!("recs:{}", id));
            self.recommendations
                .get(&id.to_string())
                .cloned()
                .unwrap_or_default()
        }

        async fn discover_by_genre(&self, genre_id: u32) -> Vec<MovieRecord> {
            self.calls.lock().unwrap().push(format!("genre:{}", genre_id));
            self.discover.clone()
        }
    }

    fn engine(catalog: StubCatalog, dir: &TempDir) -> (RecommendationEngine, Arc<StubCatalog>) {
        let catalog = Arc::new(catalog);
        let cache = Arc::new(QueryCache::new(
            dir.path().to_path_buf(),
            Duration::from_secs(1800),
        ));
        (
            RecommendationEngine::new(catalog.clone(), cache),
            catalog,
        )
    }

    #[tokio::test]
    async fn test_empty_watchlist_yields_nothing_without_network() {
        let dir = TempDir::new().unwrap();
        let (engine, catalog) = engine(StubCatalog::default(), &dir);

        assert!(engine.recommend(&[], "").await.is_empty());
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn test_active_query_suppresses_recommendations() {
        let dir = TempDir::new().unwrap();
        let (engine, catalog) = engine(StubCatalog::default(), &dir);
        let watchlist = vec![entry("1", "Seed", 0)];

        assert!(engine.recommend(&watchlist, "batman").await.is_empty());
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn test_output_excludes_watchlist_and_duplicates() {
        let dir = TempDir::new().unwrap();
        let mut stub = StubCatalog::default();
        stub.recommendations.insert(
            "tmdb-1".to_string(),
            vec![
                movie("2", "B"),
                movie("3", "C"),
                movie("1", "Seed again"), // already owned
                movie("2", "B again"),    // duplicate
                posterless("4"),          // not displayable
            ],
        );
        let (engine, _) = engine(stub, &dir);
        let watchlist = vec![entry("1", "Seed", 0)];

        let picks = engine.recommend(&watchlist, "").await;
        let ids: Vec<String> = picks.iter().map(|m| m.id.to_string()).collect();
        assert!(!ids.contains(&"tmdb-1".to_string()));
        assert_eq!(ids, vec!["tmdb-2", "tmdb-3"]);
    }

    #[tokio::test]
    async fn test_cascade_uses_three_most_recent_oldest_first() {
        let dir = TempDir::new().unwrap();
        let (engine, catalog) = engine(StubCatalog::default(), &dir);
        // Added (oldest to newest): e5, e4, e3, e2, e1.
        let watchlist = vec![
            entry("1", "Newest", 1),
            entry("2", "Second", 2),
            entry("3", "Third", 3),
            entry("4", "Fourth", 4),
            entry("5", "Oldest", 5),
        ];

        engine.recommend(&watchlist, "").await;
        let recs_calls: Vec<String> = catalog
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("recs:"))
            .collect();
        assert_eq!(
            recs_calls,
            vec!["recs:tmdb-3", "recs:tmdb-2", "recs:tmdb-1"]
        );
    }

    #[tokio::test]
    async fn test_thin_cascade_falls_back_to_genre_discovery() {
        let dir = TempDir::new().unwrap();
        let mut stub = StubCatalog::default();
        stub.recommendations
            .insert("tmdb-1".to_string(), vec![movie("2", "Only One")]);
        stub.discover = vec![movie("10", "D1"), movie("11", "D2"), movie("2", "dup")];
        let (engine, catalog) = engine(stub, &dir);
        let watchlist = vec![entry("1", "Seed", 0)];

        let picks = engine.recommend(&watchlist, "").await;
        // Drama (18) resolved from the seed's genre.
        assert!(catalog.calls().contains(&"genre:18".to_string()));
        let ids: Vec<String> = picks.iter().map(|m| m.id.to_string()).collect();
        // Cascade results come first, the discovery dup is dropped.
        assert_eq!(ids, vec!["tmdb-2", "tmdb-10", "tmdb-11"]);
        assert!(picks.len() <= MAX_RESULTS);
    }

    #[tokio::test]
    async fn test_full_cascade_skips_genre_discovery() {
        let dir = TempDir::new().unwrap();
        let mut stub = StubCatalog::default();
        stub.recommendations.insert(
            "tmdb-1".to_string(),
            vec![movie("2", "B"), movie("3", "C"), movie("4", "D")],
        );
        let (engine, catalog) = engine(stub, &dir);
        let watchlist = vec![entry("1", "Seed", 0)];

        engine.recommend(&watchlist, "").await;
        assert!(!catalog.calls().iter().any(|c| c.starts_with("genre:")));
    }

    #[tokio::test]
    async fn test_output_truncated_to_ten() {
        let dir = TempDir::new().unwrap();
        let mut stub = StubCatalog::default();
        let many: Vec<MovieRecord> = (10..40).map(|i| movie(&i.to_string(), "M")).collect();
        stub.recommendations.insert("tmdb-1".to_string(), many);
        let (engine, _) = engine(stub, &dir);
        let watchlist = vec![entry("1", "Seed", 0)];

        let picks = engine.recommend(&watchlist, "").await;
        assert_eq!(picks.len(), MAX_RESULTS);
    }

    #[tokio::test]
    async fn test_second_pass_served_from_cache() {
        let dir = TempDir::new().unwrap();
        let mut stub = StubCatalog::default();
        stub.recommendations.insert(
            "tmdb-1".to_string(),
            vec![movie("2", "B"), movie("3", "C"), movie("4", "D")],
        );
        let (engine, catalog) = engine(stub, &dir);
        let watchlist = vec![entry("1", "Seed", 0)];

        engine.recommend(&watchlist, "").await;
        engine.recommend(&watchlist, "").await;
        let recs_calls = catalog
            .calls()
            .iter()
            .filter(|c| c.starts_with("recs:"))
            .count();
        assert_eq!(recs_calls, 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let dir = TempDir::new().unwrap();
        let mut stub = StubCatalog::default();
        stub.recommendations.insert(
            "tmdb-1".to_string(),
            vec![movie("2", "B"), movie("3", "C"), movie("4", "D")],
        );
        let (engine, catalog) = engine(stub, &dir);
        let watchlist = vec![entry("1", "Seed", 0)];

        engine.recommend(&watchlist, "").await;
        engine.invalidate(&MovieId::tmdb("1"));
        engine.recommend(&watchlist, "").await;
        let recs_calls = catalog
            .calls()
            .iter()
            .filter(|c| c.starts_with("recs:"))
            .count();
        assert_eq!(recs_calls, 2);
    }
}
