use moviemuse_models::{Feed, MovieRecord};
use moviemuse_sources::{FeedFetcher, SourceError};
use std::sync::Arc;
use tracing::warn;

use crate::query_cache::{feed_key, QueryCache};

/// Short-TTL cache in front of the backend's proxied feeds.
///
/// Unlike the search cache, a failed live fetch falls back to whatever is
/// stored for the key, fresh or expired; only a cold cache propagates the
/// error.
pub struct FeedService {
    fetcher: Arc<dyn FeedFetcher>,
    cache: QueryCache<Vec<MovieRecord>>,
}

impl FeedService {
    pub fn new(fetcher: Arc<dyn FeedFetcher>, cache: QueryCache<Vec<MovieRecord>>) -> Self {
        Self { fetcher, cache }
    }

    pub async fn fetch(&self, feed: Feed, page: u32) -> Result<Vec<MovieRecord>, SourceError> {
        let key = feed_key(feed, page);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        match self.fetcher.fetch_feed(feed, page).await {
            Ok(movies) => {
                self.cache.set(&key, movies.clone());
                Ok(movies)
            }
            Err(e) => match self.cache.get_any_age(&key) {
                Some(stale) => {
                    warn!("serving stale {} feed after fetch failure: {}", feed, e);
                    Ok(stale)
                }
                None => Err(e),
            },
        }
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use moviemuse_models::MovieId;
    use std::sync::atomic::{AtomicUsize, Ordering};
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

    struct StubFetcher {
        movies: Vec<MovieRecord>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubFetcher {
        fn ok(movies: Vec<MovieRecord>) -> Self {
            Self {
                movies,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                movies: Vec::new(),
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl FeedFetcher for StubFetcher {
        async fn fetch_feed(
            &self,
            _feed: Feed,
            _page: u32,
        ) -> Result<Vec<MovieRecord>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(SourceError::Api {
                    status: 502,
                    message: "upstream down".to_string(),
                })
            } else {
                Ok(self.movies.clone())
            }
        }
    }

    fn feed_cache(dir: &TempDir) -> QueryCache<Vec<MovieRecord>> {
        QueryCache::with_stale_retention(dir.path().to_path_buf(), Duration::from_secs(300))
    }

    #[tokio::test]
    async fn test_live_fetch_is_cached() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(StubFetcher::ok(vec![movie("1", "A")]));
        let service = FeedService::new(fetcher.clone(), feed_cache(&dir));

        let first = service.fetch(Feed::Trending, 1).await.unwrap();
        let second = service.fetch(Feed::Trending, 1).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pages_cache_independently() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(StubFetcher::ok(vec![movie("1", "A")]));
        let service = FeedService::new(fetcher.clone(), feed_cache(&dir));

        service.fetch(Feed::TopRated, 1).await.unwrap();
        service.fetch(Feed::TopRated, 2).await.unwrap();
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_served_on_fetch_failure() {
        let dir = TempDir::new().unwrap();
        let cache = feed_cache(&dir);
        // An entry well past its TTL, as if stored 400s ago.
        cache.set_with_ttl(
            &feed_key(Feed::Trending, 1),
            vec![movie("1", "A")],
            Duration::ZERO,
        );

        let service = FeedService::new(Arc::new(StubFetcher::failing()), cache);
        let movies = service.fetch(Feed::Trending, 1).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "A");
    }

    #[tokio::test]
    async fn test_cold_cache_propagates_failure() {
        let dir = TempDir::new().unwrap();
        let service = FeedService::new(Arc::new(StubFetcher::failing()), feed_cache(&dir));

        let result = service.fetch(Feed::NewReleases, 1).await;
        assert!(matches!(result, Err(SourceError::Api { status: 502, .. })));
    }
}
