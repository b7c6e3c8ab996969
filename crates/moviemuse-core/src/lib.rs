pub mod cache_storage;
pub mod feeds;
pub mod local_watchlist;
pub mod query_cache;
pub mod recommendations;
pub mod search;

pub use cache_storage::CacheStorage;
pub use feeds::FeedService;
pub use local_watchlist::LocalWatchlist;
pub use query_cache::{
    feed_key, genre_key, recommendations_key, search_key, similar_key, CacheEntry, QueryCache,
};
pub use recommendations::RecommendationEngine;
pub use search::{SearchController, SearchState};
