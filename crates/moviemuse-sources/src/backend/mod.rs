pub mod api;
pub mod client;

pub use client::BackendClient;

use async_trait::async_trait;
use moviemuse_models::{Feed, MovieRecord};

use crate::error::SourceError;

/// Seam over the backend's proxied feed endpoints, so the feed cache can be
/// exercised without a live server.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch_feed(&self, feed: Feed, page: u32) -> Result<Vec<MovieRecord>, SourceError>;
}
