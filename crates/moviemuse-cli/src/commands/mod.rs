pub mod auth;
pub mod clear;
pub mod config;
pub mod details;
pub mod feed;
pub mod recommend;
pub mod review;
pub mod search;
pub mod similar;
pub mod watchlist;

use color_eyre::eyre::eyre;
use indicatif::{ProgressBar, ProgressStyle};
use moviemuse_config::{Config, PathManager, SessionStore};
use moviemuse_core::{FeedService, LocalWatchlist, QueryCache, RecommendationEngine};
use moviemuse_models::MovieRecord;
use moviemuse_sources::{BackendClient, CatalogClient, SourceError};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::output::Output;

/// Everything a command needs, loaded once per invocation.
pub struct AppContext {
    pub config: Config,
    pub paths: PathManager,
    pub session: SessionStore,
}

impl AppContext {
    pub fn load() -> color_eyre::Result<Self> {
        let paths = PathManager::default();
        paths
            .ensure_directories()
            .map_err(|e| eyre!("{:#}", e))?;
        debug!("loading config from {:?}", paths.config_file());
        let config = Config::load(&paths.config_file()).map_err(|e| eyre!("{:#}", e))?;
        let mut session = SessionStore::new(paths.session_file());
        session.load().map_err(|e| eyre!("{:#}", e))?;
        Ok(Self {
            config,
            paths,
            session,
        })
    }

    pub fn catalog(&self) -> Arc<CatalogClient> {
        Arc::new(CatalogClient::new(
            &self.config.catalog.tmdb_api_key,
            &self.config.catalog.omdb_api_key,
            &self.config.catalog.language,
        ))
    }

    /// The 30-minute cache shared by search and recommendations.
    pub fn query_cache(&self) -> Arc<QueryCache<Vec<MovieRecord>>> {
        Arc::new(QueryCache::new(
            self.paths.cache_query_dir(),
            Duration::from_secs(self.config.cache.query_ttl_minutes * 60),
        ))
    }

    /// Bearer token attached only while the stored session is still valid.
    pub fn backend(&self) -> BackendClient {
        let token = if self.session.is_valid() {
            self.session.token().cloned()
        } else {
            None
        };
        BackendClient::new(&self.config.backend.base_url).with_token(token)
    }

    pub fn feed_service(&self) -> FeedService {
        let cache = QueryCache::with_stale_retention(
            self.paths.cache_feed_dir(),
            Duration::from_secs(self.config.cache.feed_ttl_minutes * 60),
        );
        FeedService::new(Arc::new(self.backend()), cache)
    }

    pub fn recommendation_engine(&self) -> RecommendationEngine {
        RecommendationEngine::new(self.catalog(), self.query_cache())
    }

    pub fn local_watchlist(&self) -> LocalWatchlist {
        LocalWatchlist::new(self.paths.local_watchlist_file())
    }

    pub fn require_catalog_keys(&self) -> color_eyre::Result<()> {
        if !self.config.has_catalog_keys() {
            return Err(eyre!(
                "no catalog API key configured - run `moviemuse config init` first"
            ));
        }
        Ok(())
    }
}

/// Spinner for network-bound commands; hidden in quiet/JSON output.
pub fn spinner(output: &Output, msg: &str) -> ProgressBar {
    if output.is_quiet() || !output.is_human() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Backend failures carry a hint when the fix is to log in (again).
pub fn describe_backend_error(e: &SourceError) -> String {
    match e {
        SourceError::Unauthorized(msg) => {
            format!("{} - run `moviemuse login` first", msg)
        }
        other => other.to_string(),
    }
}
