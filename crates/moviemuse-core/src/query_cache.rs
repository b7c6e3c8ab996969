use chrono::Utc;
use moviemuse_models::{Feed, MovieId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing::warn;

use crate::cache_storage::CacheStorage;

/// Key constructors: pure functions of the logical query, so identical
/// queries always collide on the same entry regardless of call order.
pub fn search_key(title: &str) -> String {
    format!("search-{}", title.trim().to_lowercase())
}

pub fn genre_key(genre_id: u32) -> String {
    format!("genre-{}", genre_id)
}

pub fn recommendations_key(id: &MovieId) -> String {
    format!("recs-{}", id)
}

pub fn similar_key(id: &MovieId) -> String {
    format!("similar-{}", id)
}

pub fn feed_key(feed: Feed, page: u32) -> String {
    format!("{}-page-{}", feed.as_str(), page)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub value: T,
    pub stored_at_ms: i64,
    pub ttl_ms: i64,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, stored_at_ms: i64, ttl: Duration) -> Self {
        Self {
            value,
            stored_at_ms,
            ttl_ms: ttl.as_millis() as i64,
        }
    }

    /// Usable iff `now - stored_at < ttl`.
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms - self.stored_at_ms < self.ttl_ms
    }
}

/// Two-tier memoization of catalog queries: an in-memory map consulted
/// first, backed by per-key JSON files that survive restarts and repopulate
/// the memory tier on a miss.
///
/// One instance per concern, owned by whoever constructs the controller or
/// engine and passed by reference; `clear` is the explicit lifecycle hook.
pub struct QueryCache<T> {
    memory: Mutex<HashMap<String, CacheEntry<T>>>,
    storage: CacheStorage,
    default_ttl: Duration,
    /// Keep expired entries around for `get_any_age` (the feed cache's
    /// stale-on-error fallback) instead of purging them on read.
    retain_stale: bool,
}

impl<T: Clone + Serialize + DeserializeOwned> QueryCache<T> {
    pub fn new(dir: PathBuf, default_ttl: Duration) -> Self {
        Self {
            memory: Mutex::new(HashMap::new()),
            storage: CacheStorage::new(dir),
            default_ttl,
            retain_stale: false,
        }
    }

    pub fn with_stale_retention(dir: PathBuf, default_ttl: Duration) -> Self {
        Self {
            retain_stale: true,
            ..Self::new(dir, default_ttl)
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now().timestamp_millis())
    }

    fn get_at(&self, key: &str, now_ms: i64) -> Option<T> {
        {
            let mut memory = self.memory.lock().unwrap();
            if let Some(entry) = memory.get(key) {
                if entry.is_fresh(now_ms) {
                    return Some(entry.value.clone());
                }
                // Expired entries are treated as absent and lazily purged,
                // except where the stale value is kept for error fallback.
                if !self.retain_stale {
                    memory.remove(key);
                    self.storage.remove(key);
                }
                return None;
            }
        }

        let entry: CacheEntry<T> = self.storage.load(key)?;
        if entry.is_fresh(now_ms) {
            let value = entry.value.clone();
            self.memory.lock().unwrap().insert(key.to_string(), entry);
            return Some(value);
        }
        if self.retain_stale {
            // Park it in memory so the fallback path finds it without
            // another disk read.
            self.memory.lock().unwrap().insert(key.to_string(), entry);
        } else {
            self.storage.remove(key);
        }
        None
    }

    /// Newest stored value regardless of TTL; the feed path serves this
    /// when the live fetch fails.
    pub fn get_any_age(&self, key: &str) -> Option<T> {
        if let Some(entry) = self.memory.lock().unwrap().get(key) {
            return Some(entry.value.clone());
        }
        let entry: CacheEntry<T> = self.storage.load(key)?;
        Some(entry.value)
    }

    pub fn set(&self, key: &str, value: T) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    pub fn set_with_ttl(&self, key: &str, value: T, ttl: Duration) {
        let entry = CacheEntry::new(value, Utc::now().timestamp_millis(), ttl);
        if let Err(e) = self.storage.save(key, &entry) {
            warn!("failed to persist cache entry '{}': {:#}", key, e);
        }
        self.memory.lock().unwrap().insert(key.to_string(), entry);
    }

    pub fn remove(&self, key: &str) {
        self.memory.lock().unwrap().remove(key);
        self.storage.remove(key);
    }

    pub fn clear(&self) {
        self.memory.lock().unwrap().clear();
        if let Err(e) = self.storage.clear() {
            warn!("failed to clear cache storage: {:#}", e);
        }
    }
}
