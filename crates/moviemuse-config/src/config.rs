use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Third-party catalog credentials and locale.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub tmdb_api_key: String,
    #[serde(default)]
    pub omdb_api_key: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_spinner_delay_ms")]
    pub spinner_delay_ms: u64,
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_query_ttl_minutes")]
    pub query_ttl_minutes: u64,
    #[serde(default = "default_feed_ttl_minutes")]
    pub feed_ttl_minutes: u64,
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_backend_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_spinner_delay_ms() -> u64 {
    150
}

fn default_min_query_len() -> usize {
    3
}

fn default_query_ttl_minutes() -> u64 {
    30
}

fn default_feed_ttl_minutes() -> u64 {
    5
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: String::new(),
            omdb_api_key: String::new(),
            language: default_language(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            spinner_delay_ms: default_spinner_delay_ms(),
            min_query_len: default_min_query_len(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            query_ttl_minutes: default_query_ttl_minutes(),
            feed_ttl_minutes: default_feed_ttl_minutes(),
        }
    }
}

impl Config {
    /// Load from the given file, falling back to defaults when it does not
    /// exist yet (first run before `moviemuse config init`).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {:?}", path))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write config file {:?}", path))?;
        Ok(())
    }

    pub fn has_catalog_keys(&self) -> bool {
        !self.catalog.tmdb_api_key.is_empty()
    }
}
