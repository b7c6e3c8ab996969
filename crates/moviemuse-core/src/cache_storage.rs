use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Persistent tier of the query cache: one JSON file per key.
///
/// Survives restarts the way browser storage did for the web client. A
/// corrupt file is warned about, deleted and treated as a miss.
pub struct CacheStorage {
    dir: PathBuf,
}

/// Cache keys are already flat (`search-matrix`, `trending-page-1`);
/// anything outside the filename-safe set maps to `_`, deterministically
/// per key.
fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl CacheStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.entry_path(key);
        if !path.exists() {
            return None;
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("failed to read cache file for '{}': {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => {
                debug!("cache file hit: {}", key);
                Some(value)
            }
            Err(e) => {
                warn!(
                    "cache corruption detected for '{}': {}. Deleting corrupted file.",
                    key, e
                );
                if let Err(rm_err) = std::fs::remove_file(&path) {
                    warn!("failed to delete corrupted cache file: {}", rm_err);
                }
                None
            }
        }
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(self.entry_path(key), json)?;
        debug!("cache file saved: {}", key);
        Ok(())
    }

    pub fn remove(&self, key: &str) {
        let path = self.entry_path(key);
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!("failed to remove cache file for '{}': {}", key, e);
            }
        }
    }

    pub fn clear(&self) -> Result<()> {
        if self.dir.exists() {
            std::fs::remove_dir_all(&self.dir)?;
            std::fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }
}
