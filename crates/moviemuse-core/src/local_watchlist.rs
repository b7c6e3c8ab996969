use anyhow::Result;
use moviemuse_models::{MovieId, WatchlistEntry};
use std::path::PathBuf;
use tracing::warn;

/// Local-only watchlist for sessions that are not logged in.
///
/// Holds the same entry shape the backend serves, in a single JSON file.
/// It is an ersatz list: on login it is discarded, never merged into the
/// account's server-held list.
pub struct LocalWatchlist {
    path: PathBuf,
}

impl LocalWatchlist {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn list(&self) -> Vec<WatchlistEntry> {
        if !self.path.exists() {
            return Vec::new();
        }
        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("local watchlist is corrupt, starting empty: {}", e);
                    Vec::new()
                }
            },
            Err(e) => {
                warn!("failed to read local watchlist: {}", e);
                Vec::new()
            }
        }
    }

    /// Upsert by movie id: re-adding replaces the entry in place, keeping
    /// its position, mirroring the server's add semantics.
    pub fn add(&self, entry: WatchlistEntry) -> Result<Vec<WatchlistEntry>> {
        let mut entries = self.list();
        match entries
            .iter()
            .position(|existing| existing.movie.id == entry.movie.id)
        {
            Some(index) => entries[index] = entry,
            None => entries.push(entry),
        }
        self.save(&entries)?;
        Ok(entries)
    }

    pub fn remove(&self, id: &MovieId) -> Result<Vec<WatchlistEntry>> {
        let mut entries = self.list();
        entries.retain(|entry| entry.movie.id != *id);
        self.save(&entries)?;
        Ok(entries)
    }

    /// Called on login: the server-held list takes over.
    pub fn discard(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn save(&self, entries: &[WatchlistEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
