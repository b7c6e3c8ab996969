use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Tokens issued by the backend are honored client-side for 8 hours.
const TOKEN_LIFETIME_HOURS: i64 = 8;

#[derive(Debug, Serialize, Deserialize, Default)]
struct SessionData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// Persisted auth session: bearer token, expiry and username.
///
/// Expiry is stored as epoch milliseconds, matching what the web client
/// kept in browser storage.
pub struct SessionStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            values: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let session: SessionData = toml::from_str(&content)?;
            self.values = session.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let session = SessionData {
            data: self.values.clone(),
        };
        let content = toml::to_string_pretty(&session)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn token(&self) -> Option<&String> {
        self.values.get("token")
    }

    pub fn username(&self) -> Option<&String> {
        self.values.get("username")
    }

    pub fn token_expiry(&self) -> Option<DateTime<Utc>> {
        self.values
            .get("token_expiry")
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(DateTime::from_timestamp_millis)
    }

    /// Record a fresh login; the expiry is stamped now + 8 hours.
    pub fn set_login(&mut self, username: String, token: String) {
        let expiry = Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS);
        self.values.insert("token".to_string(), token);
        self.values
            .insert("token_expiry".to_string(), expiry.timestamp_millis().to_string());
        self.values.insert("username".to_string(), username);
    }

    /// A session is usable while it has a token that has not expired.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match (self.token(), self.token_expiry()) {
            (Some(token), Some(expiry)) => !token.is_empty() && expiry > now,
            _ => false,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Logout: forget everything and remove the file.
    pub fn clear(&mut self) -> Result<()> {
        self.values.clear();
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_session_store_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut store = SessionStore::new(path.clone());
        store.set_login("alice".to_string(), "jwt-token".to_string());
        store.save().unwrap();

        let mut loaded = SessionStore::new(path);
        loaded.load().unwrap();
        assert_eq!(loaded.token(), Some(&"jwt-token".to_string()));
        assert_eq!(loaded.username(), Some(&"alice".to_string()));
        assert!(loaded.is_valid());
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let file = NamedTempFile::new().unwrap();
        let mut store = SessionStore::new(file.path().to_path_buf());
        store.set_login("alice".to_string(), "jwt-token".to_string());

        let expiry = store.token_expiry().unwrap();
        assert!(store.is_valid_at(expiry - Duration::seconds(1)));
        assert!(!store.is_valid_at(expiry + Duration::seconds(1)));
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("session.toml");

        let mut store = SessionStore::new(path.clone());
        store.set_login("alice".to_string(), "jwt-token".to_string());
        store.save().unwrap();
        assert!(path.exists());

        store.clear().unwrap();
        assert!(!path.exists());
        assert!(store.token().is_none());
        assert!(!store.is_valid());
    }

    #[test]
    fn test_no_session_is_invalid() {
        let store = SessionStore::new(PathBuf::from("/nonexistent/session.toml"));
        assert!(!store.is_valid());
    }
}
