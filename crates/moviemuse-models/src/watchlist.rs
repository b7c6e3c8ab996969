use crate::movie::MovieRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_date_added() -> DateTime<Utc> {
    Utc::now()
}

/// A movie the user marked watched, with their rating and review.
///
/// The backend-held list is the source of truth once authenticated; the
/// server replaces the entry in place when the same movie id is re-added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    #[serde(flatten)]
    pub movie: MovieRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_review: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,
    #[serde(default = "default_date_added")]
    pub date_added: DateTime<Utc>,
}

impl WatchlistEntry {
    pub fn new(movie: MovieRecord) -> Self {
        Self {
            movie,
            user_rating: None,
            user_review: None,
            imdb_rating: None,
            runtime_minutes: None,
            date_added: Utc::now(),
        }
    }
}
