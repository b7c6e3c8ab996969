use crate::movie_id::MovieId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A public review, one per (movie, user) on the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub movie_id: MovieId,
    pub username: String,
    pub rating: u8,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
