use moviemuse_models::Review;
use serde::{Deserialize, Serialize};

use crate::tmdb::api::TmdbMovie;

#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Error bodies carry `{"msg": "..."}`; anything else falls back to the
/// status line.
#[derive(Debug, Deserialize, Default)]
pub struct ApiError {
    #[serde(default)]
    pub msg: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewPayload<'a> {
    pub rating: u8,
    pub comment: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct PostReviewResponse {
    pub review: Review,
    pub message: String,
}

/// The feed endpoints proxy the catalog's raw list items straight through.
pub type FeedResponse = Vec<TmdbMovie>;
