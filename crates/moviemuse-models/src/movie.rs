use crate::movie_id::MovieId;
use serde::{Deserialize, Serialize};

/// Canonical movie shape shared by search results, feeds and the watchlist.
///
/// `year` stays a string because the upstream may not know it ("N/A");
/// `poster_url` is absent when the upstream reports its "no image" sentinel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
}

impl MovieRecord {
    /// A record is worth showing only with a title and a real poster.
    pub fn is_displayable(&self) -> bool {
        !self.title.is_empty() && self.poster_url.is_some()
    }
}

/// Extended fields only the detail view needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: MovieRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,
    /// Source-specific scale: TMDB vote average 0-10, IMDB rating 0-10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cast: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub writers: Vec<String>,
}
