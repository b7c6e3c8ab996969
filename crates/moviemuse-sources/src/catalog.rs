use async_trait::async_trait;
use moviemuse_models::{CatalogSource, MovieDetails, MovieId, MovieRecord};
use reqwest::Client;
use tracing::warn;

use crate::{omdb, tmdb};

/// The third-party movie catalog, normalized to the canonical record shape.
///
/// Implementations absorb upstream failures: list operations return an
/// empty sequence and the detail operation returns `None` on any HTTP or
/// payload problem, so callers need no per-call error handling.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn search(&self, title: &str, year: Option<u16>) -> Vec<MovieRecord>;
    async fn details(&self, id: &MovieId) -> Option<MovieDetails>;
    async fn similar(&self, id: &MovieId) -> Vec<MovieRecord>;
    async fn recommendations(&self, id: &MovieId) -> Vec<MovieRecord>;
    async fn discover_by_genre(&self, genre_id: u32) -> Vec<MovieRecord>;
}

/// TMDB-backed catalog, with OMDB handling detail lookups for legacy
/// IMDB-native ids.
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    tmdb_api_key: String,
    omdb_api_key: String,
    language: String,
}

impl CatalogClient {
    pub fn new(
        tmdb_api_key: impl Into<String>,
        omdb_api_key: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            tmdb_api_key: tmdb_api_key.into(),
            omdb_api_key: omdb_api_key.into(),
            language: language.into(),
        }
    }

    /// TMDB's per-movie endpoints need a TMDB-native id; IMDB-native ids go
    /// through the external-id lookup first.
    async fn tmdb_native_id(&self, id: &MovieId) -> Option<String> {
        match id.source() {
            CatalogSource::Tmdb => Some(id.native().to_string()),
            CatalogSource::Imdb => {
                match tmdb::api::find_by_imdb_id(
                    &self.http,
                    &self.tmdb_api_key,
                    &self.language,
                    id.native(),
                )
                .await
                {
                    Ok(Some(movie)) => Some(movie.id.to_string()),
                    Ok(None) => None,
                    Err(e) => {
                        warn!("TMDB find for {} failed: {:#}", id, e);
                        None
                    }
                }
            }
        }
    }

    fn convert_list(movies: Vec<tmdb::api::TmdbMovie>) -> Vec<MovieRecord> {
        movies.iter().filter_map(tmdb::api::convert_movie).collect()
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn search(&self, title: &str, year: Option<u16>) -> Vec<MovieRecord> {
        match tmdb::api::search(&self.http, &self.tmdb_api_key, &self.language, title, year).await
        {
            Ok(movies) => Self::convert_list(movies),
            Err(e) => {
                warn!("TMDB search '{}' failed: {:#}", title, e);
                Vec::new()
            }
        }
    }

    async fn details(&self, id: &MovieId) -> Option<MovieDetails> {
        match id.source() {
            CatalogSource::Tmdb => {
                match tmdb::api::details(&self.http, &self.tmdb_api_key, &self.language, id.native())
                    .await
                {
                    Ok(detail) => Some(tmdb::api::convert_detail(&detail)),
                    Err(e) => {
                        warn!("TMDB details for {} failed: {:#}", id, e);
                        None
                    }
                }
            }
            CatalogSource::Imdb => {
                match omdb::details(&self.http, &self.omdb_api_key, id.native()).await {
                    Ok(detail) => Some(detail),
                    Err(e) => {
                        warn!("OMDB details for {} failed: {:#}", id, e);
                        None
                    }
                }
            }
        }
    }

    async fn similar(&self, id: &MovieId) -> Vec<MovieRecord> {
        let Some(native) = self.tmdb_native_id(id).await else {
            return Vec::new();
        };
        match tmdb::api::similar(&self.http, &self.tmdb_api_key, &self.language, &native).await {
            Ok(movies) => Self::convert_list(movies),
            Err(e) => {
                warn!("TMDB similar for {} failed: {:#}", id, e);
                Vec::new()
            }
        }
    }

    async fn recommendations(&self, id: &MovieId) -> Vec<MovieRecord> {
        let Some(native) = self.tmdb_native_id(id).await else {
            return Vec::new();
        };
        match tmdb::api::recommendations(&self.http, &self.tmdb_api_key, &self.language, &native)
            .await
        {
            Ok(movies) => Self::convert_list(movies),
            Err(e) => {
                warn!("TMDB recommendations for {} failed: {:#}", id, e);
                Vec::new()
            }
        }
    }

    async fn discover_by_genre(&self, genre_id: u32) -> Vec<MovieRecord> {
        match tmdb::api::discover_by_genre(&self.http, &self.tmdb_api_key, &self.language, genre_id)
            .await
        {
            Ok(movies) => Self::convert_list(movies),
            Err(e) => {
                warn!("TMDB discover for genre {} failed: {:#}", genre_id, e);
                Vec::new()
            }
        }
    }
}
