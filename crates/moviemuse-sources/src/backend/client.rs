use async_trait::async_trait;
use moviemuse_models::{Feed, MovieId, MovieRecord, Review, WatchlistEntry};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::api;
use super::FeedFetcher;
use crate::error::SourceError;
use crate::tmdb;

/// The backend expects its bearer token in this header on every
/// authenticated call.
const AUTH_HEADER: &str = "x-auth-token";

/// Thin REST client for the MovieMuse backend.
///
/// The server is authoritative: every watchlist mutation returns the full
/// resulting list, and `add` upserts by movie id server-side. No optimistic
/// merging happens here.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder, SourceError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| SourceError::Unauthorized("not logged in".to_string()))?;
        Ok(builder.header(AUTH_HEADER, token))
    }

    async fn handle<T: DeserializeOwned>(response: Response) -> Result<T, SourceError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| SourceError::Malformed(e.to_string()));
        }

        let message = response
            .json::<api::ApiError>()
            .await
            .ok()
            .and_then(|body| body.msg)
            .unwrap_or_else(|| status.to_string());

        if status == StatusCode::UNAUTHORIZED {
            Err(SourceError::Unauthorized(message))
        } else {
            Err(SourceError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String, SourceError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&api::Credentials { username, password })
            .send()
            .await?;
        let body: api::LoginResponse = Self::handle(response).await?;
        Ok(body.token)
    }

    pub async fn signup(&self, username: &str, password: &str) -> Result<(), SourceError> {
        let response = self
            .http
            .post(self.url("/auth/signup"))
            .json(&api::Credentials { username, password })
            .send()
            .await?;
        let _: serde_json::Value = Self::handle(response).await?;
        Ok(())
    }

    pub async fn watchlist(&self) -> Result<Vec<WatchlistEntry>, SourceError> {
        let request = self.authed(self.http.get(self.url("/watchlist")))?;
        Self::handle(request.send().await?).await
    }

    pub async fn watchlist_add(
        &self,
        entry: &WatchlistEntry,
    ) -> Result<Vec<WatchlistEntry>, SourceError> {
        let request = self.authed(self.http.post(self.url("/watchlist/add")))?;
        Self::handle(request.json(entry).send().await?).await
    }

    pub async fn watchlist_remove(
        &self,
        id: &MovieId,
    ) -> Result<Vec<WatchlistEntry>, SourceError> {
        let path = format!(
            "/watchlist/remove/{}",
            urlencoding::encode(&id.to_string())
        );
        let request = self.authed(self.http.delete(self.url(&path)))?;
        Self::handle(request.send().await?).await
    }

    pub async fn reviews(&self, id: &MovieId) -> Result<Vec<Review>, SourceError> {
        let path = format!("/reviews/{}", urlencoding::encode(&id.to_string()));
        let response = self.http.get(self.url(&path)).send().await?;
        Self::handle(response).await
    }

    /// Upsert keyed by (movie, user) server-side.
    pub async fn post_review(
        &self,
        id: &MovieId,
        rating: u8,
        comment: &str,
    ) -> Result<(Review, String), SourceError> {
        let path = format!("/reviews/{}", urlencoding::encode(&id.to_string()));
        let request = self.authed(self.http.post(self.url(&path)))?;
        let body: api::PostReviewResponse = Self::handle(
            request
                .json(&api::ReviewPayload { rating, comment })
                .send()
                .await?,
        )
        .await?;
        Ok((body.review, body.message))
    }

    pub async fn feed(&self, feed: Feed, page: u32) -> Result<Vec<MovieRecord>, SourceError> {
        let path = format!("/movies/{}", feed.as_str());
        debug!("fetching {} feed page {}", feed, page);
        let response = self
            .http
            .get(self.url(&path))
            .query(&[("page", page.to_string())])
            .send()
            .await?;
        let movies: api::FeedResponse = Self::handle(response).await?;
        Ok(movies.iter().filter_map(tmdb::api::convert_movie).collect())
    }
}

#[async_trait]
impl FeedFetcher for BackendClient {
    async fn fetch_feed(&self, feed: Feed, page: u32) -> Result<Vec<MovieRecord>, SourceError> {
        self.feed(feed, page).await
    }
}
