use thiserror::Error;

/// Errors surfaced by the backend client.
///
/// Catalog errors never reach callers as errors (they are absorbed into
/// empty results at the adapter boundary); this type covers the backend
/// REST surface, where the caller must react (e.g. redirect to login).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("authentication required: {0}")]
    Unauthorized(String),

    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
