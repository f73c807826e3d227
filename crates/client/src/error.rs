//! Client error types.

use thiserror::Error;

/// Errors surfaced by [`ApiClient`](crate::ApiClient).
///
/// Non-2xx responses other than 401 are not errors: they come back as
/// ordinary responses for the caller to inspect.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request did not finish within its timeout.
    #[error("request timed out")]
    Timeout,

    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    RequestFailed(#[source] reqwest::Error),

    /// The backend rejected the token twice; the user has been signed out.
    #[error("session expired")]
    SessionExpired,

    /// The request path could not be resolved against the base URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request body could not be serialized.
    #[error("invalid request body: {0}")]
    Body(#[from] serde_json::Error),

    /// Client configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::RequestFailed(error)
        }
    }
}
