//! Client configuration.

use std::time::Duration;

use seu_garcom_core::BaseUrl;
use url::Url;

use crate::error::ClientError;

/// Timeout applied when a request does not set its own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetch client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin; every request path is resolved against it.
    pub base_url: BaseUrl,
    /// Deadline for a whole request, token lookup and retry included, unless
    /// overridden in [`RequestOptions`](crate::RequestOptions).
    pub default_timeout: Duration,
}

impl ClientConfig {
    /// Configuration with the default 10 second timeout.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: BaseUrl::new(base_url),
            default_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Load from `GARCOM_API_BASE_URL`, reading `.env` if present.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the variable is missing or not a URL.
    pub fn from_env() -> Result<Self, ClientError> {
        let _ = dotenvy::dotenv();

        let raw = std::env::var("GARCOM_API_BASE_URL")
            .map_err(|_| ClientError::Config("GARCOM_API_BASE_URL is not set".to_string()))?;
        let base_url = Url::parse(&raw)
            .map_err(|e| ClientError::Config(format!("GARCOM_API_BASE_URL: {e}")))?;
        Ok(Self::new(base_url))
    }

    /// Override the default timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }
}
