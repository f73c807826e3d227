//! Application state shared across handlers and middleware.

use std::sync::Arc;

use crate::config::WebConfig;
use crate::services::{BackendClient, BackendError};
use crate::session::SessionCipher;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    cipher: SessionCipher,
    backend: BackendClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(config: WebConfig) -> Result<Self, BackendError> {
        let cipher = SessionCipher::new(&config.session_secret);
        let backend = BackendClient::new(&config.backend)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                cipher,
                backend,
            }),
        })
    }

    /// Get a reference to the edge configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get the session cookie cipher.
    #[must_use]
    pub fn cipher(&self) -> &SessionCipher {
        &self.inner.cipher
    }

    /// Get the backend authorization client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }
}
