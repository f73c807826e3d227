//! Where the client gets tokens from, and who hears about sign-out.
//!
//! Resolution asks the [`LocalStore`] first (a synchronous snapshot of the
//! mirrored session) and falls back to the [`SessionProvider`] (the edge
//! server's session endpoint). Sign-out handlers run when the backend rejects
//! a refreshed token.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::COOKIE;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use seu_garcom_core::{BaseUrl, BearerToken, Session};

use crate::config::DEFAULT_TIMEOUT;
use crate::error::ClientError;

/// Synchronous view of the session mirrored on this side.
pub trait LocalStore: Send + Sync {
    /// Current bearer token, if the mirrored session has one.
    fn token(&self) -> Option<BearerToken>;
}

/// External session source, consulted when the local store has no token.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Fetch the current bearer token.
    ///
    /// `Ok(None)` means the provider answered and there is no session.
    async fn token(&self) -> Result<Option<BearerToken>, ClientError>;
}

/// Receives the global sign-out.
#[async_trait]
pub trait SignOut: Send + Sync {
    async fn sign_out(&self);
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-process mirror of the current session.
#[derive(Debug, Default)]
pub struct MemoryStore {
    session: Mutex<Option<Session>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the mirrored session.
    pub fn set(&self, session: Session) {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    /// Drop the mirrored session.
    pub fn clear(&self) {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Copy of the mirrored session.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LocalStore for MemoryStore {
    fn token(&self) -> Option<BearerToken> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|session| session.has_identity())
            .map(|session| session.bearer_token.clone())
    }
}

#[async_trait]
impl SignOut for MemoryStore {
    async fn sign_out(&self) {
        self.clear();
    }
}

// =============================================================================
// HttpSessionProvider
// =============================================================================

const SESSION_PATH: &str = "api/auth/session";
const LOGOUT_PATH: &str = "api/auth/logout";

#[derive(Deserialize)]
struct SessionPayload {
    token: String,
}

/// Reads the session from the edge server's `GET /api/auth/session`.
///
/// Sends the caller's cookie header so the edge can open the session cookie.
/// Both the session lookup and the sign-out call are bounded by the
/// provider's timeout (10 seconds unless changed with
/// [`HttpSessionProvider::with_timeout`]).
pub struct HttpSessionProvider {
    http: reqwest::Client,
    session_url: Url,
    logout_url: Url,
    cookie: String,
    timeout: Duration,
}

impl HttpSessionProvider {
    /// Create a provider for the edge server at `web_base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URLs cannot be built or the HTTP
    /// client fails to initialize.
    pub fn new(web_base_url: &Url, cookie: impl Into<String>) -> Result<Self, ClientError> {
        let base = BaseUrl::new(web_base_url.clone());
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            session_url: base.join(SESSION_PATH)?,
            logout_url: base.join(LOGOUT_PATH)?,
            cookie: cookie.into(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Override the timeout for calls to the edge server.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for HttpSessionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSessionProvider")
            .field("session_url", &self.session_url.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    #[instrument(skip(self), fields(url = %self.session_url))]
    async fn token(&self) -> Result<Option<BearerToken>, ClientError> {
        let response = self
            .http
            .get(self.session_url.clone())
            .timeout(self.timeout)
            .header(COOKIE, &self.cookie)
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Session endpoint returned non-success status");
            return Ok(None);
        }

        let payload: Option<SessionPayload> = response.json().await?;
        Ok(payload
            .map(|payload| BearerToken::new(payload.token))
            .filter(|token| !token.is_empty()))
    }
}

#[async_trait]
impl SignOut for HttpSessionProvider {
    async fn sign_out(&self) {
        let result = self
            .http
            .post(self.logout_url.clone())
            .timeout(self.timeout)
            .header(COOKIE, &self.cookie)
            .send()
            .await;
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to clear session cookies");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use seu_garcom_core::{Role, UserId};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn session(token: &str) -> Session {
        Session {
            user_id: UserId::parse("u-1").unwrap(),
            role: Role::Manager,
            bearer_token: BearerToken::new(token),
            restaurant_id: None,
            unit_id: None,
        }
    }

    #[test]
    fn test_memory_store_mirrors_session() {
        let store = MemoryStore::new();
        assert!(store.token().is_none());
        store.set(session("jwt-1"));
        assert_eq!(store.token().unwrap().expose(), "jwt-1");
        store.clear();
        assert!(store.token().is_none());
    }

    #[test]
    fn test_memory_store_ignores_empty_token() {
        let store = MemoryStore::new();
        store.set(session("  "));
        assert!(store.token().is_none());
        assert!(store.session().is_some());
    }

    #[tokio::test]
    async fn test_memory_store_sign_out_clears() {
        let store = MemoryStore::new();
        store.set(session("jwt-1"));
        store.sign_out().await;
        assert!(store.session().is_none());
    }

    #[tokio::test]
    async fn test_http_provider_reads_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/session"))
            .and(header("cookie", "sg_session=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "jwt-edge",
                "userId": "u-1",
                "role": "ADMIN",
                "restaurantId": null,
                "unitId": null
            })))
            .mount(&server)
            .await;

        let provider =
            HttpSessionProvider::new(&Url::parse(&server.uri()).unwrap(), "sg_session=abc").unwrap();
        assert_eq!(provider.token().await.unwrap().unwrap().expose(), "jwt-edge");
    }

    #[tokio::test]
    async fn test_http_provider_null_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/session"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let provider = HttpSessionProvider::new(&Url::parse(&server.uri()).unwrap(), "").unwrap();
        assert!(provider.token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_http_provider_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/session"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let provider = HttpSessionProvider::new(&Url::parse(&server.uri()).unwrap(), "")
            .unwrap()
            .with_timeout(Duration::from_millis(200));
        let result = provider.token().await;
        assert!(matches!(result, Err(ClientError::Timeout)));
    }

    #[tokio::test]
    async fn test_http_provider_keeps_base_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/app/api/auth/session"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            HttpSessionProvider::new(&Url::parse(&format!("{}/app", server.uri())).unwrap(), "")
                .unwrap();
        assert!(provider.token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_http_provider_sign_out_posts_logout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/logout"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let provider = HttpSessionProvider::new(&Url::parse(&server.uri()).unwrap(), "").unwrap();
        provider.sign_out().await;
    }
}
