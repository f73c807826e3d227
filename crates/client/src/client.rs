//! The authenticated fetch client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, Response, StatusCode, header::HeaderMap};
use serde::Serialize;
use tracing::instrument;
use url::Url;

use seu_garcom_core::{BaseUrl, BearerToken};

use crate::cache::{TOKEN_TTL, TokenCache};
use crate::clock::{Clock, SystemClock};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::source::{LocalStore, SessionProvider, SignOut};

/// Upper bound on sends per request: the original call plus one retry.
pub const MAX_ATTEMPTS: u32 = 2;

/// Per-request options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Overrides the client's default timeout.
    pub timeout: Option<Duration>,
    /// Extra headers. `Authorization` is always set by the client.
    pub headers: HeaderMap,
    /// JSON body.
    pub json: Option<serde_json::Value>,
}

impl RequestOptions {
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Body` if `body` cannot be serialized.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.json = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    config: ClientConfig,
    clock: Arc<dyn Clock>,
    local_store: Option<Arc<dyn LocalStore>>,
    session_provider: Option<Arc<dyn SessionProvider>>,
    sign_out: Vec<Arc<dyn SignOut>>,
}

impl ApiClientBuilder {
    /// Replace the system clock (tests pass a `ManualClock`).
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn local_store(mut self, store: Arc<dyn LocalStore>) -> Self {
        self.local_store = Some(store);
        self
    }

    #[must_use]
    pub fn session_provider(mut self, provider: Arc<dyn SessionProvider>) -> Self {
        self.session_provider = Some(provider);
        self
    }

    /// Register a sign-out handler. Handlers run in registration order.
    #[must_use]
    pub fn on_sign_out(mut self, handler: Arc<dyn SignOut>) -> Self {
        self.sign_out.push(handler);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(ApiClient {
            http,
            base_url: self.config.base_url,
            default_timeout: self.config.default_timeout,
            cache: TokenCache::new(TOKEN_TTL, self.clock),
            local_store: self.local_store,
            session_provider: self.session_provider,
            sign_out: self.sign_out,
        })
    }
}

/// HTTP client that attaches the bearer token and retries once on 401.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: BaseUrl,
    default_timeout: Duration,
    cache: TokenCache,
    local_store: Option<Arc<dyn LocalStore>>,
    session_provider: Option<Arc<dyn SessionProvider>>,
    sign_out: Vec<Arc<dyn SignOut>>,
}

impl ApiClient {
    /// Start building a client.
    #[must_use]
    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            clock: Arc::new(SystemClock),
            local_store: None,
            session_provider: None,
            sign_out: Vec::new(),
        }
    }

    /// Send a request to `path`, resolved against the base URL.
    ///
    /// Any status other than 401 is returned as-is. A 401 invalidates the
    /// cached token and the request is sent once more with a fresh one; if
    /// that also gets a 401, or no token can be found for it, every sign-out
    /// handler runs and the call fails with `SessionExpired`.
    ///
    /// # Errors
    ///
    /// `Timeout` when the call, token lookup included, outlives its timeout,
    /// `RequestFailed` for transport failures (neither is retried),
    /// `SessionExpired` as above, `InvalidUrl` for an unusable path.
    #[instrument(skip(self, options))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, ClientError> {
        let url = self.base_url.join(path)?;
        let timeout = options.timeout.unwrap_or(self.default_timeout);

        // Token lookup and both sends share one deadline. Sign-out is not
        // bounded by it.
        let outcome = tokio::time::timeout(timeout, self.attempts(method, url, &options, timeout))
            .await
            .map_err(|_| ClientError::Timeout)??;

        match outcome {
            Some(response) => Ok(response),
            None => {
                self.sign_out().await;
                Err(ClientError::SessionExpired)
            }
        }
    }

    /// The bounded attempt loop. `None` means the session is gone.
    async fn attempts(
        &self,
        method: Method,
        url: Url,
        options: &RequestOptions,
        timeout: Duration,
    ) -> Result<Option<Response>, ClientError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let token = self.resolve_token().await;
            if attempt > 1 && token.is_none() {
                tracing::info!("No token available for retry");
                return Ok(None);
            }

            let response = self
                .send(method.clone(), url.clone(), options, token.as_ref(), timeout)
                .await?;
            if response.status() != StatusCode::UNAUTHORIZED {
                return Ok(Some(response));
            }

            tracing::debug!(attempt, "Backend answered 401");
            if attempt >= MAX_ATTEMPTS {
                return Ok(None);
            }
            self.cache.invalidate();
        }
    }

    /// `GET path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get(&self, path: &str) -> Result<Response, ClientError> {
        self.request(Method::GET, path, RequestOptions::default())
            .await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, ClientError> {
        let options = RequestOptions::default().with_json(body)?;
        self.request(Method::POST, path, options).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, ClientError> {
        let options = RequestOptions::default().with_json(body)?;
        self.request(Method::PUT, path, options).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete(&self, path: &str) -> Result<Response, ClientError> {
        self.request(Method::DELETE, path, RequestOptions::default())
            .await
    }

    /// Current token, from the cache when fresh.
    ///
    /// On a miss, asks the local store and then the session provider, and
    /// caches the outcome including "no token". A provider failure is
    /// logged and not cached.
    pub async fn resolve_token(&self) -> Option<BearerToken> {
        if let Some(cached) = self.cache.get() {
            return cached;
        }

        if let Some(token) = self.local_store.as_ref().and_then(|store| store.token()) {
            self.cache.put(Some(token.clone()));
            return Some(token);
        }

        let Some(provider) = &self.session_provider else {
            self.cache.put(None);
            return None;
        };
        match provider.token().await {
            Ok(token) => {
                self.cache.put(token.clone());
                token
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session provider failed");
                None
            }
        }
    }

    /// Force the next call to resolve a fresh token.
    pub fn invalidate_token(&self) {
        self.cache.invalidate();
    }

    /// Global sign-out: drop the cached token and run every handler.
    pub async fn sign_out(&self) {
        tracing::info!(handlers = self.sign_out.len(), "Signing out");
        self.cache.invalidate();
        for handler in &self.sign_out {
            handler.sign_out().await;
        }
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        options: &RequestOptions,
        token: Option<&BearerToken>,
        timeout: Duration,
    ) -> Result<Response, ClientError> {
        let mut request = self
            .http
            .request(method, url)
            .timeout(timeout)
            .headers(options.headers.clone());
        if let Some(token) = token {
            request = request.bearer_auth(token.expose());
        }
        if let Some(body) = &options.json {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}
