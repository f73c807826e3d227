//! Shared fixtures for the Seu Garçom integration tests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p seu-garcom-integration-tests
//! ```
//!
//! Everything runs in-process: the router is driven with `tower::ServiceExt::oneshot`
//! or bound to an ephemeral port, and the backend is a `wiremock` server.
//!
//! # Test Files
//!
//! - `gating` - locale resolver and session gate through the full router
//! - `auth_api` - session endpoints against a mocked backend
//! - `fetch_client` - fetch client reading its token from a live edge server

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Request, header::SET_COOKIE};
use secrecy::SecretString;

use seu_garcom_core::{BaseUrl, BearerToken, RestaurantId, Role, Session, UserId};
use seu_garcom_web::config::{BackendConfig, WebConfig};
use seu_garcom_web::session::SESSION_COOKIE_NAME;
use seu_garcom_web::state::AppState;

/// Session secret used by every test server.
pub const TEST_SECRET: &str = "k9#Lq2!vZ8@rT5$wX1^pM7&nB4*cH6%d";

/// Edge configuration pointing at `api_base_url`.
#[must_use]
pub fn test_config(api_base_url: &str) -> WebConfig {
    WebConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from(TEST_SECRET),
        backend: BackendConfig {
            base_url: BaseUrl::parse(api_base_url).unwrap(),
            timeout: Duration::from_secs(2),
        },
        default_locale: seu_garcom_core::Locale::Pt,
        static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../web/static")),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Application state for a backend at `api_base_url`.
#[must_use]
pub fn test_state(api_base_url: &str) -> AppState {
    AppState::new(test_config(api_base_url)).unwrap()
}

/// Application state whose backend is never called.
#[must_use]
pub fn offline_state() -> AppState {
    test_state("http://127.0.0.1:9")
}

/// A session with the given role.
#[must_use]
pub fn session(role: Role) -> Session {
    Session {
        user_id: UserId::parse("u-1").unwrap(),
        role,
        bearer_token: BearerToken::new("jwt-edge"),
        restaurant_id: Some(RestaurantId::parse("r-1").unwrap()),
        unit_id: None,
    }
}

/// `Cookie` header value carrying `session` sealed for `state`.
#[must_use]
pub fn session_cookie(state: &AppState, session: &Session) -> String {
    let sealed = state.cipher().seal(session).unwrap();
    format!("{SESSION_COOKIE_NAME}={}", sealed.value)
}

/// A GET request with optional `Cookie` and `Accept-Language` headers.
#[must_use]
pub fn get(path: &str, cookie: Option<&str>, accept_language: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    if let Some(value) = accept_language {
        builder = builder.header("accept-language", value);
    }
    builder.body(Body::empty()).unwrap()
}

/// A JSON POST request with an optional `Cookie` header.
#[must_use]
pub fn post_json(path: &str, body: &serde_json::Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// All `Set-Cookie` values on a response.
#[must_use]
pub fn set_cookies(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_owned)
        .collect()
}

/// The `Set-Cookie` value for `name`, if any.
#[must_use]
pub fn set_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    set_cookies(headers)
        .into_iter()
        .find(|cookie| cookie.starts_with(&prefix))
}

/// `name=value` pair from a `Set-Cookie` value, for replaying as `Cookie`.
#[must_use]
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap_or_default().to_owned()
}

/// Serve the edge router on an ephemeral port.
pub async fn spawn_edge(state: AppState) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = seu_garcom_web::app(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
