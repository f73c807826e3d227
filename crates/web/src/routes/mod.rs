//! HTTP route handlers for the edge server.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /static/*               - Built client assets
//!
//! # Session API
//! POST /api/auth/login         - Credential login, sets session cookie
//! POST /api/auth/guest         - Table authorization, sets guest + session cookies
//! GET  /api/auth/session       - Current session (with token) or null
//! POST /api/auth/logout        - Clears session and guest cookies
//!
//! # Locale
//! POST /api/locale             - Explicit locale change
//!
//! # Pages
//! GET  /{locale}/*             - Page shell (fallback)
//! ```

pub mod auth;
pub mod locale;
pub mod pages;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the session API router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/guest", post(auth::guest))
        .route("/session", get(auth::session))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the edge server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_routes())
        .route("/api/locale", post(locale::set_locale))
        .fallback(get(pages::shell))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}
