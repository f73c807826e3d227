//! Seu Garçom edge server library.
//!
//! Locale and session gating in front of the page shell, plus the small
//! session API the client runtime talks to. The binary in `main.rs` only adds
//! Sentry, tracing setup, and the listener.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;

use axum::{Router, middleware::from_fn_with_state};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{locale_middleware, session_gate_middleware};
use crate::state::AppState;

/// Build the application router.
///
/// Layer order, outermost first: request tracing, session gate, locale
/// resolver. Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config().static_dir);

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", static_dir)
        .layer(from_fn_with_state(state.clone(), locale_middleware))
        .layer(from_fn_with_state(state.clone(), session_gate_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
