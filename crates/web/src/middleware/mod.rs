//! HTTP middleware stack for the edge server.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans)
//! 3. Session gate (redirects by session and guest cookie)
//! 4. Locale resolver (redirects locale-less page paths)
//!
//! The gate runs before the locale resolver so that `/admin` without a
//! session goes straight home instead of bouncing through `/pt/admin`.

pub mod auth;
pub mod locale;
pub mod session_gate;

pub use auth::OptionalSession;
pub use locale::{LocaleDecision, locale_middleware, resolve_locale};
pub use session_gate::{GateDecision, evaluate, session_gate_middleware};
