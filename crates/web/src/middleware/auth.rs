//! Session extractor.
//!
//! Route handlers read the current session through [`OptionalSession`]
//! rather than touching cookies directly. An unreadable cookie is no session.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use seu_garcom_core::Session;

use crate::session::session_from_jar;
use crate::state::AppState;

/// Extractor that optionally gets the current session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(OptionalSession(session): OptionalSession) -> impl IntoResponse {
///     match session {
///         Some(s) => format!("Olá, {}!", s.user_id),
///         None => "Olá, visitante!".to_string(),
///     }
/// }
/// ```
pub struct OptionalSession(pub Option<Session>);

impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Self(session_from_jar(&jar, state.cipher())))
    }
}
