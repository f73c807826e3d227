//! Session gating for page routes.
//!
//! Classifies the canonical, locale-stripped path and decides, from the decrypted
//! session and the guest cookie, whether the request proceeds.
//!
//! | Path class | Session | Guest cookie | Decision |
//! |------------|---------|--------------|----------|
//! | protected  | none    | absent       | redirect home |
//! | protected  | any     | present      | allow |
//! | public     | signed in | any        | redirect to admin |
//! | anything else |      |              | allow |
//!
//! An unreadable session cookie counts as no session.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use seu_garcom_core::{Locale, Session};

use crate::middleware::locale::split_locale_prefix;
use crate::session::{has_guest_cookie, session_from_jar};
use crate::state::AppState;

/// Paths (and their subpaths) that require a staff session or a guest cookie.
pub const PROTECTED_PREFIXES: &[&str] = &["/admin"];

/// Landing and login pages, hidden from signed-in users.
pub const PUBLIC_PATHS: &[&str] = &["/", "/login"];

/// Where the gate sends signed-in users.
pub const ADMIN_HOME: &str = "/admin";

/// How a path is treated by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Protected,
    Public,
    Open,
}

/// Outcome of gating one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToHome,
    RedirectToAdmin,
}

/// Collapse empty, `.` and `..` segments so `//admin` and
/// `/pt/login/../admin` are gated like `/admin` and `/pt/admin`.
///
/// The result always starts with `/` and has no trailing slash (except `/`).
#[must_use]
pub fn canonical_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Classify a path after canonicalizing it and removing any locale prefix.
#[must_use]
pub fn classify(path: &str) -> RouteClass {
    let canonical = canonical_path(path);
    let path = split_locale_prefix(&canonical).map_or(canonical.as_str(), |(_, rest)| rest);

    let is_protected = PROTECTED_PREFIXES.iter().any(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    });
    if is_protected {
        RouteClass::Protected
    } else if PUBLIC_PATHS.contains(&path) {
        RouteClass::Public
    } else {
        RouteClass::Open
    }
}

/// Decide whether a request proceeds.
///
/// `session` must already be decrypted and validated; pass `None` when the
/// cookie is missing or unreadable.
#[must_use]
pub fn evaluate(path: &str, session: Option<&Session>, has_guest: bool) -> GateDecision {
    let has_identity = session.is_some_and(Session::has_identity);
    let is_authenticated = session.is_some_and(Session::is_authenticated);

    match classify(path) {
        RouteClass::Protected if !has_identity && !has_guest => GateDecision::RedirectToHome,
        RouteClass::Public if is_authenticated => GateDecision::RedirectToAdmin,
        _ => GateDecision::Allow,
    }
}

/// Redirect target for a decision, keeping the request's locale prefix.
#[must_use]
pub fn redirect_location(decision: GateDecision, path: &str) -> Option<String> {
    let locale: Option<Locale> =
        split_locale_prefix(&canonical_path(path)).map(|(locale, _)| locale);
    let target = match decision {
        GateDecision::Allow => return None,
        GateDecision::RedirectToHome => "/",
        GateDecision::RedirectToAdmin => ADMIN_HOME,
    };

    Some(match (locale, target) {
        (Some(locale), "/") => format!("/{locale}"),
        (Some(locale), target) => format!("/{locale}{target}"),
        (None, target) => target.to_string(),
    })
}

/// Middleware applying [`evaluate`] to every request.
pub async fn session_gate_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let session = session_from_jar(&jar, state.cipher());
    let decision = evaluate(&path, session.as_ref(), has_guest_cookie(&jar));

    match redirect_location(decision, &path) {
        None => next.run(request).await,
        Some(location) => {
            tracing::debug!(%path, %location, ?decision, "Session gate redirect");
            Redirect::temporary(&location).into_response()
        }
    }
}
