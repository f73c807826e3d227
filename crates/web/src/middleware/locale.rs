//! Locale resolution and redirect.
//!
//! Every page URL carries a locale prefix (`/pt/...`, `/en/...`). A request
//! without one is redirected to the same path under the resolved locale, and
//! the choice is remembered in the `NEXT_LOCALE` cookie.
//!
//! Resolution order:
//! 1. `NEXT_LOCALE` cookie, when it names a supported locale
//! 2. Best `Accept-Language` match
//! 3. The configured default
//!
//! Nothing here fails: an unreadable header or cookie simply moves on to the
//! next step.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Uri, header::ACCEPT_LANGUAGE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use seu_garcom_core::Locale;

use crate::session::{COOKIE_MAX_AGE_SECONDS, LOCALE_COOKIE_NAME};
use crate::state::AppState;

/// Outcome of locale resolution for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleDecision {
    /// The path already carries a supported locale, or is exempt.
    Continue,
    /// Redirect to `location` and remember `locale`.
    Redirect {
        /// Target path with locale prefix and original query.
        location: String,
        /// Locale to store in the cookie.
        locale: Locale,
    },
}

/// Split a supported locale prefix off a path.
///
/// Returns the locale and the remainder (always starting with `/`).
///
/// ```
/// use seu_garcom_core::Locale;
/// use seu_garcom_web::middleware::locale::split_locale_prefix;
///
/// assert_eq!(split_locale_prefix("/en/admin"), Some((Locale::En, "/admin")));
/// assert_eq!(split_locale_prefix("/pt"), Some((Locale::Pt, "/")));
/// assert_eq!(split_locale_prefix("/admin"), None);
/// ```
#[must_use]
pub fn split_locale_prefix(path: &str) -> Option<(Locale, &str)> {
    let rest = path.strip_prefix('/')?;
    let (segment, remainder) = rest.find('/').map_or((rest, "/"), |i| rest.split_at(i));
    Locale::from_code(segment).map(|locale| (locale, remainder))
}

/// Paths that never get a locale prefix: API, static assets, health checks,
/// and anything that looks like a file.
#[must_use]
pub fn is_locale_exempt(path: &str) -> bool {
    let is_under = |prefix: &str| {
        path == prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    };
    if is_under("/api") || is_under("/static") || is_under("/health") {
        return true;
    }
    path.rsplit('/').next().is_some_and(|last| last.contains('.'))
}

/// Best supported match from an `Accept-Language` value.
///
/// Entries are ranked by their `q` weight (default 1, stable for ties).
/// Entries with an unparseable weight, `q=0`, or the `*` wildcard are skipped.
#[must_use]
pub fn match_accept_language(value: &str) -> Option<Locale> {
    let mut ranked: Vec<(f32, Locale)> = value
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let mut weight = 1.0_f32;
            for param in parts {
                if let Some(q) = param.trim().strip_prefix("q=") {
                    weight = q.trim().parse().ok()?;
                }
            }
            if !(weight > 0.0 && weight <= 1.0) {
                return None;
            }
            Locale::from_tag(tag).map(|locale| (weight, locale))
        })
        .collect();

    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked.first().map(|(_, locale)| *locale)
}

/// Pick the locale for a request that has no locale prefix.
#[must_use]
pub fn preferred_locale(jar: &CookieJar, headers: &HeaderMap, default: Locale) -> Locale {
    if let Some(locale) = jar
        .get(LOCALE_COOKIE_NAME)
        .and_then(|cookie| Locale::from_code(cookie.value()))
    {
        return locale;
    }

    headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .and_then(match_accept_language)
        .unwrap_or(default)
}

/// Decide whether a request continues or is redirected to a localized path.
#[must_use]
pub fn resolve_locale(
    uri: &Uri,
    jar: &CookieJar,
    headers: &HeaderMap,
    default: Locale,
) -> LocaleDecision {
    let path = uri.path();
    if is_locale_exempt(path) || split_locale_prefix(path).is_some() {
        return LocaleDecision::Continue;
    }

    let locale = preferred_locale(jar, headers, default);
    let mut location = format!("/{locale}");
    if path != "/" {
        location.push_str(path);
    }
    if let Some(query) = uri.query() {
        location.push('?');
        location.push_str(query);
    }

    LocaleDecision::Redirect { location, locale }
}

/// Build the locale preference cookie.
///
/// Readable by client scripts so the UI can show the active language.
#[must_use]
pub fn locale_cookie(locale: Locale, secure: bool) -> Cookie<'static> {
    Cookie::build((LOCALE_COOKIE_NAME, locale.as_str()))
        .path("/")
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(COOKIE_MAX_AGE_SECONDS))
        .build()
}

/// Middleware that redirects locale-less page requests.
///
/// Sets the locale cookie only when redirecting.
pub async fn locale_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let decision = resolve_locale(
        request.uri(),
        &jar,
        request.headers(),
        state.config().default_locale,
    );

    match decision {
        LocaleDecision::Continue => next.run(request).await,
        LocaleDecision::Redirect { location, locale } => {
            tracing::debug!(%location, %locale, "Redirecting to localized path");
            let jar = jar.add(locale_cookie(locale, state.config().secure_cookies()));
            (jar, Redirect::temporary(&location)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap_or_default()
    }

    fn accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(value));
        headers
    }

    fn redirect_to(location: &str, locale: Locale) -> LocaleDecision {
        LocaleDecision::Redirect {
            location: location.to_string(),
            locale,
        }
    }

    #[test]
    fn test_prefixed_paths_continue() {
        for locale in Locale::ALL {
            let path = format!("/{locale}/admin/products");
            assert_eq!(
                resolve_locale(&uri(&path), &CookieJar::new(), &HeaderMap::new(), Locale::Pt),
                LocaleDecision::Continue
            );
        }
    }

    #[test]
    fn test_cookie_wins_over_header() {
        let jar = CookieJar::new().add(Cookie::new(LOCALE_COOKIE_NAME, "es"));
        assert_eq!(
            resolve_locale(&uri("/menu"), &jar, &accept("en-US"), Locale::Pt),
            redirect_to("/es/menu", Locale::Es)
        );
    }

    #[test]
    fn test_unsupported_cookie_falls_through_to_header() {
        let jar = CookieJar::new().add(Cookie::new(LOCALE_COOKIE_NAME, "klingon"));
        assert_eq!(
            resolve_locale(&uri("/"), &jar, &accept("en-GB,en;q=0.8"), Locale::Pt),
            redirect_to("/en", Locale::En)
        );
    }

    #[test]
    fn test_default_when_nothing_matches() {
        assert_eq!(
            resolve_locale(&uri("/login"), &CookieJar::new(), &accept("de-DE"), Locale::Pt),
            redirect_to("/pt/login", Locale::Pt)
        );
        assert_eq!(
            resolve_locale(&uri("/login"), &CookieJar::new(), &HeaderMap::new(), Locale::En),
            redirect_to("/en/login", Locale::En)
        );
    }

    #[test]
    fn test_query_string_is_preserved() {
        assert_eq!(
            resolve_locale(
                &uri("/menu/r-1?table=4&lang=x"),
                &CookieJar::new(),
                &HeaderMap::new(),
                Locale::Pt
            ),
            redirect_to("/pt/menu/r-1?table=4&lang=x", Locale::Pt)
        );
    }

    #[test]
    fn test_exempt_paths_continue() {
        for path in ["/api/auth/session", "/static/app.js", "/health", "/favicon.ico"] {
            assert_eq!(
                resolve_locale(&uri(path), &CookieJar::new(), &HeaderMap::new(), Locale::Pt),
                LocaleDecision::Continue,
                "{path} should be exempt"
            );
        }
        assert!(!is_locale_exempt("/apiary"));
    }

    #[test]
    fn test_accept_language_respects_weights() {
        assert_eq!(
            match_accept_language("fr;q=1.0, en;q=0.5, es;q=0.9"),
            Some(Locale::Es)
        );
        assert_eq!(match_accept_language("pt-BR, en;q=0.9"), Some(Locale::Pt));
        assert_eq!(match_accept_language("en;q=0, es"), Some(Locale::Es));
    }

    #[test]
    fn test_accept_language_tolerates_garbage() {
        assert_eq!(match_accept_language(""), None);
        assert_eq!(match_accept_language(";;;,,,"), None);
        assert_eq!(match_accept_language("*"), None);
        assert_eq!(match_accept_language("en;q=abc, es;q=0.2"), Some(Locale::Es));
        assert_eq!(match_accept_language("en;q=7"), None);
    }

    #[test]
    fn test_non_utf8_header_falls_back_to_default() {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap_or(HeaderValue::from_static("")),
        );
        assert_eq!(preferred_locale(&CookieJar::new(), &headers, Locale::Es), Locale::Es);
    }

    #[test]
    fn test_split_locale_prefix_requires_whole_segment() {
        assert_eq!(split_locale_prefix("/ptx/admin"), None);
        assert_eq!(split_locale_prefix("/es/"), Some((Locale::Es, "/")));
        assert_eq!(split_locale_prefix(""), None);
    }

    #[test]
    fn test_locale_cookie_lives_thirty_days() {
        let cookie = locale_cookie(Locale::En, false);
        assert_eq!(cookie.value(), "en");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(30)));
        assert_ne!(cookie.http_only(), Some(true));
    }
}
