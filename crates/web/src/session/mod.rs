//! Session cookies.
//!
//! Three cookies matter to the edge:
//!
//! - [`SESSION_COOKIE_NAME`] - the encrypted [`Session`](seu_garcom_core::Session)
//!   written after credential or guest authorization
//! - [`GUEST_COOKIE_NAME`] - the guest-session token for table/QR flows
//! - [`LOCALE_COOKIE_NAME`] - the locale preference (see `middleware::locale`)
//!
//! The session cookie is self-contained: there is no server-side store, so a
//! sealed cookie is the whole session. See [`SessionCipher`] for the format.

mod cipher;

pub use cipher::{SealedSession, SessionCipher, SessionCookieError};

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use seu_garcom_core::Session;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "sg_session";

/// Guest-session cookie name.
pub const GUEST_COOKIE_NAME: &str = "sg_guest";

/// Locale preference cookie name.
pub const LOCALE_COOKIE_NAME: &str = "NEXT_LOCALE";

/// Max age shared by the session, guest, and locale cookies (30 days).
pub const COOKIE_MAX_AGE_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Decrypt the session cookie from a jar.
///
/// Every failure (missing cookie, tampering, expiry, stale format) is logged
/// at debug level and reported as `None`.
#[must_use]
pub fn session_from_jar(jar: &CookieJar, cipher: &SessionCipher) -> Option<Session> {
    let cookie = jar.get(SESSION_COOKIE_NAME)?;
    match cipher.open(cookie.value()) {
        Ok(session) if session.has_identity() => Some(session),
        Ok(_) => {
            tracing::debug!("Session cookie carries no bearer token");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unreadable session cookie");
            None
        }
    }
}

/// Whether the request carries a non-empty guest-session cookie.
#[must_use]
pub fn has_guest_cookie(jar: &CookieJar) -> bool {
    jar.get(GUEST_COOKIE_NAME)
        .is_some_and(|cookie| !cookie.value().trim().is_empty())
}

/// Build an HttpOnly cookie with the shared 30-day lifetime.
#[must_use]
pub fn long_lived_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(COOKIE_MAX_AGE_SECONDS))
        .build()
}

/// Build a removal cookie matching [`long_lived_cookie`]'s path.
#[must_use]
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use seu_garcom_core::{BearerToken, Role, UserId};

    use super::*;

    fn cipher() -> SessionCipher {
        SessionCipher::new(&SecretString::from("k9#Lq2!vZ8@rT5$wX1^pM7&nB4*cH6%d"))
    }

    fn session(token: &str) -> Session {
        Session {
            user_id: UserId::parse("u-1").unwrap(),
            role: Role::Admin,
            bearer_token: BearerToken::new(token),
            restaurant_id: None,
            unit_id: None,
        }
    }

    #[test]
    fn test_session_from_jar_reads_sealed_cookie() {
        let cipher = cipher();
        let sealed = cipher.seal(&session("jwt")).unwrap();
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE_NAME, sealed.value));

        let found = session_from_jar(&jar, &cipher).unwrap();
        assert_eq!(found.role, Role::Admin);
    }

    #[test]
    fn test_session_from_jar_degrades_on_garbage() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE_NAME, "not-a-session"));
        assert!(session_from_jar(&jar, &cipher()).is_none());
        assert!(session_from_jar(&CookieJar::new(), &cipher()).is_none());
    }

    #[test]
    fn test_session_without_token_is_ignored() {
        let cipher = cipher();
        let sealed = cipher.seal(&session("")).unwrap();
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE_NAME, sealed.value));
        assert!(session_from_jar(&jar, &cipher).is_none());
    }

    #[test]
    fn test_guest_cookie_must_be_non_empty() {
        assert!(!has_guest_cookie(&CookieJar::new()));
        let blank = CookieJar::new().add(Cookie::new(GUEST_COOKIE_NAME, " "));
        assert!(!has_guest_cookie(&blank));
        let present = CookieJar::new().add(Cookie::new(GUEST_COOKIE_NAME, "g-123"));
        assert!(has_guest_cookie(&present));
    }

    #[test]
    fn test_long_lived_cookie_attributes() {
        let cookie = long_lived_cookie(SESSION_COOKIE_NAME, "sealed".to_string(), true);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(
            cookie.max_age(),
            Some(time::Duration::seconds(COOKIE_MAX_AGE_SECONDS))
        );
    }
}
