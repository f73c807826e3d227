//! Session endpoints.
//!
//! Login and guest authorization trade credentials for a sealed session
//! cookie. `GET /api/auth/session` is what the fetch client's session
//! provider reads; it is the only endpoint that ever returns the bearer token.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use seu_garcom_core::{Email, RestaurantId, Role, Session, TableId, UnitId, UserId};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::OptionalSession;
use crate::session::{GUEST_COOKIE_NAME, SESSION_COOKIE_NAME, long_lived_cookie, removal_cookie};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Credential login body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub password: SecretString,
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<SecretString, D::Error>
where
    D: serde::Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// Guest (table QR) authorization body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestRequest {
    pub restaurant_id: RestaurantId,
    pub table_id: TableId,
}

/// Session as shown to page code: everything but the token.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub user_id: UserId,
    pub role: Role,
    pub restaurant_id: Option<RestaurantId>,
    pub unit_id: Option<UnitId>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            user_id: session.user_id.clone(),
            role: session.role,
            restaurant_id: session.restaurant_id.clone(),
            unit_id: session.unit_id.clone(),
        }
    }
}

/// Session payload for the fetch client's session provider.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub token: String,
    pub user_id: UserId,
    pub role: Role,
    pub restaurant_id: Option<RestaurantId>,
    pub unit_id: Option<UnitId>,
}

impl From<Session> for SessionPayload {
    fn from(session: Session) -> Self {
        Self {
            token: session.bearer_token.expose().to_owned(),
            user_id: session.user_id,
            role: session.role,
            restaurant_id: session.restaurant_id,
            unit_id: session.unit_id,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/auth/login`
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let email = Email::parse(&body.email).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let session = state.backend().login(&email, &body.password).await?;
    let sealed = state.cipher().seal(&session)?;

    set_sentry_user(&session.user_id, session.role.as_str());
    tracing::info!(user_id = %session.user_id, role = %session.role, "Signed in");

    let jar = jar.add(long_lived_cookie(
        SESSION_COOKIE_NAME,
        sealed.value,
        state.config().secure_cookies(),
    ));
    Ok((jar, Json(SessionView::from(&session))))
}

/// `POST /api/auth/guest`
#[instrument(skip_all)]
pub async fn guest(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<GuestRequest>,
) -> Result<impl IntoResponse> {
    let auth = state
        .backend()
        .authorize_guest(&body.restaurant_id, &body.table_id)
        .await?;
    let sealed = state.cipher().seal(&auth.session)?;
    let secure = state.config().secure_cookies();

    tracing::info!(
        guest_id = %auth.session.user_id,
        restaurant = %body.restaurant_id,
        table = %body.table_id,
        "Guest session opened"
    );

    let jar = jar
        .add(long_lived_cookie(GUEST_COOKIE_NAME, auth.guest_token, secure))
        .add(long_lived_cookie(SESSION_COOKIE_NAME, sealed.value, secure));
    Ok((jar, Json(SessionView::from(&auth.session))))
}

/// `GET /api/auth/session`
///
/// Responds with `null` when there is no readable session.
pub async fn session(OptionalSession(session): OptionalSession) -> Json<Option<SessionPayload>> {
    Json(session.map(SessionPayload::from))
}

/// `POST /api/auth/logout`
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    clear_sentry_user();
    let jar = jar
        .remove(removal_cookie(SESSION_COOKIE_NAME))
        .remove(removal_cookie(GUEST_COOKIE_NAME));
    (jar, StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;
    use seu_garcom_core::BearerToken;

    use super::*;

    fn attendant() -> Session {
        Session {
            user_id: UserId::parse("u-3").unwrap(),
            role: Role::Attendant,
            bearer_token: BearerToken::new("jwt-xyz"),
            restaurant_id: Some(RestaurantId::parse("r-1").unwrap()),
            unit_id: None,
        }
    }

    #[test]
    fn test_session_view_hides_token() {
        let json = serde_json::to_value(SessionView::from(&attendant())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "userId": "u-3",
                "role": "ATTENDANT",
                "restaurantId": "r-1",
                "unitId": null
            })
        );
    }

    #[test]
    fn test_session_payload_carries_token() {
        let json = serde_json::to_value(SessionPayload::from(attendant())).unwrap();
        assert_eq!(json["token"], "jwt-xyz");
        assert_eq!(json["role"], "ATTENDANT");
    }

    #[test]
    fn test_login_request_redacts_password() {
        let body: LoginRequest =
            serde_json::from_str(r#"{"email":"ana@garcom.app","password":"hunter2-secret"}"#)
                .unwrap();
        assert_eq!(body.password.expose_secret(), "hunter2-secret");
        let debug = format!("{body:?}");
        assert!(debug.contains("ana@garcom.app"));
        assert!(!debug.contains("hunter2-secret"));
    }

    #[test]
    fn test_guest_request_uses_camel_case() {
        let body: GuestRequest =
            serde_json::from_str(r#"{"restaurantId":"r-1","tableId":"t-9"}"#).unwrap();
        assert_eq!(body.table_id.as_str(), "t-9");
        assert!(serde_json::from_str::<GuestRequest>(r#"{"restaurantId":"","tableId":"t"}"#).is_err());
    }
}
