//! Backend authorization calls.
//!
//! The edge only talks to the backend to turn credentials (or a table QR
//! code) into a session. The role in the resulting [`Session`] always comes
//! from the backend response.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use seu_garcom_core::{
    BaseUrl, BearerToken, Email, RestaurantId, Role, Session, TableId, UnitId, UserId,
};

use crate::config::BackendConfig;

/// Credential login endpoint, relative to the API base URL.
const LOGIN_PATH: &str = "auth/login";

/// Guest (table) authorization endpoint, relative to the API base URL.
const GUEST_PATH: &str = "auth/guest";

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend did not answer in time.
    #[error("backend request timed out")]
    Timeout,

    /// Backend rejected the credentials or guest code (401/403).
    #[error("authorization rejected")]
    Rejected,

    /// Backend returned an unexpected status.
    #[error("backend returned HTTP {status}: {message}")]
    Unexpected {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        message: String,
    },

    /// Endpoint URL could not be built.
    #[error("invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GuestRequest<'a> {
    restaurant_id: &'a RestaurantId,
    table_id: &'a TableId,
}

/// Response from the credential login endpoint.
#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    user: LoginUser,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginUser {
    id: UserId,
    role: Role,
    #[serde(default)]
    restaurant_id: Option<RestaurantId>,
    #[serde(default)]
    unit_id: Option<UnitId>,
}

/// Response from the guest authorization endpoint.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuestResponse {
    token: String,
    guest_id: UserId,
}

/// A successful guest authorization.
#[derive(Debug, Clone)]
pub struct GuestAuthorization {
    /// Session for backend calls made from the table.
    pub session: Session,
    /// Value for the guest-session cookie.
    pub guest_token: String,
}

/// Client for the backend's authorization endpoints.
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: BaseUrl,
}

impl BackendClient {
    /// Create a backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Exchange staff credentials for a session.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Rejected` for invalid credentials, and transport
    /// or status errors otherwise.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Session, BackendError> {
        let body = LoginRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        let response: LoginResponse = self.post(LOGIN_PATH, &body).await?;

        tracing::info!(role = %response.user.role, "Credential login accepted");
        Ok(Session {
            user_id: response.user.id,
            role: response.user.role,
            bearer_token: BearerToken::new(response.token),
            restaurant_id: response.user.restaurant_id,
            unit_id: response.user.unit_id,
        })
    }

    /// Open a guest session for a restaurant table.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Rejected` when the table code is not valid.
    #[instrument(skip(self), fields(restaurant = %restaurant_id, table = %table_id))]
    pub async fn authorize_guest(
        &self,
        restaurant_id: &RestaurantId,
        table_id: &TableId,
    ) -> Result<GuestAuthorization, BackendError> {
        let body = GuestRequest {
            restaurant_id,
            table_id,
        };
        let response: GuestResponse = self.post(GUEST_PATH, &body).await?;

        Ok(GuestAuthorization {
            guest_token: response.guest_id.to_string(),
            session: Session {
                user_id: response.guest_id,
                role: Role::Guest,
                bearer_token: BearerToken::new(response.token),
                restaurant_id: Some(restaurant_id.clone()),
                unit_id: None,
            },
        })
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + Sync,
        R: serde::de::DeserializeOwned,
    {
        let url = self.base_url.join(path)?;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(BackendError::Rejected);
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(200)
                .collect::<String>();
            tracing::warn!(status = %status, %message, "Backend returned non-success status");
            return Err(BackendError::Unexpected {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(classify_transport)
    }
}

fn classify_transport(error: reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Http(error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer, prefix: &str) -> BackendClient {
        BackendClient::new(&BackendConfig {
            base_url: BaseUrl::parse(&format!("{}{prefix}", server.uri())).unwrap(),
            timeout: Duration::from_millis(500),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_login_builds_session_from_backend_role() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/login"))
            .and(body_json(serde_json::json!({
                "email": "gerente@bar.com",
                "password": "hunter2"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "jwt-abc",
                "user": { "id": "u-9", "role": "MANAGER", "restaurantId": "r-1", "unitId": "un-2" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, "/v1");
        let session = client
            .login(
                &Email::parse("gerente@bar.com").unwrap(),
                &SecretString::from("hunter2"),
            )
            .await
            .unwrap();

        assert_eq!(session.role, Role::Manager);
        assert_eq!(session.bearer_token.expose(), "jwt-abc");
        assert_eq!(session.unit_id.unwrap().as_str(), "un-2");
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = client_for(&server, "")
            .login(
                &Email::parse("a@b.com").unwrap(),
                &SecretString::from("wrong"),
            )
            .await;
        assert!(matches!(result, Err(BackendError::Rejected)));
    }

    #[tokio::test]
    async fn test_unexpected_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/guest"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let result = client_for(&server, "")
            .authorize_guest(
                &RestaurantId::parse("r-1").unwrap(),
                &TableId::parse("t-4").unwrap(),
            )
            .await;
        assert!(matches!(
            result,
            Err(BackendError::Unexpected { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_guest_authorization_is_guest_role() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/guest"))
            .and(body_json(serde_json::json!({ "restaurantId": "r-1", "tableId": "t-4" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "token": "guest-jwt",
                "guestId": "g-77"
            })))
            .mount(&server)
            .await;

        let auth = client_for(&server, "")
            .authorize_guest(
                &RestaurantId::parse("r-1").unwrap(),
                &TableId::parse("t-4").unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(auth.session.role, Role::Guest);
        assert_eq!(auth.guest_token, "g-77");
        assert_eq!(auth.session.restaurant_id.unwrap().as_str(), "r-1");
    }

    #[tokio::test]
    async fn test_timeout_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let result = client_for(&server, "")
            .login(&Email::parse("a@b.com").unwrap(), &SecretString::from("x"))
            .await;
        assert!(matches!(result, Err(BackendError::Timeout)));
    }
}
