//! Session cookie tooling.
//!
//! # Environment Variables
//!
//! - `GARCOM_SESSION_SECRET` - the secret the edge server derives its cookie key from

use secrecy::SecretString;
use thiserror::Error;

use seu_garcom_core::{
    BearerToken, IdError, RestaurantId, Role, RoleError, Session, UnitId, UserId,
};
use seu_garcom_web::session::{SessionCipher, SessionCookieError};

/// Errors from sealing or opening session cookies.
#[derive(Debug, Error)]
pub enum SessionCommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid id: {0}")]
    InvalidId(#[from] IdError),

    #[error(transparent)]
    InvalidRole(#[from] RoleError),

    #[error("Session cookie error: {0}")]
    Cookie(#[from] SessionCookieError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Arguments for `session seal`.
#[derive(Debug)]
pub struct SealArgs {
    pub user_id: String,
    pub role: String,
    pub token: String,
    pub restaurant_id: Option<String>,
    pub unit_id: Option<String>,
}

impl SealArgs {
    /// Validate into a session.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid id or unknown role.
    pub fn to_session(&self) -> Result<Session, SessionCommandError> {
        Ok(Session {
            user_id: UserId::parse(&self.user_id)?,
            role: self.role.parse::<Role>()?,
            bearer_token: BearerToken::new(self.token.clone()),
            restaurant_id: self
                .restaurant_id
                .as_deref()
                .map(RestaurantId::parse)
                .transpose()?,
            unit_id: self.unit_id.as_deref().map(UnitId::parse).transpose()?,
        })
    }
}

fn cipher_from_env() -> Result<SessionCipher, SessionCommandError> {
    dotenvy::dotenv().ok();
    let secret = std::env::var("GARCOM_SESSION_SECRET")
        .map_err(|_| SessionCommandError::MissingEnvVar("GARCOM_SESSION_SECRET"))?;
    Ok(SessionCipher::new(&SecretString::from(secret)))
}

/// Seal a session and print the cookie value.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or the secret is missing.
#[allow(clippy::print_stdout)]
pub fn seal(args: &SealArgs) -> Result<(), SessionCommandError> {
    let session = args.to_session()?;
    let sealed = cipher_from_env()?.seal(&session)?;

    tracing::info!(
        user_id = %session.user_id,
        role = %session.role,
        expires_at = sealed.expires_at,
        "Sealed session"
    );
    println!("{}", sealed.value);
    Ok(())
}

/// Open a cookie value and print the session JSON.
///
/// # Errors
///
/// Returns an error if the secret is missing or the value does not open.
#[allow(clippy::print_stdout)]
pub fn open(value: &str) -> Result<(), SessionCommandError> {
    let session = cipher_from_env()?.open(value)?;
    println!("{}", serde_json::to_string_pretty(&session)?);
    Ok(())
}
