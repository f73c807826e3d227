//! Explicit locale change.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use seu_garcom_core::Locale;

use crate::error::{AppError, Result};
use crate::middleware::locale::locale_cookie;
use crate::state::AppState;

/// Locale change body.
#[derive(Debug, Deserialize)]
pub struct LocaleRequest {
    pub locale: String,
}

/// `POST /api/locale`
///
/// Overwrites the `NEXT_LOCALE` cookie. Unsupported codes are a 400.
pub async fn set_locale(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LocaleRequest>,
) -> Result<impl IntoResponse> {
    let locale: Locale = body
        .locale
        .parse()
        .map_err(|e: seu_garcom_core::LocaleError| AppError::BadRequest(e.to_string()))?;

    let jar = jar.add(locale_cookie(locale, state.config().secure_cookies()));
    Ok((jar, StatusCode::NO_CONTENT))
}
