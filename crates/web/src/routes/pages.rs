//! Page shell.
//!
//! Every page path that survives the session gate and locale resolver gets
//! the same document. Client code hydrates it from `data-path`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, http::Uri, response::IntoResponse};

use seu_garcom_core::Locale;

use crate::middleware::locale::split_locale_prefix;
use crate::state::AppState;

/// Shell document for client-side pages.
#[derive(Template, WebTemplate)]
#[template(path = "shell.html")]
pub struct ShellTemplate {
    pub locale: Locale,
    /// Path below the locale prefix.
    pub path: String,
}

impl ShellTemplate {
    /// Build the shell for a request path.
    ///
    /// Paths reaching here normally carry a locale prefix; the default
    /// locale covers the rest.
    #[must_use]
    pub fn for_path(path: &str, default: Locale) -> Self {
        let (locale, rest) = split_locale_prefix(path).unwrap_or((default, path));
        Self {
            locale,
            path: rest.to_owned(),
        }
    }
}

/// Fallback handler serving the page shell.
pub async fn shell(State(state): State<AppState>, uri: Uri) -> impl IntoResponse {
    ShellTemplate::for_path(uri.path(), state.config().default_locale)
}
