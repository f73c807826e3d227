//! Authenticated API calls.
//!
//! # Environment Variables
//!
//! - `GARCOM_API_BASE_URL` - backend origin

use std::sync::Arc;

use seu_garcom_client::{ApiClient, ClientConfig, ClientError, LocalStore};
use seu_garcom_core::BearerToken;

/// A fixed token given on the command line.
struct StaticToken(BearerToken);

impl LocalStore for StaticToken {
    fn token(&self) -> Option<BearerToken> {
        Some(self.0.clone())
    }
}

/// GET `path` and print the status and body.
///
/// # Errors
///
/// Returns an error if configuration is missing or the request fails.
#[allow(clippy::print_stdout)]
pub async fn get(path: &str, token: Option<String>) -> Result<(), ClientError> {
    let mut builder = ApiClient::builder(ClientConfig::from_env()?);
    if let Some(token) = token {
        builder = builder.local_store(Arc::new(StaticToken(BearerToken::new(token))));
    }
    let client = builder.build()?;

    let response = client.get(path).await?;
    let status = response.status();
    tracing::info!(%status, path, "Request finished");

    let body = response.text().await.map_err(ClientError::from)?;
    println!("{status}");
    println!("{body}");
    Ok(())
}
