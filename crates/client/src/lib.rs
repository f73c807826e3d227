//! Authenticated fetch client for the Seu Garçom REST backend.
//!
//! [`ApiClient`] attaches `Authorization: Bearer <token>` to every call when a
//! token can be resolved, caches the token for 60 seconds, and on a 401
//! refreshes it and retries exactly once. A second 401 signs the user out and
//! surfaces as [`ClientError::SessionExpired`].
//!
//! ```rust,ignore
//! let store = Arc::new(MemoryStore::new());
//! let client = ApiClient::builder(ClientConfig::new(api_url))
//!     .local_store(store.clone())
//!     .on_sign_out(store)
//!     .build()?;
//!
//! let response = client.get("restaurants/r-1/units").await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod source;

pub use cache::{TOKEN_TTL, TokenCache};
pub use client::{ApiClient, ApiClientBuilder, MAX_ATTEMPTS, RequestOptions};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ClientConfig;
pub use error::ClientError;
pub use source::{HttpSessionProvider, LocalStore, MemoryStore, SessionProvider, SignOut};
