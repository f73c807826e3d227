//! Core types for Seu Garçom.
//!
//! This module provides type-safe wrappers for the identity and routing
//! concepts shared between the edge server and the fetch client.

pub mod base_url;
pub mod email;
pub mod id;
pub mod locale;
pub mod role;
pub mod session;

pub use base_url::BaseUrl;
pub use email::{Email, EmailError};
pub use id::*;
pub use locale::{Locale, LocaleError};
pub use role::{Role, RoleError};
pub use session::{BearerToken, Session};
