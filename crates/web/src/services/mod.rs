//! Services that talk to the outside world.
//!
//! - [`backend`] - Authorization calls to the backend REST API

pub mod backend;

pub use backend::{BackendClient, BackendError, GuestAuthorization};
