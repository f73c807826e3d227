//! Seu Garçom Core - Shared types library.
//!
//! This crate provides the types shared by every Seu Garçom component:
//! - `web` - Edge server (locale routing, session gating, auth endpoints)
//! - `client` - Authenticated fetch client used by the UI runtime
//! - `cli` - Operator tooling for sessions and secrets
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no cryptography, no HTTP
//! clients. Both the edge server and the client depend on it, so a session
//! serialized by one is always readable by the other.
//!
//! # Modules
//!
//! - [`types`] - Ids, roles, locales, emails, API base URLs, and the session payload

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
