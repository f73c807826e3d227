//! Subcommand implementations.

pub mod api;
pub mod secret;
pub mod session;
