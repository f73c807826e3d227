//! Session roles.

use serde::{Deserialize, Serialize};

/// Error returned when a role string is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct RoleError(pub String);

/// Role attached to a session.
///
/// Roles are assigned by the backend's authorization response and travel
/// unchanged inside the session cookie. Nothing on the edge or in the client
/// ever upgrades a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Restaurant owner with access to every unit.
    Admin,
    /// Manages a single unit.
    Manager,
    /// Floor staff taking orders.
    Attendant,
    /// Registered customer.
    Client,
    /// Anonymous table session opened from a QR code.
    Guest,
}

impl Role {
    /// Whether this role represents a signed-in identity.
    ///
    /// Guests are tracked but never count as authenticated.
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        !matches!(self, Self::Guest)
    }

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::Attendant => "ATTENDANT",
            Self::Client => "CLIENT",
            Self::Guest => "GUEST",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "MANAGER" => Ok(Self::Manager),
            "ATTENDANT" => Ok(Self::Attendant),
            "CLIENT" => Ok(Self::Client),
            "GUEST" => Ok(Self::Guest),
            _ => Err(RoleError(s.to_owned())),
        }
    }
}
