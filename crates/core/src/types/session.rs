//! Session payload shared by the edge server and the fetch client.

use serde::{Deserialize, Serialize};

use crate::{RestaurantId, Role, UnitId, UserId};

/// Bearer token issued by the backend.
///
/// Implements `Debug` manually so tokens never reach logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the raw token for an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the token is empty (the backend never issues one).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

/// An authorized session.
///
/// Created from the backend's credential or guest authorization response.
/// The edge stores it encrypted in the session cookie; the client mirrors it
/// in its local store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Backend user id (for guests, the guest session id).
    pub user_id: UserId,
    /// Role granted by the backend.
    pub role: Role,
    /// Token for backend API calls.
    pub bearer_token: BearerToken,
    /// Restaurant the session is scoped to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<RestaurantId>,
    /// Unit the session is scoped to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<UnitId>,
}

impl Session {
    /// Whether this session carries a usable identity.
    ///
    /// A session with an empty bearer token cannot call the backend and is
    /// treated as absent.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        !self.bearer_token.is_empty()
    }

    /// Whether this session is a signed-in (non-guest) identity.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.has_identity() && self.role.is_authenticated()
    }
}
