//! Short-lived bearer token cache.
//!
//! Holds the last resolved token, or the fact that there was none, for
//! [`TOKEN_TTL`]. A lookup past the TTL or after [`TokenCache::invalidate`]
//! is a miss. The lock is only taken for the read or the overwrite.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use seu_garcom_core::BearerToken;

use crate::clock::Clock;

/// How long a resolved token is trusted.
pub const TOKEN_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct Entry {
    stored_at: Instant,
    token: Option<BearerToken>,
}

/// Process-local token cache owned by one client.
pub struct TokenCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entry: Mutex<Option<Entry>>,
}

impl TokenCache {
    #[must_use]
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entry: Mutex::new(None),
        }
    }

    /// Look up the cached resolution.
    ///
    /// `None` is a miss. `Some(None)` is a fresh record that no token exists.
    #[must_use]
    pub fn get(&self) -> Option<Option<BearerToken>> {
        let now = self.clock.now();
        let entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        entry
            .as_ref()
            .filter(|entry| now.saturating_duration_since(entry.stored_at) < self.ttl)
            .map(|entry| entry.token.clone())
    }

    /// Record a resolution, replacing whatever was there.
    pub fn put(&self, token: Option<BearerToken>) {
        let stored_at = self.clock.now();
        *self.entry.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(Entry { stored_at, token });
    }

    /// Forget the cached resolution so the next lookup misses.
    pub fn invalidate(&self) {
        *self.entry.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
