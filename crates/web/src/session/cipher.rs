//! Authenticated encryption for the session cookie.
//!
//! Uses AES-256-GCM with a key derived from `GARCOM_SESSION_SECRET` (SHA-256).
//! The cookie value is `base64url(nonce || ciphertext)`; the plaintext is the
//! session JSON plus an `exp` unix timestamp. GCM's tag makes the cookie
//! tamper-evident, so no separate signature is needed.

use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use seu_garcom_core::Session;

use super::COOKIE_MAX_AGE_SECONDS;

/// Size of the AES-GCM nonce in bytes.
const NONCE_SIZE: usize = 12;

/// Errors from sealing or opening a session cookie.
#[derive(Debug, Error)]
pub enum SessionCookieError {
    /// Cookie value is not valid base64url.
    #[error("session cookie is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// Cookie value is too short to hold a nonce and tag.
    #[error("session cookie is truncated")]
    Truncated,

    /// Authentication tag did not verify (wrong key or tampered value).
    #[error("session cookie failed authentication")]
    Decrypt,

    /// Encryption failed.
    #[error("session cookie encryption failed")]
    Encrypt,

    /// Decrypted payload is not a session.
    #[error("session payload is invalid: {0}")]
    Payload(#[from] serde_json::Error),

    /// Payload is past its expiry.
    #[error("session expired at {0}")]
    Expired(i64),
}

/// A sealed session ready to be written as a cookie.
#[derive(Debug, Clone)]
pub struct SealedSession {
    /// Cookie value.
    pub value: String,
    /// Unix timestamp after which [`SessionCipher::open`] rejects the value.
    pub expires_at: i64,
}

#[derive(Serialize, Deserialize)]
struct Envelope<S> {
    #[serde(flatten)]
    session: S,
    exp: i64,
}

/// Seals and opens session cookies.
#[derive(Clone)]
pub struct SessionCipher {
    cipher: Aes256Gcm,
}

impl SessionCipher {
    /// Derive the cookie key from the configured secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let digest = Sha256::digest(secret.expose_secret().as_bytes());
        let key = Key::<Aes256Gcm>::from_slice(digest.as_slice());
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Seal a session with the standard 30-day lifetime.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or encryption fails.
    pub fn seal(&self, session: &Session) -> Result<SealedSession, SessionCookieError> {
        self.seal_at(session, chrono::Utc::now().timestamp())
    }

    /// Seal a session as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or encryption fails.
    pub fn seal_at(&self, session: &Session, now: i64) -> Result<SealedSession, SessionCookieError> {
        let expires_at = now + COOKIE_MAX_AGE_SECONDS;
        let plaintext = serde_json::to_vec(&Envelope {
            session,
            exp: expires_at,
        })?;

        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_slice())
            .map_err(|_| SessionCookieError::Encrypt)?;

        let mut raw = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        raw.extend_from_slice(nonce.as_slice());
        raw.extend_from_slice(&ciphertext);

        Ok(SealedSession {
            value: URL_SAFE_NO_PAD.encode(raw),
            expires_at,
        })
    }

    /// Open a session cookie value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is malformed, fails authentication, does
    /// not contain a session, or has expired.
    pub fn open(&self, value: &str) -> Result<Session, SessionCookieError> {
        self.open_at(value, chrono::Utc::now().timestamp())
    }

    /// Open a session cookie value as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// See [`SessionCipher::open`].
    pub fn open_at(&self, value: &str, now: i64) -> Result<Session, SessionCookieError> {
        let raw = URL_SAFE_NO_PAD.decode(value.trim())?;
        if raw.len() <= NONCE_SIZE {
            return Err(SessionCookieError::Truncated);
        }
        let (nonce, ciphertext) = raw.split_at(NONCE_SIZE);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| SessionCookieError::Decrypt)?;

        let envelope: Envelope<Session> = serde_json::from_slice(&plaintext)?;
        if envelope.exp <= now {
            return Err(SessionCookieError::Expired(envelope.exp));
        }
        Ok(envelope.session)
    }
}
