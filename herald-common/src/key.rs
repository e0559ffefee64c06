//! Idempotency key derivation
//!
//! A [`MessageKey`] identifies one logical delivery request. Identical
//! (recipient, body) pairs always derive the same key, across process
//! restarts, so a resend of the same content is detected and suppressed
//! by the status store's uniqueness guarantee.

use std::fmt;

use hex::encode;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of hex characters kept from the body digest (128 bits).
const DIGEST_PREFIX_LEN: usize = 32;

/// Deterministic idempotency key for a delivery request.
///
/// Derived as `{recipient}-{prefix}` where `prefix` is the first 128
/// bits of a SHA-256 digest of the full body, hex-encoded. The digest
/// covers the complete body, so two distinct messages to the same
/// recipient only collide with negligible probability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageKey(String);

impl MessageKey {
    /// Derive the key for a (recipient, body) pair.
    ///
    /// Pure function: no I/O, no clock, no randomness.
    #[must_use]
    pub fn derive(recipient: &str, body: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(body.as_bytes());
        let digest = encode(hasher.finalize());

        Self(format!("{recipient}-{}", &digest[..DIGEST_PREFIX_LEN]))
    }

    /// View the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MessageKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}
