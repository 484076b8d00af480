//! Storage envelope: the only form of a session that is ever persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::SessionCacheError;

/// Encrypted session as written to the persistence port
///
/// Serialized as `{schemaVersion, ciphertext, iv, salt, expiresAt}` with the
/// binary fields in standard base64 and `expiresAt` as epoch milliseconds.
/// `expires_at` mirrors the encrypted payload so expired entries can be
/// dropped without running the key derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEnvelope {
    /// Envelope schema tag
    pub schema_version: u32,

    /// AES-256-GCM ciphertext with the authentication tag appended (base64)
    pub ciphertext: String,

    /// Per-encryption nonce (base64)
    pub iv: String,

    /// Per-encryption key-derivation salt (base64)
    pub salt: String,

    /// Plaintext mirror of the payload's expiry
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl StorageEnvelope {
    /// Parse a stored value
    pub fn from_json(raw: &str) -> Result<Self, SessionCacheError> {
        serde_json::from_str(raw).map_err(|_| SessionCacheError::MalformedRecord)
    }

    /// Render for storage
    pub fn to_json(&self) -> Result<String, SessionCacheError> {
        serde_json::to_string(self).map_err(|e| SessionCacheError::PersistenceWriteFailure {
            message: format!("Failed to serialize envelope: {}", e),
        })
    }

    /// Fast-path expiry check on the plaintext mirror
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
