//! Verified session entity: proof that an identifier passed a one-time-code
//! challenge, valid until `expires_at`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Schema version written into every session and envelope
pub const SCHEMA_VERSION: u32 = 1;

/// A successful verification of one identifier
///
/// Exists in plaintext only in memory. At rest it is always wrapped in a
/// [`StorageEnvelope`](super::StorageEnvelope) encrypted under a key derived
/// from the same identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedSession {
    /// The identifier (phone number) that was verified
    pub identifier: String,

    /// When the verification happened
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub verified_at: DateTime<Utc>,

    /// When the session stops being trusted
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,

    /// Payload schema tag
    pub schema_version: u32,
}

impl VerifiedSession {
    /// Creates a session verified at `verified_at` and valid for `ttl`.
    ///
    /// Timestamps are truncated to milliseconds, the precision they are
    /// persisted with, so a stored session compares equal to the one that
    /// was recorded.
    pub fn new(identifier: impl Into<String>, verified_at: DateTime<Utc>, ttl: Duration) -> Self {
        let verified_at = truncate_to_millis(verified_at);
        Self {
            identifier: identifier.into(),
            verified_at,
            expires_at: verified_at + ttl,
            schema_version: SCHEMA_VERSION,
        }
    }

    /// Whether the session is no longer valid at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Length of the validity window
    pub fn ttl(&self) -> Duration {
        self.expires_at - self.verified_at
    }

    /// Time left before expiry, zero once expired
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }

    /// `expires_at` strictly after `verified_at`
    pub fn has_valid_window(&self) -> bool {
        self.expires_at > self.verified_at
    }
}

/// Drop sub-millisecond precision from a timestamp
pub fn truncate_to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(instant.timestamp_millis()).unwrap_or(instant)
}
