//! Failure taxonomy of the verified-session cache
//!
//! None of these ever leave the cache facade. They exist so the codec and the
//! port adapters can say precisely what went wrong, and so logs can carry a
//! stable code. Malformed and undecryptable records deliberately share the
//! log event the facade emits for them.

use thiserror::Error;

/// Session cache errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionCacheError {
    #[error("Required capability unavailable: {capability}")]
    CapabilityUnavailable { capability: String },

    #[error("Stored record is malformed")]
    MalformedRecord,

    #[error("Stored record could not be decrypted")]
    DecryptionFailure,

    #[error("Stored record has expired")]
    ExpiredRecord,

    #[error("Failed to persist record: {message}")]
    PersistenceWriteFailure { message: String },
}

impl SessionCacheError {
    /// Stable code for programmatic handling and log fields
    pub fn code(&self) -> &'static str {
        match self {
            SessionCacheError::CapabilityUnavailable { .. } => "CAPABILITY_UNAVAILABLE",
            SessionCacheError::MalformedRecord => "MALFORMED_RECORD",
            SessionCacheError::DecryptionFailure => "DECRYPTION_FAILURE",
            SessionCacheError::ExpiredRecord => "EXPIRED_RECORD",
            SessionCacheError::PersistenceWriteFailure { .. } => "PERSISTENCE_WRITE_FAILURE",
        }
    }

    /// Whether the stored entry that produced this error must be deleted
    pub fn evicts_entry(&self) -> bool {
        matches!(
            self,
            SessionCacheError::MalformedRecord
                | SessionCacheError::DecryptionFailure
                | SessionCacheError::ExpiredRecord
        )
    }
}
