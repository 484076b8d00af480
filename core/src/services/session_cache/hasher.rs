//! Identifier hashing for storage keys

use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::Zeroizing;

use vsc_shared::config::SessionCacheConfig;

/// Domain separation tag so storage keys never collide with other uses of the pepper
const HASH_DOMAIN: &[u8] = b"verified-session/storage-key";

/// Turns an identifier into an opaque, deterministic storage key
///
/// The key is `{prefix}{hex(sha256(domain || len(pepper) || pepper || identifier))}`.
/// Without the pepper the identifier cannot be confirmed from the key, even
/// by enumerating the phone-number space.
pub struct IdentifierHasher {
    pepper: Zeroizing<Vec<u8>>,
    key_prefix: String,
}

impl IdentifierHasher {
    /// Create a hasher with an explicit pepper and key prefix
    pub fn new(pepper: &[u8], key_prefix: impl Into<String>) -> Self {
        Self {
            pepper: Zeroizing::new(pepper.to_vec()),
            key_prefix: key_prefix.into(),
        }
    }

    /// Create a hasher from the cache configuration
    pub fn from_config(config: &SessionCacheConfig) -> Self {
        Self::new(config.pepper.as_bytes(), config.key_prefix())
    }

    /// Hex digest of the peppered identifier
    pub fn hash(&self, identifier: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(HASH_DOMAIN);
        hasher.update((self.pepper.len() as u64).to_be_bytes());
        hasher.update(self.pepper.as_slice());
        hasher.update(identifier.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Full storage key for an identifier
    pub fn storage_key_for(&self, identifier: &str) -> String {
        format!("{}{}", self.key_prefix, self.hash(identifier))
    }

    /// Prefix shared by every key this hasher produces
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }
}

impl fmt::Debug for IdentifierHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentifierHasher")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}
