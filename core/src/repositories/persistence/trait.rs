//! Persistence port trait defining the key/value boundary of the session cache.

use async_trait::async_trait;

use crate::errors::DomainError;

/// Key/value store supplied by the host environment
///
/// Implementations must make single-key reads and writes atomic: a reader
/// never observes a partially written value. Nothing else is assumed; the
/// cache performs no multi-key transactions.
#[async_trait]
pub trait PersistencePort: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// # Returns
    /// * `Ok(None)` if nothing is stored under the key
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Remove the value under `key`; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<(), DomainError>;

    /// List every key starting with `prefix`
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, DomainError>;

    /// Whether the backing store is usable at all
    ///
    /// Probed once when the cache is built.
    async fn is_available(&self) -> bool {
        true
    }
}
