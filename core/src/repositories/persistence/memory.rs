//! In-memory implementation of PersistencePort

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::errors::DomainError;
use super::PersistencePort;

/// Process-local key/value store
///
/// Cloning shares the underlying map, so a test can keep a handle and inspect
/// what the cache wrote.
#[derive(Clone, Default)]
pub struct InMemoryPersistence {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> Result<usize, DomainError> {
        let entries = self.entries.read().map_err(|_| Self::lock_error("len"))?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len()? == 0)
    }

    /// Snapshot of all stored keys, sorted
    pub fn keys(&self) -> Result<Vec<String>, DomainError> {
        let entries = self.entries.read().map_err(|_| Self::lock_error("keys"))?;
        Ok(entries.keys().cloned().collect())
    }

    /// Poison the lock by panicking while holding it
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let entries = Arc::clone(&self.entries);
        let _ = std::thread::spawn(move || {
            let _guard = entries.write().unwrap();
            panic!("writer panicked");
        })
        .join();
    }

    fn lock_error(op: &str) -> DomainError {
        DomainError::Persistence {
            message: format!("In-memory store lock poisoned during {}", op),
        }
    }
}

#[async_trait]
impl PersistencePort for InMemoryPersistence {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let entries = self.entries.read().map_err(|_| Self::lock_error("get"))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|_| Self::lock_error("set"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|_| Self::lock_error("remove"))?;
        entries.remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| Self::lock_error("keys_with_prefix"))?;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }
}
