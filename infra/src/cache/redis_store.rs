//! Redis-backed persistence port for the verified-session cache

use async_trait::async_trait;
use tracing::{debug, warn};

use vsc_core::errors::DomainError;
use vsc_core::repositories::PersistencePort;

use super::redis_client::RedisClient;
use super::CacheConfig;

/// Stores session envelopes as plain Redis strings
///
/// When `expiry_seconds` is set every write also gets a Redis TTL so entries
/// that are never looked up again are reclaimed by Redis. Session validity is
/// still decided by the encrypted expiry, not by this TTL.
#[derive(Clone)]
pub struct RedisPersistence {
    client: RedisClient,
    expiry_seconds: Option<u64>,
}

impl RedisPersistence {
    pub fn new(client: RedisClient, expiry_seconds: Option<u64>) -> Self {
        Self {
            client,
            expiry_seconds,
        }
    }

    /// Connect using `config`
    pub async fn connect(config: &CacheConfig) -> Result<Self, crate::InfrastructureError> {
        let client = RedisClient::new(config).await?;
        Ok(Self::new(client, config.expiry_seconds()))
    }
}

#[async_trait]
impl PersistencePort for RedisPersistence {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.client.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        match self.expiry_seconds {
            Some(seconds) => self.client.set_with_expiry(key, value, seconds).await?,
            None => self.client.set(key, value).await?,
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        let existed = self.client.delete(key).await?;
        debug!(existed = existed, "Removed session entry");
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, DomainError> {
        let pattern = format!("{}*", escape_glob(prefix));
        let keys = self.client.scan_keys(&pattern).await?;
        // MATCH is a glob; only literal prefix matches count
        Ok(keys.into_iter().filter(|k| k.starts_with(prefix)).collect())
    }

    async fn is_available(&self) -> bool {
        match self.client.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!(error = %e, "Redis unavailable");
                false
            }
        }
    }
}

/// Escape Redis glob metacharacters so `prefix` matches literally
pub(crate) fn escape_glob(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\' | '^') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
