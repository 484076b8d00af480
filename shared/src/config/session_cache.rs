//! Verified-session cache configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage key schema tag, part of every key the cache writes
pub const KEY_SCHEMA_TAG: &str = "v1";

/// Default PBKDF2 iteration count
pub const DEFAULT_KDF_ITERATIONS: u32 = 100_000;

/// Lowest iteration count the key deriver accepts
pub const MIN_KDF_ITERATIONS: u32 = 1_000;

/// Environment variable holding the session TTL in days
pub const TTL_DAYS_ENV: &str = "SESSION_CACHE_TTL_DAYS";

/// Configuration for the encrypted verified-session cache
#[derive(Clone, Deserialize, Serialize)]
pub struct SessionCacheConfig {
    /// Application namespace, first segment of every storage key
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Cache name, second segment of every storage key
    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    /// Application-wide secret mixed into key hashing and key derivation
    #[serde(default)]
    pub pepper: String,

    /// Session TTL in days, kept raw so it can be validated when read
    #[serde(default)]
    pub ttl_days: Option<String>,

    /// PBKDF2 iteration count
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,
}

impl Default for SessionCacheConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            cache_name: default_cache_name(),
            pepper: String::new(),
            ttl_days: None,
            kdf_iterations: default_kdf_iterations(),
        }
    }
}

impl fmt::Debug for SessionCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCacheConfig")
            .field("namespace", &self.namespace)
            .field("cache_name", &self.cache_name)
            .field("pepper", &"[REDACTED]")
            .field("ttl_days", &self.ttl_days)
            .field("kdf_iterations", &self.kdf_iterations)
            .finish()
    }
}

impl SessionCacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let namespace = std::env::var("SESSION_CACHE_NAMESPACE")
            .unwrap_or_else(|_| default_namespace());
        let cache_name = std::env::var("SESSION_CACHE_NAME")
            .unwrap_or_else(|_| default_cache_name());
        let pepper = std::env::var("SESSION_CACHE_PEPPER").unwrap_or_default();
        let ttl_days = std::env::var(TTL_DAYS_ENV).ok();
        let kdf_iterations = std::env::var("SESSION_CACHE_KDF_ITERATIONS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or_else(default_kdf_iterations);

        Self {
            namespace,
            cache_name,
            pepper,
            ttl_days,
            kdf_iterations,
        }
    }

    /// Create a configuration with the given pepper and defaults elsewhere
    pub fn new(pepper: impl Into<String>) -> Self {
        Self {
            pepper: pepper.into(),
            ..Default::default()
        }
    }

    /// Set the namespace and cache name
    pub fn with_names(mut self, namespace: impl Into<String>, cache_name: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self.cache_name = cache_name.into();
        self
    }

    /// Set the raw TTL value
    pub fn with_ttl_days(mut self, ttl_days: impl Into<String>) -> Self {
        self.ttl_days = Some(ttl_days.into());
        self
    }

    /// Set the PBKDF2 iteration count
    pub fn with_kdf_iterations(mut self, iterations: u32) -> Self {
        self.kdf_iterations = iterations;
        self
    }

    /// Iteration count raised to the accepted floor
    pub fn effective_kdf_iterations(&self) -> u32 {
        self.kdf_iterations.max(MIN_KDF_ITERATIONS)
    }

    /// Prefix shared by every key this cache writes: `{namespace}:{cache_name}:v1:`
    pub fn key_prefix(&self) -> String {
        format!("{}:{}:{}:", self.namespace, self.cache_name, KEY_SCHEMA_TAG)
    }

    /// Whether a pepper has been supplied
    pub fn has_pepper(&self) -> bool {
        !self.pepper.is_empty()
    }
}

fn default_namespace() -> String {
    String::from("app")
}

fn default_cache_name() -> String {
    String::from("verified-session")
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_KDF_ITERATIONS
}
