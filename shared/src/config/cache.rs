//! Redis configuration for the Redis-backed session store

use serde::{Deserialize, Serialize};

/// Redis connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Maximum retry attempts for a single operation
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between retries in milliseconds (doubles per attempt)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Redis-side TTL attached to every envelope in seconds, 0 disables it
    #[serde(default = "default_ttl")]
    pub default_ttl: u64,

    /// Page size hint for SCAN when enumerating keys
    #[serde(default = "default_scan_count")]
    pub scan_count: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            default_ttl: default_ttl(),
            scan_count: default_scan_count(),
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let max_retries = std::env::var("REDIS_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_max_retries);
        let default_ttl = std::env::var("REDIS_SESSION_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_ttl);

        Self {
            url,
            max_retries,
            default_ttl,
            ..Default::default()
        }
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Disable or change the Redis-side TTL
    pub fn with_default_ttl(mut self, seconds: u64) -> Self {
        self.default_ttl = seconds;
        self
    }

    /// Redis-side TTL, `None` when disabled
    pub fn expiry_seconds(&self) -> Option<u64> {
        (self.default_ttl > 0).then_some(self.default_ttl)
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}

fn default_ttl() -> u64 {
    15 * 24 * 3600 // one day past the longest session TTL
}

fn default_scan_count() -> usize {
    100
}
