//! Configuration module
//!
//! - `session_cache` - namespace, pepper, TTL and key-derivation settings
//! - `cache` - Redis connection settings for the Redis-backed store
//! - `environment` - environment detection and logging configuration

pub mod cache;
pub mod environment;
pub mod session_cache;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use cache::CacheConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use session_cache::{
    SessionCacheConfig, DEFAULT_KDF_ITERATIONS, KEY_SCHEMA_TAG, MIN_KDF_ITERATIONS, TTL_DAYS_ENV,
};

/// Backend selected for the persistence port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStoreKind {
    /// Process-local map, lost on restart
    #[default]
    Memory,
    /// Redis server
    Redis,
}

impl std::str::FromStr for SessionStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(SessionStoreKind::Memory),
            "redis" => Ok(SessionStoreKind::Redis),
            _ => Err(format!("Invalid session store: {}", s)),
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Session cache configuration
    pub session_cache: SessionCacheConfig,

    /// Persistence backend
    #[serde(default)]
    pub store: SessionStoreKind,

    /// Redis configuration, used when `store` is `redis`
    #[serde(default)]
    pub redis: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            session_cache: SessionCacheConfig::default(),
            store: SessionStoreKind::default(),
            redis: CacheConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let store = std::env::var("SESSION_STORE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        let mut logging = LoggingConfig::for_environment(environment);
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            logging.level = level;
        }

        Self {
            environment,
            session_cache: SessionCacheConfig::from_env(),
            store,
            redis: CacheConfig::from_env(),
            logging,
        }
    }
}
