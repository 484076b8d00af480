//! Shared configuration and utilities for the verified-session cache
//!
//! This crate provides functionality used across the workspace:
//! - Configuration types (session cache, Redis, environment, logging)
//! - Identifier utilities (normalization, validation, masking for logs)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, Environment, LogFormat, LoggingConfig, SessionCacheConfig,
    SessionStoreKind,
};
pub use utils::identifier;
