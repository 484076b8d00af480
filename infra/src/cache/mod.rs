//! Cache module for the Redis-backed session store
//!
//! `RedisClient` handles connections and retries; `RedisPersistence` adapts it
//! to the core persistence port.

pub mod redis_client;
pub mod redis_store;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;
pub use redis_store::RedisPersistence;

// Re-export commonly used types
pub use vsc_shared::config::CacheConfig;
