//! Session TTL policy
//!
//! The TTL is read every time a verification is recorded, so a host can
//! change it without rebuilding the cache.

use vsc_shared::config::{SessionCacheConfig, TTL_DAYS_ENV};

/// Shortest accepted session TTL in days
pub const MIN_TTL_DAYS: i64 = 7;

/// Longest accepted session TTL in days
pub const MAX_TTL_DAYS: i64 = 14;

/// TTL used when the configured value is missing or not a number
pub const DEFAULT_TTL_DAYS: i64 = 7;

/// Source of the configured session TTL
pub trait TtlSource: Send + Sync {
    /// Raw configured value, unvalidated
    fn raw_ttl_days(&self) -> Option<String>;

    /// Effective TTL in whole days, within `[MIN_TTL_DAYS, MAX_TTL_DAYS]`
    fn ttl_days(&self) -> i64 {
        effective_ttl_days(self.raw_ttl_days().as_deref())
    }
}

impl TtlSource for SessionCacheConfig {
    fn raw_ttl_days(&self) -> Option<String> {
        self.ttl_days.clone()
    }
}

/// Reads the TTL from an environment variable on every call
#[derive(Debug, Clone)]
pub struct EnvTtlSource {
    var: String,
}

impl EnvTtlSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvTtlSource {
    fn default() -> Self {
        Self::new(TTL_DAYS_ENV)
    }
}

impl TtlSource for EnvTtlSource {
    fn raw_ttl_days(&self) -> Option<String> {
        std::env::var(&self.var).ok()
    }
}

/// Clamp a raw TTL into `[MIN_TTL_DAYS, MAX_TTL_DAYS]`
///
/// Fractions are truncated toward zero. Missing, non-numeric, NaN and
/// infinite values yield `DEFAULT_TTL_DAYS`.
pub fn effective_ttl_days(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|days| days.is_finite())
        .map(|days| days.trunc().clamp(MIN_TTL_DAYS as f64, MAX_TTL_DAYS as f64) as i64)
        .unwrap_or(DEFAULT_TTL_DAYS)
}
