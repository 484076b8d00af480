//! Builds the cache once, falling back to a no-op cache when a required
//! capability is missing.

use rand::{rngs::OsRng, RngCore};
use std::sync::Arc;
use tracing::{info, warn};

use vsc_shared::config::SessionCacheConfig;

use crate::errors::SessionCacheError;
use crate::repositories::PersistencePort;

use super::clock::{Clock, SystemClock};
use super::facade::{EncryptedSessionCache, NoopSessionCache, VerifiedSessionCache};
use super::config::TtlSource;

/// Session cache construction
pub struct SessionCacheFactory;

impl SessionCacheFactory {
    /// Build the cache for `port`
    ///
    /// Capabilities are probed here and never again. If any is missing the
    /// returned cache is a [`NoopSessionCache`], so every lookup misses and
    /// callers fall back to a fresh challenge.
    pub async fn build<P>(
        port: Arc<P>,
        config: &SessionCacheConfig,
        ttl: Arc<dyn TtlSource>,
        clock: Arc<dyn Clock>,
    ) -> Arc<dyn VerifiedSessionCache>
    where
        P: PersistencePort + 'static,
    {
        match Self::check_capabilities(port.as_ref(), config).await {
            Ok(()) => {
                info!(
                    namespace = %config.namespace,
                    cache_name = %config.cache_name,
                    kdf_iterations = config.effective_kdf_iterations(),
                    "Verified session cache enabled"
                );
                Arc::new(EncryptedSessionCache::new(port, config, ttl, clock))
            }
            Err(e) => {
                warn!(
                    event = "capability_unavailable",
                    code = e.code(),
                    error = %e,
                    "Verified session cache disabled"
                );
                Arc::new(NoopSessionCache::new(e.to_string()))
            }
        }
    }

    /// Build with the TTL taken from `config` and the system clock
    pub async fn build_default<P>(port: Arc<P>, config: &SessionCacheConfig) -> Arc<dyn VerifiedSessionCache>
    where
        P: PersistencePort + 'static,
    {
        Self::build(port, config, Arc::new(config.clone()), Arc::new(SystemClock)).await
    }

    /// Verify the pepper, the OS random source and the persistence port
    pub async fn check_capabilities<P>(port: &P, config: &SessionCacheConfig) -> Result<(), SessionCacheError>
    where
        P: PersistencePort + ?Sized,
    {
        if !config.has_pepper() {
            return Err(unavailable("pepper"));
        }

        let mut probe = [0u8; 16];
        if OsRng.try_fill_bytes(&mut probe).is_err() {
            return Err(unavailable("secure randomness"));
        }

        if !port.is_available().await {
            return Err(unavailable("persistence"));
        }

        Ok(())
    }
}

fn unavailable(capability: &str) -> SessionCacheError {
    SessionCacheError::CapabilityUnavailable {
        capability: capability.to_string(),
    }
}
