//! Cache facade: the only surface callers use
//!
//! Every failure below this layer (storage errors, malformed or tampered
//! envelopes, expiry) is absorbed here and surfaces only as "not verified".

use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, info, warn};

use vsc_shared::config::SessionCacheConfig;
use vsc_shared::utils::identifier::mask_identifier;

use crate::domain::entities::{StorageEnvelope, VerifiedSession};
use crate::errors::{DomainResult, SessionCacheError};
use crate::repositories::PersistencePort;

use super::clock::{Clock, SystemClock};
use super::codec::SessionCodec;
use super::config::TtlSource;
use super::hasher::IdentifierHasher;
use super::key_deriver::KeyDeriver;

/// Verified-session cache operations
///
/// No method returns an error: a broken, tampered or unreachable cache reads
/// as "not verified" and the caller simply challenges again.
#[async_trait]
pub trait VerifiedSessionCache: Send + Sync {
    /// Record a successful verification, replacing any earlier entry
    ///
    /// Returns `false` when the session could not be stored. The
    /// verification itself still stands; only the shortcut is lost.
    async fn record_verified(&self, identifier: &str) -> bool;

    /// Return the cached session if one exists and is still valid
    async fn lookup_verified(&self, identifier: &str) -> Option<VerifiedSession>;

    /// Whether `identifier` has a valid cached session
    async fn is_verified(&self, identifier: &str) -> bool {
        self.lookup_verified(identifier).await.is_some()
    }

    /// Forget the session for one identifier
    async fn clear_one(&self, identifier: &str);

    /// Forget every session under this cache's key prefix
    async fn clear_all(&self);
}

/// Encrypted cache over a persistence port
///
/// Every record and lookup derives a key with PBKDF2 on the calling task.
/// At the default 100,000 iterations that blocks the executor thread for a
/// noticeable time, so latency-sensitive hosts should drive the cache from a
/// task they can afford to stall.
pub struct EncryptedSessionCache<P: PersistencePort> {
    /// Key/value store
    port: Arc<P>,
    /// Storage key derivation
    hasher: IdentifierHasher,
    /// Envelope encryption
    codec: SessionCodec,
    /// Configured TTL, consulted on every write
    ttl: Arc<dyn TtlSource>,
    /// Time source
    clock: Arc<dyn Clock>,
}

impl<P: PersistencePort> EncryptedSessionCache<P> {
    /// Create a cache from its configuration
    ///
    /// # Arguments
    ///
    /// * `port` - Persistence port the envelopes are written to
    /// * `config` - Namespace, pepper and key-derivation settings
    /// * `ttl` - Source of the session TTL, read on every `record_verified`
    /// * `clock` - Time source for timestamps and expiry checks
    pub fn new(
        port: Arc<P>,
        config: &SessionCacheConfig,
        ttl: Arc<dyn TtlSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            port,
            hasher: IdentifierHasher::from_config(config),
            codec: SessionCodec::new(KeyDeriver::from_config(config)),
            ttl,
            clock,
        }
    }

    /// Create a cache that takes its TTL from `config` and uses the system clock
    pub fn with_defaults(port: Arc<P>, config: &SessionCacheConfig) -> Self {
        Self::new(port, config, Arc::new(config.clone()), Arc::new(SystemClock))
    }

    /// Storage key for an identifier
    pub fn storage_key_for(&self, identifier: &str) -> String {
        self.hasher.storage_key_for(identifier)
    }

    async fn write_session(&self, key: &str, session: &VerifiedSession) -> DomainResult<()> {
        let envelope = self.codec.encrypt(&session.identifier, session)?;
        let raw = envelope.to_json()?;
        self.port.set(key, &raw).await
    }

    /// Parse, check and decrypt a stored value
    ///
    /// All record-level failures funnel through here so the caller has
    /// exactly one error path to handle.
    fn open_envelope(&self, identifier: &str, raw: &str) -> Result<VerifiedSession, SessionCacheError> {
        let now = self.clock.now();

        let envelope = StorageEnvelope::from_json(raw)?;
        if envelope.is_expired_at(now) {
            return Err(SessionCacheError::ExpiredRecord);
        }

        let session = self.codec.decrypt(identifier, &envelope)?;
        // the mirror is unauthenticated; trust only the decrypted expiry
        if session.is_expired_at(now) {
            return Err(SessionCacheError::ExpiredRecord);
        }

        Ok(session)
    }

    async fn evict(&self, key: &str, identifier: &str, error: &SessionCacheError) {
        match error {
            SessionCacheError::ExpiredRecord => debug!(
                identifier = %mask_identifier(identifier),
                event = "session_expired",
                "Cached verification expired"
            ),
            // malformed and undecryptable records share one event
            _ => warn!(
                identifier = %mask_identifier(identifier),
                event = "session_rejected",
                "Discarding unusable cached verification"
            ),
        }

        if !error.evicts_entry() {
            return;
        }
        if let Err(e) = self.port.remove(key).await {
            warn!(
                identifier = %mask_identifier(identifier),
                event = "session_evict_failed",
                error = %e,
                "Failed to remove unusable cached verification"
            );
        }
    }
}

#[async_trait]
impl<P: PersistencePort> VerifiedSessionCache for EncryptedSessionCache<P> {
    async fn record_verified(&self, identifier: &str) -> bool {
        let ttl_days = self.ttl.ttl_days();
        let session = VerifiedSession::new(identifier, self.clock.now(), Duration::days(ttl_days));
        let key = self.hasher.storage_key_for(identifier);

        match self.write_session(&key, &session).await {
            Ok(()) => {
                info!(
                    identifier = %mask_identifier(identifier),
                    ttl_days = ttl_days,
                    expires_at = %session.expires_at,
                    event = "session_recorded",
                    "Recorded verified session"
                );
                true
            }
            Err(e) => {
                warn!(
                    identifier = %mask_identifier(identifier),
                    event = "session_write_failed",
                    error = %e,
                    "Verified session not cached"
                );
                false
            }
        }
    }

    async fn lookup_verified(&self, identifier: &str) -> Option<VerifiedSession> {
        let key = self.hasher.storage_key_for(identifier);

        let raw = match self.port.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(identifier = %mask_identifier(identifier), "No cached verification");
                return None;
            }
            Err(e) => {
                warn!(
                    identifier = %mask_identifier(identifier),
                    event = "session_read_failed",
                    error = %e,
                    "Failed to read cached verification"
                );
                return None;
            }
        };

        match self.open_envelope(identifier, &raw) {
            Ok(session) => {
                debug!(
                    identifier = %mask_identifier(identifier),
                    expires_at = %session.expires_at,
                    "Cached verification is valid"
                );
                Some(session)
            }
            Err(error) => {
                self.evict(&key, identifier, &error).await;
                None
            }
        }
    }

    async fn clear_one(&self, identifier: &str) {
        let key = self.hasher.storage_key_for(identifier);
        match self.port.remove(&key).await {
            Ok(()) => debug!(
                identifier = %mask_identifier(identifier),
                "Cleared cached verification"
            ),
            Err(e) => warn!(
                identifier = %mask_identifier(identifier),
                event = "session_clear_failed",
                error = %e,
                "Failed to clear cached verification"
            ),
        }
    }

    async fn clear_all(&self) {
        let prefix = self.hasher.key_prefix();
        let keys = match self.port.keys_with_prefix(prefix).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(
                    prefix = prefix,
                    event = "session_clear_failed",
                    error = %e,
                    "Failed to enumerate cached verifications"
                );
                return;
            }
        };

        let mut removed = 0usize;
        for key in &keys {
            match self.port.remove(key).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(
                    event = "session_clear_failed",
                    error = %e,
                    "Failed to remove cached verification"
                ),
            }
        }

        info!(
            prefix = prefix,
            removed = removed,
            found = keys.len(),
            "Cleared cached verifications"
        );
    }
}

/// Cache used when a required capability is missing
///
/// Behaves as a permanently empty cache: writes are dropped and lookups miss.
#[derive(Debug, Clone)]
pub struct NoopSessionCache {
    reason: String,
}

impl NoopSessionCache {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    /// Why the real cache could not be used
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[async_trait]
impl VerifiedSessionCache for NoopSessionCache {
    async fn record_verified(&self, _identifier: &str) -> bool {
        false
    }

    async fn lookup_verified(&self, _identifier: &str) -> Option<VerifiedSession> {
        None
    }

    async fn clear_one(&self, _identifier: &str) {}

    async fn clear_all(&self) {}
}
