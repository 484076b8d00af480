//! Verification gate implementation

use std::sync::Arc;

use vsc_shared::utils::identifier::{is_valid_phone, mask_identifier, normalize_identifier};

use crate::errors::{DomainError, DomainResult};
use crate::services::session_cache::VerifiedSessionCache;

use super::traits::ChallengeExchange;
use super::types::{ChallengeOutcome, ConfirmOutcome};

/// Skips one-time-code challenges for recently verified identifiers
pub struct VerificationGate<X: ChallengeExchange> {
    /// Challenge provider
    exchange: Arc<X>,
    /// Verified-session cache
    cache: Arc<dyn VerifiedSessionCache>,
}

impl<X: ChallengeExchange> VerificationGate<X> {
    /// Create a new gate
    ///
    /// # Arguments
    ///
    /// * `exchange` - One-time-code provider
    /// * `cache` - Session cache, usually built by `SessionCacheFactory`
    pub fn new(exchange: Arc<X>, cache: Arc<dyn VerifiedSessionCache>) -> Self {
        Self { exchange, cache }
    }

    /// Start verifying `identifier`
    ///
    /// This method:
    /// 1. Normalizes and validates the identifier
    /// 2. Returns the cached session if one is still valid
    /// 3. Otherwise sends a new challenge
    ///
    /// # Returns
    ///
    /// * `Ok(ChallengeOutcome)` - Cached session or the sent challenge
    /// * `Err(DomainError)` - Invalid identifier or the exchange failed
    pub async fn begin(&self, identifier: &str) -> DomainResult<ChallengeOutcome> {
        let identifier = Self::checked_identifier(identifier)?;

        if let Some(session) = self.cache.lookup_verified(&identifier).await {
            tracing::info!(
                identifier = %mask_identifier(&identifier),
                expires_at = %session.expires_at,
                event = "challenge_skipped",
                "Identifier recently verified, skipping challenge"
            );
            return Ok(ChallengeOutcome::AlreadyVerified(session));
        }

        let message_id = self
            .exchange
            .send_challenge(&identifier)
            .await
            .map_err(|e| {
                tracing::error!(
                    identifier = %mask_identifier(&identifier),
                    error = %e,
                    event = "challenge_send_failed",
                    "Failed to send verification challenge"
                );
                DomainError::Internal {
                    message: format!("Failed to send challenge: {}", e),
                }
            })?;

        tracing::info!(
            identifier = %mask_identifier(&identifier),
            message_id = %message_id,
            event = "challenge_sent",
            "Sent verification challenge"
        );

        Ok(ChallengeOutcome::ChallengeSent { message_id })
    }

    /// Answer the outstanding challenge for `identifier`
    ///
    /// A successful answer is recorded in the cache. A lost cache write does
    /// not fail the verification; it is reported as `cached: false`.
    pub async fn confirm(&self, identifier: &str, code: &str) -> DomainResult<ConfirmOutcome> {
        let identifier = Self::checked_identifier(identifier)?;

        let code = code.trim();
        if code.is_empty() {
            return Ok(ConfirmOutcome::Rejected);
        }

        let accepted = self
            .exchange
            .verify_challenge(&identifier, code)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to verify challenge: {}", e),
            })?;

        if !accepted {
            tracing::warn!(
                identifier = %mask_identifier(&identifier),
                event = "challenge_rejected",
                "Verification code rejected"
            );
            return Ok(ConfirmOutcome::Rejected);
        }

        let cached = self.cache.record_verified(&identifier).await;
        Ok(ConfirmOutcome::Verified { cached })
    }

    /// Drop any cached verification for `identifier`, e.g. on logout
    pub async fn forget(&self, identifier: &str) {
        self.cache.clear_one(&normalize_identifier(identifier)).await;
    }

    fn checked_identifier(identifier: &str) -> DomainResult<String> {
        let normalized = normalize_identifier(identifier);
        if !is_valid_phone(&normalized) {
            return Err(DomainError::Validation {
                message: format!(
                    "Invalid phone number format: {}",
                    mask_identifier(&normalized)
                ),
            });
        }
        Ok(normalized)
    }
}
