//! Trait for the one-time-code exchange the gate sits in front of

use async_trait::async_trait;

/// Sends and checks one-time-code challenges
///
/// Implemented by the host: an SMS gateway, a voice call provider or a
/// test double. The session cache never sees the codes.
#[async_trait]
pub trait ChallengeExchange: Send + Sync {
    /// Send a fresh challenge to `identifier`, returning the provider's message ID
    async fn send_challenge(&self, identifier: &str) -> Result<String, String>;

    /// Check `code` against the outstanding challenge for `identifier`
    async fn verify_challenge(&self, identifier: &str, code: &str) -> Result<bool, String>;
}
