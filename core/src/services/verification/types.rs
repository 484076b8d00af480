//! Types for verification gate results

use crate::domain::entities::VerifiedSession;

/// Result of starting a verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// A cached session is still valid; no challenge was sent
    AlreadyVerified(VerifiedSession),
    /// A challenge was sent
    ChallengeSent {
        /// The message ID from the provider
        message_id: String,
    },
}

/// Result of answering a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The code was accepted
    Verified {
        /// Whether the success was written to the session cache
        cached: bool,
    },
    /// The code was wrong or the challenge had expired
    Rejected,
}
