//! Verification gate
//!
//! Puts the verified-session cache in front of a one-time-code exchange:
//! identifiers with a valid cached session skip the challenge, and every
//! successful challenge is recorded.

mod gate;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use gate::VerificationGate;
pub use traits::ChallengeExchange;
pub use types::{ChallengeOutcome, ConfirmOutcome};
