//! Business services containing domain logic and use cases.

pub mod session_cache;
pub mod verification;

// Re-export commonly used types
pub use session_cache::{
    Clock, EncryptedSessionCache, EnvTtlSource, NoopSessionCache, SessionCacheFactory,
    SystemClock, TtlSource, VerifiedSessionCache,
};
pub use verification::{ChallengeExchange, ChallengeOutcome, ConfirmOutcome, VerificationGate};
