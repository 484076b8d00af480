//! Verified-session cache
//!
//! Remembers, per phone number, that a one-time-code challenge was passed so
//! the next request within the TTL can skip it. Sessions are stored only as
//! AES-256-GCM envelopes under keys derived from a peppered hash of the
//! identifier.
//!
//! - `hasher` - identifier to storage key
//! - `key_deriver` - PBKDF2 key derivation per envelope
//! - `codec` - session to envelope and back
//! - `facade` - the cache operations callers use
//! - `factory` - capability check and no-op fallback

mod clock;
mod codec;
mod config;
mod facade;
mod factory;
mod hasher;
mod key_deriver;

#[cfg(test)]
mod tests;

pub use clock::{Clock, SystemClock};
pub use codec::{SessionCodec, IV_LEN};
pub use config::{
    effective_ttl_days, EnvTtlSource, TtlSource, DEFAULT_TTL_DAYS, MAX_TTL_DAYS, MIN_TTL_DAYS,
};
pub use facade::{EncryptedSessionCache, NoopSessionCache, VerifiedSessionCache};
pub use factory::SessionCacheFactory;
pub use hasher::IdentifierHasher;
pub use key_deriver::{KeyDeriver, KEY_LEN, SALT_LEN};
