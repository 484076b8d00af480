//! # Verified Session Cache Core
//!
//! Domain layer for the encrypted verified-session cache. A successful
//! one-time-code verification is recorded as an AES-256-GCM envelope keyed by
//! a peppered hash of the identifier, so neither the identifier nor the fact
//! of verification is ever persisted in plaintext.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
