//! Domain entities: the plaintext session and its persisted envelope.

pub mod storage_envelope;
pub mod verified_session;


// Re-export commonly used types
pub use storage_envelope::StorageEnvelope;
pub use verified_session::{truncate_to_millis, VerifiedSession, SCHEMA_VERSION};
