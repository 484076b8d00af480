//! Domain layer containing the session and envelope entities.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
