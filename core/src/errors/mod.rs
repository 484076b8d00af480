//! Domain-specific error types and error handling.

mod types;


pub use types::SessionCacheError;

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to the session cache taxonomy
    #[error(transparent)]
    Cache(#[from] SessionCacheError),
}

pub type DomainResult<T> = Result<T, DomainError>;
