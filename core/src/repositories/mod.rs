//! Repository interfaces: the key/value persistence port the cache writes through.

pub mod persistence;

pub use persistence::{InMemoryPersistence, PersistencePort};
