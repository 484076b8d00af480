//! Persistence port module.

mod r#trait;
pub use r#trait::PersistencePort;

mod memory;
pub use memory::InMemoryPersistence;
