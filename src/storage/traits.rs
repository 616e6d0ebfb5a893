//! Storage trait definitions

use crate::graph::{Entity, GraphEvent, Relation};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Date parsing error: {0}")]
    DateParse(String),

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for durable graph backends
///
/// A store is a write-behind target: the engine forwards committed
/// mutations and never waits on it for correctness. Implementations must be
/// thread-safe (Send + Sync).
pub trait GraphStore: Send + Sync {
    /// Insert or update an entity, keyed by its id
    fn save_entity(&self, entity: &Entity) -> StorageResult<()>;

    /// Append a relation, keyed by its sequence number
    fn save_relation(&self, relation: &Relation) -> StorageResult<()>;

    /// All entities in sequence order
    fn load_entities(&self) -> StorageResult<Vec<Entity>>;

    /// All relations in sequence order
    fn load_relations(&self) -> StorageResult<Vec<Relation>>;

    /// Apply a batch of committed mutations in order
    fn apply(&self, events: &[GraphEvent]) -> StorageResult<()> {
        for event in events {
            match event {
                GraphEvent::EntityUpserted(entity) => self.save_entity(entity)?,
                GraphEvent::RelationAdded(relation) => self.save_relation(relation)?,
            }
        }
        Ok(())
    }
}

/// Extension trait for opening stores from paths
pub trait OpenStore: GraphStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
