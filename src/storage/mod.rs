//! Durable storage backends
//!
//! The graph never depends on a store: it forwards committed mutations to
//! any `GraphStore` (write-behind) and can be rehydrated from one at
//! startup. `SqliteStore` is the bundled implementation.

mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{GraphStore, OpenStore, StorageError, StorageResult};
