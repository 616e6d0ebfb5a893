//! Core graph data structures

mod engine;
mod entity;
mod events;
mod registry;
mod relation;
mod relations;
mod state;


pub use engine::{CitationGraph, GraphError, GraphResult, HydrateSummary};
pub use entity::{Author, Entity, EntityData, EntityId, EntityKind, EntityMetadata, Journal, Paper};
pub use events::GraphEvent;
pub use registry::{EntityRef, EntityRegistry};
pub use relation::{Relation, RelationType};
pub use relations::RelationStore;
pub use state::Graph;

pub(crate) use entity::non_empty;
