//! Graph events produced by committed mutations
//!
//! Ingestion collects one event per mutation and hands them to the durable
//! store after the in-memory commit.

use super::entity::Entity;
use super::relation::Relation;

/// A committed mutation
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    /// An entity was created or merged; carries its state after the upsert
    EntityUpserted(Entity),
    /// A relation was appended
    RelationAdded(Relation),
}
