//! Relation store: append-only multi-edges with per-type adjacency indexes

use super::entity::EntityId;
use super::relation::{Relation, RelationType};
use std::collections::HashMap;

/// Per relation type, entity id → positions in `relations`
type Adjacency = HashMap<RelationType, HashMap<EntityId, Vec<usize>>>;

/// Append-only store of typed relations.
///
/// Outgoing and incoming adjacency is indexed per relation type as edges
/// are added, so lookups cost the fan-out/fan-in of the entity rather than
/// a scan of the store. Buckets hold edge positions in insertion order.
#[derive(Debug, Clone, Default)]
pub struct RelationStore {
    relations: Vec<Relation>,
    outgoing: Adjacency,
    incoming: Adjacency,
}

impl RelationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new edge. Never checks whether an identical edge exists.
    pub fn add_edge(
        &mut self,
        source: EntityId,
        target: EntityId,
        relation: RelationType,
    ) -> &Relation {
        let seq = self.relations.len();
        self.push(Relation::new(seq, source, target, relation))
    }

    /// Append an edge loaded from storage. Returns `None`, storing nothing,
    /// unless its sequence number is the next free position.
    pub(crate) fn restore(&mut self, relation: Relation) -> Option<&Relation> {
        if relation.seq != self.relations.len() {
            return None;
        }
        Some(self.push(relation))
    }

    fn push(&mut self, relation: Relation) -> &Relation {
        let pos = relation.seq;
        self.outgoing
            .entry(relation.relation)
            .or_default()
            .entry(relation.source.clone())
            .or_default()
            .push(pos);
        self.incoming
            .entry(relation.relation)
            .or_default()
            .entry(relation.target.clone())
            .or_default()
            .push(pos);
        self.relations.push(relation);
        &self.relations[pos]
    }

    fn bucket<'a>(index: &'a Adjacency, id: &EntityId, relation: RelationType) -> &'a [usize] {
        index
            .get(&relation)
            .and_then(|by_id| by_id.get(id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Target ids of `relation` edges leaving `id`, one per edge
    pub fn edges_from(&self, id: &EntityId, relation: RelationType) -> Vec<&EntityId> {
        Self::bucket(&self.outgoing, id, relation)
            .iter()
            .map(|&pos| &self.relations[pos].target)
            .collect()
    }

    /// Source ids of `relation` edges entering `id`, one per edge
    pub fn edges_to(&self, id: &EntityId, relation: RelationType) -> Vec<&EntityId> {
        Self::bucket(&self.incoming, id, relation)
            .iter()
            .map(|&pos| &self.relations[pos].source)
            .collect()
    }

    /// Number of `relation` edges entering `id`
    pub fn in_degree(&self, id: &EntityId, relation: RelationType) -> usize {
        Self::bucket(&self.incoming, id, relation).len()
    }

    /// All edges in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Relation> {
        self.relations.iter()
    }

    pub fn count(&self, relation: RelationType) -> usize {
        self.relations.iter().filter(|r| r.relation == relation).count()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}
