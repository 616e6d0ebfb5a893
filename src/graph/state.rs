//! Graph: the entity registry and relation store as one unit

use super::engine::{GraphError, GraphResult};
use super::entity::{Entity, EntityData, EntityId, EntityKind};
use super::registry::{EntityRef, EntityRegistry};
use super::relation::{Relation, RelationType};
use super::relations::RelationStore;

/// An unsynchronized citation graph.
///
/// Enforces the cross-component invariants: every relation endpoint exists
/// and has the kind its relation type expects. [`CitationGraph`] wraps this
/// behind a readers-writer lock.
///
/// [`CitationGraph`]: super::CitationGraph
#[derive(Debug, Clone, Default)]
pub struct Graph {
    registry: EntityRegistry,
    relations: RelationStore,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn relations(&self) -> &RelationStore {
        &self.relations
    }

    pub fn upsert_entity(&mut self, id: EntityId, data: EntityData) -> GraphResult<EntityRef> {
        self.registry.upsert(id, data)
    }

    /// Add a relation between two registered entities
    pub fn add_relation(
        &mut self,
        source: &EntityId,
        target: &EntityId,
        relation: RelationType,
    ) -> GraphResult<&Relation> {
        let (source_kind, target_kind) = relation.endpoints();
        self.check_endpoint(source, source_kind)?;
        self.check_endpoint(target, target_kind)?;
        Ok(self
            .relations
            .add_edge(source.clone(), target.clone(), relation))
    }

    fn check_endpoint(&self, id: &EntityId, expected: EntityKind) -> GraphResult<()> {
        match self.registry.kind_of(id) {
            None => Err(GraphError::MissingEndpoint(id.clone())),
            Some(found) if found != expected => Err(GraphError::EndpointKind {
                id: id.clone(),
                expected,
                found,
            }),
            Some(_) => Ok(()),
        }
    }

    pub(crate) fn restore_entity(&mut self, entity: Entity) -> GraphResult<()> {
        self.registry.restore(entity)
    }

    pub(crate) fn restore_relation(&mut self, relation: Relation) -> GraphResult<()> {
        let (source_kind, target_kind) = relation.relation.endpoints();
        self.check_endpoint(&relation.source, source_kind)?;
        self.check_endpoint(&relation.target, target_kind)?;
        let (seq, expected) = (relation.seq, self.relations.len());
        match self.relations.restore(relation) {
            Some(_) => Ok(()),
            None => Err(GraphError::Validation(format!(
                "relation has sequence {}, expected {}",
                seq, expected
            ))),
        }
    }

    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.registry.get(id)
    }

    pub fn entity_count(&self) -> usize {
        self.registry.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Paper;

    fn paper(graph: &mut Graph, title: &str) -> EntityId {
        graph
            .upsert_entity(EntityId::from(title), EntityData::Paper(Paper::new(title)))
            .unwrap()
            .id
    }

    #[test]
    fn relation_requires_both_endpoints() {
        let mut graph = Graph::new();
        let a = paper(&mut graph, "A");

        let err = graph
            .add_relation(&a, &EntityId::from("missing"), RelationType::Cites)
            .unwrap_err();
        assert!(matches!(err, GraphError::MissingEndpoint(id) if id.as_str() == "missing"));
        assert_eq!(graph.relation_count(), 0);
    }

    #[test]
    fn relation_checks_endpoint_kinds() {
        let mut graph = Graph::new();
        let a = paper(&mut graph, "A");
        let b = paper(&mut graph, "B");

        let err = graph.add_relation(&a, &b, RelationType::Wrote).unwrap_err();
        assert!(matches!(
            err,
            GraphError::EndpointKind {
                expected: EntityKind::Author,
                found: EntityKind::Paper,
                ..
            }
        ));

        graph.add_relation(&a, &b, RelationType::Cites).unwrap();
        assert_eq!(graph.relation_count(), 1);
    }

    #[test]
    fn restore_keeps_stored_sequence_and_rejects_gaps() {
        let mut graph = Graph::new();
        let a = Entity::new(EntityId::from("A"), EntityData::Paper(Paper::new("A")), 0);
        let c = Entity::new(EntityId::from("C"), EntityData::Paper(Paper::new("C")), 2);
        graph.restore_entity(a).unwrap();

        let err = graph.restore_entity(c).unwrap_err();
        assert!(matches!(err, GraphError::Validation(_)));
        assert_eq!(graph.entity_count(), 1);

        let b = Entity::new(EntityId::from("B"), EntityData::Paper(Paper::new("B")), 1);
        graph.restore_entity(b).unwrap();
        let gap = Relation::new(1, EntityId::from("A"), EntityId::from("B"), RelationType::Cites);
        assert!(graph.restore_relation(gap).is_err());
        let first = Relation::new(0, EntityId::from("A"), EntityId::from("B"), RelationType::Cites);
        graph.restore_relation(first).unwrap();
        assert_eq!(graph.relation_count(), 1);

        // New entities continue after the restored ones
        let d = paper(&mut graph, "D");
        assert_eq!(graph.entity(&d).unwrap().metadata.seq, 2);
    }
}
