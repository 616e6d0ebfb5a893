//! Typed edge traversal

use super::types::{Citations, Direction};
use crate::graph::{CitationGraph, EntityId, Graph, RelationType};

/// Ids adjacent to `id` over `relation` edges, one entry per edge.
///
/// With [`Direction::Both`], outgoing neighbours come first.
pub fn neighbors<'g>(
    graph: &'g Graph,
    id: &EntityId,
    relation: RelationType,
    direction: Direction,
) -> Vec<&'g EntityId> {
    let relations = graph.relations();
    match direction {
        Direction::Outgoing => relations.edges_from(id, relation),
        Direction::Incoming => relations.edges_to(id, relation),
        Direction::Both => {
            let mut ids = relations.edges_from(id, relation);
            ids.extend(relations.edges_to(id, relation));
            ids
        }
    }
}

/// What a paper cites and what cites it. An unknown title yields two empty
/// lists.
pub fn citations_of(graph: &Graph, title: &str) -> Citations {
    let paper = EntityId::normalize(title);
    let collect = |direction: Direction| -> Vec<EntityId> {
        neighbors(graph, &paper, RelationType::Cites, direction)
            .into_iter()
            .cloned()
            .collect()
    };
    Citations {
        cites: collect(Direction::Outgoing),
        cited_by: collect(Direction::Incoming),
        paper,
    }
}

impl CitationGraph {
    pub fn citations_of(&self, title: &str) -> Citations {
        citations_of(&self.read(), title)
    }

    /// Neighbour lookup by display string
    pub fn neighbors(
        &self,
        id: &str,
        relation: RelationType,
        direction: Direction,
    ) -> Vec<EntityId> {
        let graph = self.read();
        neighbors(&graph, &EntityId::normalize(id), relation, direction)
            .into_iter()
            .cloned()
            .collect()
    }
}
