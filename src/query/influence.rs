//! Influence ranking by incoming citation count

use super::types::{PaperSummary, RankedPaper};
use crate::graph::{CitationGraph, Entity, EntityKind, Graph, RelationType};
use std::cmp::Reverse;

/// Number of papers returned when no limit is given
pub const DEFAULT_LIMIT: usize = 10;

/// Top-N papers by incoming CITES edges
///
/// Counts every edge, so a paper cited twice by the same record counts
/// twice. Ties keep registration order, which makes the ranking identical
/// across runs on an unchanged graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfluenceQuery {
    pub limit: usize,
}

impl Default for InfluenceQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}

impl InfluenceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Execute the ranking against a graph
    pub fn execute(&self, graph: &Graph) -> Vec<RankedPaper> {
        let relations = graph.relations();
        // Registration order going in; the sort below is stable
        let mut ranked: Vec<(&Entity, usize)> = graph
            .registry()
            .list(EntityKind::Paper)
            .map(|entity| (entity, relations.in_degree(&entity.id, RelationType::Cites)))
            .collect();
        ranked.sort_by_key(|&(_, count)| Reverse(count));
        ranked.truncate(self.limit);

        ranked
            .into_iter()
            .filter_map(|(entity, citation_count)| {
                entity.as_paper().map(|paper| RankedPaper {
                    paper: PaperSummary::from(paper),
                    citation_count,
                })
            })
            .collect()
    }
}

impl CitationGraph {
    pub fn most_influential(&self, limit: usize) -> Vec<RankedPaper> {
        InfluenceQuery::new().limit(limit).execute(&self.read())
    }
}
