//! Paper lookups

use super::types::PaperSummary;
use crate::graph::{CitationGraph, Entity, EntityId, EntityKind, Graph, RelationType};

/// Every paper, stubs included, in registration order
pub fn list_papers(graph: &Graph) -> Vec<PaperSummary> {
    graph
        .registry()
        .list(EntityKind::Paper)
        .filter_map(Entity::as_paper)
        .map(PaperSummary::from)
        .collect()
}

/// Papers reached over the author's WROTE edges, in edge order.
///
/// An unknown author yields an empty list.
pub fn papers_by_author(graph: &Graph, author: &str) -> Vec<PaperSummary> {
    let author = EntityId::normalize(author);
    graph
        .relations()
        .edges_from(&author, RelationType::Wrote)
        .into_iter()
        .filter_map(|id| graph.entity(id))
        .filter_map(Entity::as_paper)
        .map(PaperSummary::from)
        .collect()
}

impl CitationGraph {
    pub fn list_papers(&self) -> Vec<PaperSummary> {
        list_papers(&self.read())
    }

    pub fn papers_by_author(&self, author: &str) -> Vec<PaperSummary> {
        papers_by_author(&self.read(), author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::PaperRecord;

    fn create_test_graph() -> CitationGraph {
        let graph = CitationGraph::new();
        graph
            .ingest_paper(
                &PaperRecord::new("Paper A")
                    .with_year("2001")
                    .with_authors("Alice, Bob")
                    .citing("Paper C"),
            )
            .unwrap();
        graph
            .ingest_paper(&PaperRecord::new("Paper B").with_authors(vec!["Alice"]))
            .unwrap();
        graph
    }

    #[test]
    fn test_papers_by_author() {
        let graph = create_test_graph();
        let titles: Vec<String> = graph
            .papers_by_author("Alice")
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Paper A", "Paper B"]);
        assert_eq!(graph.papers_by_author("Bob").len(), 1);
    }

    #[test]
    fn test_author_lookup_is_trimmed() {
        let graph = create_test_graph();
        assert_eq!(graph.papers_by_author("  Alice ").len(), 2);
    }

    #[test]
    fn test_unknown_author_is_empty() {
        let graph = create_test_graph();
        assert!(graph.papers_by_author("nobody").is_empty());
        // A paper title is not an author
        assert!(graph.papers_by_author("Paper A").is_empty());
    }

    #[test]
    fn test_list_papers_includes_stubs_in_order() {
        let graph = create_test_graph();
        let papers = graph.list_papers();
        let titles: Vec<&str> = papers.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Paper A", "Paper C", "Paper B"]);
        assert!(papers[1].stub);
        assert_eq!(papers[0].year.as_deref(), Some("2001"));
    }
}
