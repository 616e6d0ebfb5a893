//! Query result structures

use crate::graph::{Entity, EntityData, EntityId, EntityKind, Paper, Relation, RelationType};
use serde::{Deserialize, Serialize};

/// Direction for edge traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Follow outgoing edges (source -> target)
    #[default]
    Outgoing,
    /// Follow incoming edges (target <- source)
    Incoming,
    /// Follow edges in both directions
    Both,
}

/// Display view of a paper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperSummary {
    pub title: String,
    pub year: Option<String>,
    pub authors: Vec<String>,
    pub journal: Option<String>,
    #[serde(default)]
    pub stub: bool,
}

impl From<&Paper> for PaperSummary {
    fn from(paper: &Paper) -> Self {
        Self {
            title: paper.title.clone(),
            year: paper.year.clone(),
            authors: paper.authors.clone(),
            journal: paper.journal.clone(),
            stub: paper.stub,
        }
    }
}

/// Citation neighbourhood of one paper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citations {
    pub paper: EntityId,
    /// Papers this paper cites, one entry per CITES edge
    pub cites: Vec<EntityId>,
    /// Papers citing this paper, one entry per CITES edge
    pub cited_by: Vec<EntityId>,
}

impl Citations {
    pub fn is_empty(&self) -> bool {
        self.cites.is_empty() && self.cited_by.is_empty()
    }
}

/// One row of the influence ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPaper {
    #[serde(flatten)]
    pub paper: PaperSummary,
    /// Incoming CITES edges
    pub citation_count: usize,
}

/// A node of the graph projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    /// Papers only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Authors and journals only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(default)]
    pub stub: bool,
}

impl From<&Entity> for NodeView {
    fn from(entity: &Entity) -> Self {
        let mut view = Self {
            id: entity.id.clone(),
            kind: entity.kind(),
            title: None,
            name: None,
            year: None,
            authors: Vec::new(),
            journal: None,
            stub: false,
        };
        match &entity.data {
            EntityData::Paper(paper) => {
                view.title = Some(paper.title.clone());
                view.year = paper.year.clone();
                view.authors = paper.authors.clone();
                view.journal = paper.journal.clone();
                view.stub = paper.stub;
            }
            EntityData::Author(author) => view.name = Some(author.name.clone()),
            EntityData::Journal(journal) => view.name = Some(journal.name.clone()),
        }
        view
    }
}

/// An edge of the graph projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeView {
    pub source: EntityId,
    pub target: EntityId,
    #[serde(rename = "type")]
    pub relation: RelationType,
}

impl From<&Relation> for EdgeView {
    fn from(relation: &Relation) -> Self {
        Self {
            source: relation.source.clone(),
            target: relation.target.clone(),
            relation: relation.relation,
        }
    }
}

/// Full projection of the graph, for visualization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    /// Registry order
    pub nodes: Vec<NodeView>,
    /// Insertion order
    pub edges: Vec<EdgeView>,
}
