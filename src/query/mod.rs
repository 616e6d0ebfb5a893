//! Read-only queries over the citation graph
//!
//! Each query is a plain function over a [`Graph`] plus a
//! [`CitationGraph`] method that runs it under the shared lock.
//!
//! [`Graph`]: crate::graph::Graph
//! [`CitationGraph`]: crate::graph::CitationGraph

mod find;
mod influence;
mod projection;
mod traverse;
mod types;

pub use find::{list_papers, papers_by_author};
pub use influence::{InfluenceQuery, DEFAULT_LIMIT};
pub use projection::full_graph;
pub use traverse::{citations_of, neighbors};
pub use types::{Citations, Direction, EdgeView, GraphView, NodeView, PaperSummary, RankedPaper};
