//! Full graph projection

use super::types::{EdgeView, GraphView, NodeView};
use crate::graph::{CitationGraph, Graph};

/// Every node in registry order and every edge in insertion order
pub fn full_graph(graph: &Graph) -> GraphView {
    GraphView {
        nodes: graph.registry().iter().map(NodeView::from).collect(),
        edges: graph.relations().iter().map(EdgeView::from).collect(),
    }
}

impl CitationGraph {
    pub fn full_graph(&self) -> GraphView {
        full_graph(&self.read())
    }
}
