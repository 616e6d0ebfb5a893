//! Shared fixtures for citegraph integration tests

#![allow(dead_code)]

use citegraph::{CitationGraph, PaperRecord, PaperSummary};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A small bibliography: two papers by Alice, one citing the other, and a
/// third citing both plus one paper nobody has submitted.
pub fn sample_records() -> Vec<PaperRecord> {
    vec![
        PaperRecord::new("Graph Theory Basics")
            .with_year("1990")
            .with_authors("Alice, Bob")
            .with_journal("Nature"),
        PaperRecord::new("Network Science")
            .with_year("2000")
            .with_authors(vec!["Alice"])
            .with_journal("Science")
            .citing("Graph Theory Basics"),
        PaperRecord::new("Citation Dynamics")
            .with_year("2010")
            .with_authors("Carol")
            .with_journal("Nature")
            .citing(vec!["Graph Theory Basics", "Network Science", "Unpublished Notes"]),
    ]
}

/// Graph with every record ingested in order
pub fn graph_with(records: &[PaperRecord]) -> CitationGraph {
    let graph = CitationGraph::new();
    let report = graph.ingest_batch(records);
    assert_eq!(report.skipped, 0, "fixture records must all ingest");
    graph
}

pub fn sample_graph() -> CitationGraph {
    graph_with(&sample_records())
}

pub fn titles(papers: &[PaperSummary]) -> Vec<&str> {
    papers.iter().map(|p| p.title.as_str()).collect()
}

/// Random citation network over titles `P0..P{papers}`.
///
/// Each record cites up to `max_cites` titles, possibly unsubmitted ones,
/// possibly itself, possibly the same title twice.
pub fn random_records(seed: u64, papers: usize, max_cites: usize) -> Vec<PaperRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..papers)
        .map(|i| {
            let cites: Vec<String> = (0..rng.gen_range(0..=max_cites))
                .map(|_| format!("P{}", rng.gen_range(0..papers + papers / 2)))
                .collect();
            PaperRecord::new(format!("P{}", i)).citing(cites)
        })
        .collect()
}
