//! Ingestion results
//!
//! Partial success is the normal case: an entity that collides with an
//! existing key of another kind is rejected individually while the rest of
//! the record commits.

use crate::graph::{EntityId, EntityKind};
use serde::Serialize;

/// An entity (and the relation that needed it) skipped during ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub key: EntityId,
    /// Kind the record asked for
    pub requested: EntityKind,
    /// Kind already registered under the key
    pub existing: EntityKind,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' is already a {}, skipped as {}",
            self.key, self.existing, self.requested
        )
    }
}

/// Result of ingesting one paper record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub paper_id: EntityId,
    /// Entities this record created (merges are not counted)
    pub entities_created: usize,
    pub edges_created: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejections: Vec<Rejection>,
}

impl IngestReport {
    pub(crate) fn new(paper_id: EntityId) -> Self {
        Self {
            paper_id,
            entities_created: 0,
            edges_created: 0,
            rejections: Vec::new(),
        }
    }

    /// True if nothing in the record was rejected
    pub fn is_fully_committed(&self) -> bool {
        self.rejections.is_empty()
    }
}

/// A record skipped by batch ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    /// Position of the record in the batch
    pub index: usize,
    pub title: String,
    pub error: String,
}

/// Aggregate result of batch ingestion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Records ingested successfully
    pub processed: usize,
    /// Records that failed and were skipped
    pub skipped: usize,
    pub entities_created: usize,
    pub edges_created: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<BatchFailure>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejections: Vec<Rejection>,
}

impl BatchReport {
    pub(crate) fn record(&mut self, report: IngestReport) {
        self.processed += 1;
        self.entities_created += report.entities_created;
        self.edges_created += report.edges_created;
        self.rejections.extend(report.rejections);
    }

    pub(crate) fn fail(&mut self, index: usize, title: &str, error: impl ToString) {
        self.skipped += 1;
        self.failures.push(BatchFailure {
            index,
            title: title.to_string(),
            error: error.to_string(),
        });
    }

    pub fn is_noop(&self) -> bool {
        self.processed == 0 && self.skipped == 0
    }
}
