//! Ingestion of paper records into the citation graph
//!
//! The ingestion engine is the only writer: transports and file loaders
//! hand it already-parsed [`PaperRecord`]s (see [`read_records`] for JSON
//! and CSV files) through
//! [`CitationGraph::ingest_paper`] and [`CitationGraph::ingest_batch`].
//!
//! [`CitationGraph::ingest_paper`]: crate::CitationGraph::ingest_paper
//! [`CitationGraph::ingest_batch`]: crate::CitationGraph::ingest_batch

mod loader;
mod pipeline;
mod record;
mod report;

pub use loader::{read_records, records_from_csv, records_from_json, LoadError, RecordFormat};
pub use record::{NameList, PaperRecord};
pub use report::{BatchFailure, BatchReport, IngestReport, Rejection};
