//! Citegraph: Academic Citation Graph Engine
//!
//! An in-memory knowledge graph of papers, authors and journals, built from
//! bibliographic records and queried for authorship, citations and
//! influence.
//!
//! # Core Concepts
//!
//! - **Entities**: Papers, authors and journals, keyed by their trimmed name
//! - **Relations**: Directed `WROTE`, `PUBLISHED_IN` and `CITES` edges
//! - **Stubs**: Papers known only because something cites them, completed
//!   when their own record arrives
//!
//! # Example
//!
//! ```
//! use citegraph::{CitationGraph, PaperRecord};
//!
//! let graph = CitationGraph::new();
//! graph
//!     .ingest_paper(&PaperRecord::new("A").with_authors("Alice, Bob").citing("B"))
//!     .unwrap();
//!
//! assert_eq!(graph.papers_by_author("Alice").len(), 1);
//! assert_eq!(graph.citations_of("B").cited_by.len(), 1);
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod graph;
pub mod ingest;
pub mod query;
pub mod storage;

pub use api::CitegraphApi;
pub use cache::{CacheConfig, CacheError, CacheResult, InMemoryCache, QueryCache};
pub use config::{Config, ConfigError};
pub use graph::{
    CitationGraph, Entity, EntityData, EntityId, EntityKind, GraphError, GraphResult,
    HydrateSummary, Paper, Relation, RelationType,
};
pub use ingest::{
    read_records, BatchReport, IngestReport, LoadError, NameList, PaperRecord, Rejection,
};
pub use query::{Citations, Direction, GraphView, InfluenceQuery, PaperSummary, RankedPaper};
pub use storage::{GraphStore, OpenStore, SqliteStore, StorageError, StorageResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
