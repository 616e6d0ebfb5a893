//! Transport-independent API layer.
//!
//! `CitegraphApi` is the single entry point for consumer-facing operations.
//! Front ends (the CLI, tests, direct embedding) call these methods rather
//! than reaching into `CitationGraph` and the cache separately: reads
//! consult the cache, writes invalidate it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{keys, CacheConfig, QueryCache};
use crate::graph::{CitationGraph, GraphResult};
use crate::ingest::{BatchReport, IngestReport, PaperRecord};
use crate::query::{Citations, GraphView, PaperSummary, RankedPaper};

/// Single entry point for all consumer-facing operations.
#[derive(Clone)]
pub struct CitegraphApi {
    graph: Arc<CitationGraph>,
    cache: Option<Arc<dyn QueryCache>>,
    ttl: Duration,
    /// Count of committed writes. A computed result is cached only if no
    /// write committed while it was being computed; fills and invalidations
    /// both happen under this lock.
    generation: Arc<Mutex<u64>>,
}

impl std::fmt::Debug for CitegraphApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CitegraphApi")
            .field("graph", &self.graph)
            .field("cached", &self.cache.is_some())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl CitegraphApi {
    /// Create an API without a cache.
    pub fn new(graph: Arc<CitationGraph>) -> Self {
        Self {
            graph,
            cache: None,
            ttl: CacheConfig::default().ttl(),
            generation: Arc::default(),
        }
    }

    /// Attach a query cache; entries live for `ttl`.
    pub fn with_cache(mut self, cache: Arc<dyn QueryCache>, ttl: Duration) -> Self {
        self.cache = Some(cache);
        self.ttl = ttl;
        self
    }

    pub fn graph(&self) -> &Arc<CitationGraph> {
        &self.graph
    }

    // --- Write ---

    /// Ingest one record; on success every cached query is dropped.
    pub fn add_paper(&self, record: &PaperRecord) -> GraphResult<IngestReport> {
        let report = self.graph.ingest_paper(record)?;
        self.invalidate_all();
        Ok(report)
    }

    /// Ingest a batch, skipping invalid records.
    pub fn load_records(&self, records: &[PaperRecord]) -> BatchReport {
        let report = self.graph.ingest_batch(records);
        if report.processed > 0 {
            self.invalidate_all();
        }
        report
    }

    // --- Read ---

    pub fn papers(&self) -> Vec<PaperSummary> {
        self.cached(keys::PAPERS, || self.graph.list_papers())
    }

    pub fn papers_by_author(&self, author: &str) -> Vec<PaperSummary> {
        let author = author.trim();
        self.cached(&keys::author(author), || self.graph.papers_by_author(author))
    }

    pub fn citations(&self, title: &str) -> Citations {
        let title = title.trim();
        self.cached(&keys::citations(title), || self.graph.citations_of(title))
    }

    pub fn graph_view(&self) -> GraphView {
        self.cached(keys::GRAPH, || self.graph.full_graph())
    }

    pub fn most_influential(&self, limit: usize) -> Vec<RankedPaper> {
        self.cached(&keys::influential(limit), || self.graph.most_influential(limit))
    }

    // --- Cache plumbing ---

    fn generation(&self) -> MutexGuard<'_, u64> {
        self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serve `key` from the cache, or compute it and fill the cache.
    ///
    /// Cache failures and undecodable entries fall through to `compute`. A
    /// result computed across a committed write is returned but not cached.
    fn cached<T, F>(&self, key: &str, compute: F) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        let Some(cache) = &self.cache else {
            return compute();
        };

        match cache.get(key) {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(hit) => return hit,
                Err(e) => warn!(key, error = %e, "discarding undecodable cache entry"),
            },
            Ok(None) => {}
            Err(e) => warn!(key, error = %e, "cache read failed"),
        }

        let started = *self.generation();
        let fresh = compute();
        let value = match serde_json::to_value(&fresh) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "query result not cacheable");
                return fresh;
            }
        };

        let generation = self.generation();
        if *generation != started {
            debug!(key, "write committed during query, result not cached");
        } else if let Err(e) = cache.set(key, value, self.ttl) {
            warn!(key, error = %e, "cache write failed");
        }
        fresh
    }

    fn invalidate_all(&self) {
        let Some(cache) = &self.cache else {
            return;
        };
        let mut generation = self.generation();
        *generation += 1;
        for pattern in keys::ALL_PATTERNS {
            match cache.invalidate(pattern) {
                Ok(removed) => debug!(pattern, removed, "invalidated cached queries"),
                Err(e) => warn!(pattern, error = %e, "cache invalidation failed"),
            }
        }
    }
}
