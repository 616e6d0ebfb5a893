//! CitationGraph: the main entry point for the citation graph

use super::entity::{Entity, EntityId, EntityKind};
use super::events::GraphEvent;
use super::relation::RelationType;
use super::state::Graph;
use crate::storage::{GraphStore, StorageError, StorageResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur in graph operations
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error(
        "type conflict: '{key}' is registered as {existing}, cannot register it as {requested}"
    )]
    TypeConflict {
        key: EntityId,
        existing: EntityKind,
        requested: EntityKind,
    },

    #[error("relation endpoint not found: {0}")]
    MissingEndpoint(EntityId),

    #[error("relation endpoint '{id}' is a {found}, expected a {expected}")]
    EndpointKind {
        id: EntityId,
        expected: EntityKind,
        found: EntityKind,
    },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Counts reported by [`CitationGraph::hydrate`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrateSummary {
    pub entities: usize,
    pub relations: usize,
}

/// The citation graph engine
///
/// Holds the entity registry and relation store behind one readers-writer
/// lock: ingestion holds it exclusively for a whole record, queries hold it
/// shared. Construct once per process and share it by `Arc`.
///
/// An optional durable store receives every committed mutation after the
/// lock is released (write-behind), in commit order. Store failures are
/// logged, never returned from ingestion.
pub struct CitationGraph {
    graph: RwLock<Graph>,
    store: Option<Arc<dyn GraphStore>>,
    delivery: DeliveryQueue,
}

/// Ticket queue for write-behind deliveries.
///
/// Tickets are issued under the graph write lock, so ticket order is commit
/// order; a delivery waits for its turn without holding the graph lock.
#[derive(Debug, Default)]
struct DeliveryQueue {
    issued: AtomicU64,
    served: Mutex<u64>,
    turn: Condvar,
}

impl DeliveryQueue {
    /// Must be called with the graph write lock held
    fn ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst)
    }

    fn run<T>(&self, ticket: u64, deliver: impl FnOnce() -> T) -> T {
        let mut served = self.served.lock().unwrap_or_else(PoisonError::into_inner);
        while *served != ticket {
            served = self.turn.wait(served).unwrap_or_else(PoisonError::into_inner);
        }
        drop(served);

        // Hands the turn on even if `deliver` panics
        let _next = TurnGuard(self);
        deliver()
    }
}

struct TurnGuard<'a>(&'a DeliveryQueue);

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        let mut served = self.0.served.lock().unwrap_or_else(PoisonError::into_inner);
        *served += 1;
        self.0.turn.notify_all();
    }
}

/// Stored sequence numbers must be `0..n` with no gaps
fn check_contiguous(what: &str, seqs: impl Iterator<Item = usize>) -> StorageResult<()> {
    for (pos, seq) in seqs.enumerate() {
        if seq != pos {
            return Err(StorageError::Corrupt(format!(
                "{} sequence is not contiguous: expected {}, found {}",
                what, pos, seq
            )));
        }
    }
    Ok(())
}

impl std::fmt::Debug for CitationGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let graph = self.read();
        f.debug_struct("CitationGraph")
            .field("entities", &graph.entity_count())
            .field("relations", &graph.relation_count())
            .field("has_store", &self.store.is_some())
            .finish()
    }
}

impl Default for CitationGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward committed mutations to the durable store
fn write_behind(store: &dyn GraphStore, events: &[GraphEvent]) {
    match store.apply(events) {
        Ok(()) => debug!(events = events.len(), "write-behind delivered"),
        Err(e) => warn!(
            error = %e,
            events = events.len(),
            "write-behind to durable store failed"
        ),
    }
}

impl CitationGraph {
    /// Create an empty in-memory graph with no durable store
    pub fn new() -> Self {
        Self {
            graph: RwLock::new(Graph::new()),
            store: None,
            delivery: DeliveryQueue::default(),
        }
    }

    /// Create an empty graph that writes behind to `store`
    pub fn with_store(store: Arc<dyn GraphStore>) -> Self {
        Self {
            graph: RwLock::new(Graph::new()),
            store: Some(store),
            delivery: DeliveryQueue::default(),
        }
    }

    /// Load everything the store holds into this (empty) graph.
    ///
    /// Entities are replayed before relations, both in sequence order. The
    /// replay is not written back to the store. Stored sequence numbers are
    /// kept, so they must run `0..n` without gaps; otherwise nothing is
    /// loaded and the store is reported corrupt.
    pub fn hydrate(&self) -> GraphResult<HydrateSummary> {
        let Some(store) = &self.store else {
            return Ok(HydrateSummary::default());
        };

        let entities = store.load_entities()?;
        let relations = store.load_relations()?;
        check_contiguous("entity", entities.iter().map(|e| e.metadata.seq))?;
        check_contiguous("relation", relations.iter().map(|r| r.seq))?;

        let mut graph = self.write();
        if graph.entity_count() > 0 {
            return Err(GraphError::Validation(
                "cannot hydrate a graph that already has entities".to_string(),
            ));
        }

        let summary = HydrateSummary {
            entities: entities.len(),
            relations: relations.len(),
        };
        for entity in entities {
            graph.restore_entity(entity)?;
        }
        for relation in relations {
            graph.restore_relation(relation)?;
        }
        info!(
            entities = summary.entities,
            relations = summary.relations,
            "hydrated graph from durable store"
        );
        Ok(summary)
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Shared access to the graph (lock poisoning is ignored)
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Graph> {
        self.graph.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Graph> {
        self.graph.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a mutation under the write lock, then deliver the events it
    /// returns to the durable store.
    ///
    /// Deliveries reach the store in commit order; the graph lock is not
    /// held while delivering.
    pub(crate) fn commit<T>(&self, apply: impl FnOnce(&mut Graph) -> (T, Vec<GraphEvent>)) -> T {
        let (result, events, ticket) = {
            let mut graph = self.write();
            let (result, events) = apply(&mut graph);
            let ticket = match &self.store {
                Some(_) if !events.is_empty() => Some(self.delivery.ticket()),
                _ => None,
            };
            (result, events, ticket)
        };
        if let (Some(store), Some(ticket)) = (&self.store, ticket) {
            self.delivery.run(ticket, || write_behind(store.as_ref(), &events));
        }
        result
    }

    /// Clone of the current graph state
    pub fn snapshot(&self) -> Graph {
        self.read().clone()
    }

    /// Look up an entity by display string (trimmed before lookup)
    pub fn entity(&self, id: &str) -> Option<Entity> {
        self.read().entity(&EntityId::normalize(id)).cloned()
    }

    pub fn entity_count(&self) -> usize {
        self.read().entity_count()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.read().registry().count(kind)
    }

    pub fn relation_count(&self) -> usize {
        self.read().relation_count()
    }

    pub fn relation_count_of(&self, relation: RelationType) -> usize {
        self.read().relations().count(relation)
    }
}
