//! SQLite write-behind and hydration

mod common;

use citegraph::graph::GraphEvent;
use citegraph::{
    CitationGraph, Entity, GraphError, GraphStore, OpenStore, PaperRecord, Relation, RelationType,
    SqliteStore, StorageError, StorageResult,
};
use common::{sample_records, titles};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn open_graph(path: &Path) -> CitationGraph {
    let store = SqliteStore::open(path).unwrap();
    let graph = CitationGraph::with_store(Arc::new(store));
    graph.hydrate().unwrap();
    graph
}

/// Store whose first batch announces itself and then stalls, so a later
/// commit can overtake it if deliveries are not ordered.
struct StallingStore {
    inner: Arc<SqliteStore>,
    stalled: AtomicBool,
    started: Mutex<Option<mpsc::Sender<()>>>,
}

impl StallingStore {
    fn new(inner: Arc<SqliteStore>, started: mpsc::Sender<()>) -> Self {
        Self {
            inner,
            stalled: AtomicBool::new(false),
            started: Mutex::new(Some(started)),
        }
    }
}

impl GraphStore for StallingStore {
    fn save_entity(&self, entity: &Entity) -> StorageResult<()> {
        self.inner.save_entity(entity)
    }

    fn save_relation(&self, relation: &Relation) -> StorageResult<()> {
        self.inner.save_relation(relation)
    }

    fn load_entities(&self) -> StorageResult<Vec<Entity>> {
        self.inner.load_entities()
    }

    fn load_relations(&self) -> StorageResult<Vec<Relation>> {
        self.inner.load_relations()
    }

    fn apply(&self, events: &[GraphEvent]) -> StorageResult<()> {
        if !self.stalled.swap(true, Ordering::SeqCst) {
            if let Some(started) = self.started.lock().unwrap().take() {
                started.send(()).unwrap();
            }
            thread::sleep(Duration::from_millis(300));
        }
        self.inner.apply(events)
    }
}

#[test]
fn committed_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("citegraph.db");

    let original = open_graph(&path);
    let report = original.ingest_batch(&sample_records());
    assert_eq!(report.processed, 3);
    let expected = original.full_graph();
    drop(original);

    let reopened = open_graph(&path);
    assert_eq!(reopened.full_graph(), expected);
    assert_eq!(
        titles(&reopened.papers_by_author("Alice")),
        vec!["Graph Theory Basics", "Network Science"]
    );
    assert!(reopened.entity("Unpublished Notes").unwrap().as_paper().unwrap().stub);
}

#[test]
fn ingestion_continues_after_hydration() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.db");

    let first = open_graph(&path);
    first.ingest_paper(&PaperRecord::new("A").citing("B")).unwrap();
    let stub_seq = first.entity("B").unwrap().metadata.seq;
    drop(first);

    let second = open_graph(&path);
    second
        .ingest_paper(&PaperRecord::new("B").with_year("2020").citing("A"))
        .unwrap();
    second.ingest_paper(&PaperRecord::new("C").citing("A")).unwrap();
    drop(second);

    let third = open_graph(&path);
    let b = third.entity("B").unwrap();
    assert_eq!(b.metadata.seq, stub_seq);
    let paper = b.as_paper().unwrap();
    assert!(!paper.stub);
    assert_eq!(paper.year.as_deref(), Some("2020"));

    assert_eq!(third.relation_count_of(RelationType::Cites), 3);
    let ranked = third.most_influential(1);
    assert_eq!(ranked[0].paper.title, "A");
    assert_eq!(ranked[0].citation_count, 2);

    let seqs: Vec<usize> = third
        .snapshot()
        .relations()
        .iter()
        .map(|r| r.seq)
        .collect();
    assert_eq!(seqs, vec![0, 1, 2]);
}

#[test]
fn store_mirrors_graph_exactly() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let graph = CitationGraph::with_store(store.clone());
    graph.ingest_batch(&sample_records());

    let snapshot = graph.snapshot();
    let entities = store.load_entities().unwrap();
    let relations = store.load_relations().unwrap();
    assert_eq!(entities.len(), snapshot.entity_count());
    assert_eq!(relations.len(), snapshot.relation_count());
    for (stored, live) in entities.iter().zip(snapshot.registry().iter()) {
        assert_eq!(stored.id, live.id);
        assert_eq!(stored.data, live.data);
    }
}

#[test]
fn failed_records_write_nothing() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let graph = CitationGraph::with_store(store.clone());
    graph.ingest_paper(&PaperRecord::new("A").with_authors("Alice")).unwrap();
    let before = store.load_relations().unwrap().len();

    assert!(graph.ingest_paper(&PaperRecord::new("")).is_err());
    assert!(graph.ingest_paper(&PaperRecord::new("Alice").citing("A")).is_err());

    assert_eq!(store.load_entities().unwrap().len(), 2);
    assert_eq!(store.load_relations().unwrap().len(), before);
}

#[test]
fn hydrate_refuses_a_populated_graph() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let graph = CitationGraph::with_store(store);
    graph.ingest_paper(&PaperRecord::new("A")).unwrap();

    let err = graph.hydrate().unwrap_err();
    assert!(matches!(err, GraphError::Validation(_)));
    assert_eq!(graph.entity_count(), 1);
}

#[test]
fn store_receives_commits_in_order() {
    let inner = Arc::new(SqliteStore::open_in_memory().unwrap());
    let (started, first_delivery) = mpsc::channel();
    let graph = Arc::new(CitationGraph::with_store(Arc::new(StallingStore::new(
        inner.clone(),
        started,
    ))));

    let first = {
        let graph = Arc::clone(&graph);
        thread::spawn(move || {
            graph
                .ingest_paper(&PaperRecord::new("A").with_authors("Alice"))
                .unwrap();
        })
    };
    // A is committed and its delivery is stalled; B references it
    first_delivery.recv().unwrap();
    graph
        .ingest_paper(&PaperRecord::new("B").with_authors("Alice").citing("A"))
        .unwrap();
    first.join().unwrap();

    let reloaded = CitationGraph::with_store(inner);
    reloaded.hydrate().unwrap();
    assert_eq!(reloaded.full_graph(), graph.full_graph());
}

#[test]
fn concurrent_writers_leave_a_loadable_store() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let graph = Arc::new(CitationGraph::with_store(store.clone()));

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let graph = Arc::clone(&graph);
            thread::spawn(move || {
                for i in 0..25 {
                    let mut record = PaperRecord::new(format!("w{}-{}", w, i))
                        .with_authors(format!("Author {}, Shared", w))
                        .with_journal(format!("Journal {}", i % 3));
                    if i > 0 {
                        record = record.citing(format!("w{}-{}, w{}-{}", (w + 1) % 4, i, w, i - 1));
                    }
                    graph.ingest_paper(&record).unwrap();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let reloaded = CitationGraph::with_store(store);
    reloaded.hydrate().unwrap();
    assert_eq!(reloaded.full_graph(), graph.full_graph());
    assert_eq!(reloaded.papers_by_author("Shared").len(), 100);
}

#[test]
fn gapped_store_is_rejected_whole() {
    let source = CitationGraph::new();
    for title in ["A", "B", "C"] {
        source.ingest_paper(&PaperRecord::new(title)).unwrap();
    }
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    store.save_entity(&source.entity("A").unwrap()).unwrap();
    store.save_entity(&source.entity("C").unwrap()).unwrap();

    let graph = CitationGraph::with_store(store.clone());
    let err = graph.hydrate().unwrap_err();
    assert!(matches!(err, GraphError::Storage(StorageError::Corrupt(_))));
    assert_eq!(graph.entity_count(), 0);
    assert_eq!(store.load_entities().unwrap().len(), 2);
}
