//! Paper ingestion: one record becomes registry and relation store mutations
//!
//! Steps, in order, with no rollback (each mutation stays committed even if
//! a later step fails):
//! 1. Upsert the paper
//! 2. Upsert each author, then `WROTE(author → paper)`
//! 3. Upsert the journal, then `PUBLISHED_IN(paper → journal)`
//! 4. Create a stub for each unknown cited title, then `CITES(paper → cited)`

use super::record::PaperRecord;
use super::report::{BatchReport, IngestReport, Rejection};
use crate::graph::{
    non_empty, CitationGraph, EntityData, EntityId, EntityKind, Graph, GraphError, GraphEvent,
    GraphResult, Paper, RelationType,
};
use tracing::{debug, info, warn};

/// Mutations applied so far for one record
struct Applied {
    report: IngestReport,
    events: Vec<GraphEvent>,
}

impl Applied {
    fn new(paper_id: EntityId) -> Self {
        Self {
            report: IngestReport::new(paper_id),
            events: Vec::new(),
        }
    }

    fn upsert(&mut self, graph: &mut Graph, id: EntityId, data: EntityData) -> GraphResult<()> {
        let entity_ref = graph.upsert_entity(id, data)?;
        debug!(
            key = %entity_ref.id,
            kind = %entity_ref.kind,
            created = entity_ref.created,
            "upserted entity"
        );
        if entity_ref.created {
            self.report.entities_created += 1;
        }
        if let Some(entity) = graph.entity(&entity_ref.id) {
            self.events.push(GraphEvent::EntityUpserted(entity.clone()));
        }
        Ok(())
    }

    /// Upsert, turning a type conflict into a rejection. Returns whether the
    /// entity is now usable as a relation endpoint.
    fn upsert_or_reject(
        &mut self,
        graph: &mut Graph,
        id: EntityId,
        data: EntityData,
    ) -> GraphResult<bool> {
        match self.upsert(graph, id, data) {
            Ok(()) => Ok(true),
            Err(GraphError::TypeConflict {
                key,
                existing,
                requested,
            }) => {
                self.reject(Rejection {
                    key,
                    requested,
                    existing,
                });
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn reject(&mut self, rejection: Rejection) {
        warn!(paper = %self.report.paper_id, "{}", rejection);
        self.report.rejections.push(rejection);
    }

    fn relate(
        &mut self,
        graph: &mut Graph,
        source: &EntityId,
        target: &EntityId,
        relation: RelationType,
    ) -> GraphResult<()> {
        let added = graph.add_relation(source, target, relation)?.clone();
        debug!(
            source = %source,
            target = %target,
            relation = %relation,
            seq = added.seq,
            "added relation"
        );
        self.report.edges_created += 1;
        self.events.push(GraphEvent::RelationAdded(added));
        Ok(())
    }
}

fn apply_record(graph: &mut Graph, record: &PaperRecord, applied: &mut Applied) -> GraphResult<()> {
    let paper_id = applied.report.paper_id.clone();
    if paper_id.is_empty() {
        return Err(GraphError::Validation("paper title is required".to_string()));
    }

    let paper = Paper::new(paper_id.as_str())
        .with_year(record.year.as_deref())
        .with_authors(record.authors.verbatim())
        .with_journal(record.journal.as_deref());
    applied.upsert(graph, paper_id.clone(), EntityData::Paper(paper))?;

    for name in record.authors.names() {
        let author = EntityId::normalize(&name);
        if applied.upsert_or_reject(graph, author.clone(), EntityData::author(name))? {
            applied.relate(graph, &author, &paper_id, RelationType::Wrote)?;
        }
    }

    if let Some(name) = non_empty(record.journal.as_deref()) {
        let journal = EntityId::normalize(&name);
        if applied.upsert_or_reject(graph, journal.clone(), EntityData::journal(name))? {
            applied.relate(graph, &paper_id, &journal, RelationType::PublishedIn)?;
        }
    }

    for title in record.cited_papers.names() {
        let cited = EntityId::normalize(&title);
        let usable = match graph.registry().kind_of(&cited) {
            None => {
                let stub = EntityData::Paper(Paper::stub(title));
                applied.upsert_or_reject(graph, cited.clone(), stub)?
            }
            Some(EntityKind::Paper) => true,
            Some(existing) => {
                applied.reject(Rejection {
                    key: cited.clone(),
                    requested: EntityKind::Paper,
                    existing,
                });
                false
            }
        };
        if usable {
            applied.relate(graph, &paper_id, &cited, RelationType::Cites)?;
        }
    }

    Ok(())
}

impl CitationGraph {
    /// Ingest one paper record.
    ///
    /// Holds the write lock for the whole record, so readers never observe
    /// it half-applied. The record's mutations reach the durable store, if
    /// any, after every record committed before it.
    ///
    /// Fails with [`GraphError::Validation`] on a blank title and
    /// [`GraphError::TypeConflict`] when the title belongs to an
    /// author or journal; conflicts on authors, journals and cited titles
    /// are reported as rejections instead.
    pub fn ingest_paper(&self, record: &PaperRecord) -> GraphResult<IngestReport> {
        let mut applied = Applied::new(EntityId::normalize(&record.title));
        let result = self.commit(|graph| {
            let result = apply_record(graph, record, &mut applied);
            (result, std::mem::take(&mut applied.events))
        });

        match result {
            Ok(()) => {
                let report = applied.report;
                info!(
                    paper = %report.paper_id,
                    entities_created = report.entities_created,
                    edges_created = report.edges_created,
                    rejections = report.rejections.len(),
                    "ingested paper"
                );
                Ok(report)
            }
            Err(e) => {
                warn!(title = %record.title.trim(), error = %e, "paper record not ingested");
                Err(e)
            }
        }
    }

    /// Ingest records in input order, locking per record.
    ///
    /// A failing record is skipped and listed in the report; it never stops
    /// the rest of the batch.
    pub fn ingest_batch<'a>(
        &self,
        records: impl IntoIterator<Item = &'a PaperRecord>,
    ) -> BatchReport {
        let mut batch = BatchReport::default();
        for (index, record) in records.into_iter().enumerate() {
            match self.ingest_paper(record) {
                Ok(report) => batch.record(report),
                Err(e) => batch.fail(index, record.title.trim(), e),
            }
        }
        info!(
            processed = batch.processed,
            skipped = batch.skipped,
            edges_created = batch.edges_created,
            "batch ingestion finished"
        );
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{GraphStore, OpenStore, SqliteStore};
    use std::sync::Arc;

    #[test]
    fn blank_title_is_a_validation_error() {
        let graph = CitationGraph::new();
        let err = graph.ingest_paper(&PaperRecord::new("   ")).unwrap_err();
        assert!(matches!(err, GraphError::Validation(_)));
        assert_eq!(graph.entity_count(), 0);
    }

    #[test]
    fn full_record_creates_every_entity_and_edge() {
        let graph = CitationGraph::new();
        let record = PaperRecord::new(" Paper A ")
            .with_year("2020")
            .with_authors("Alice, Bob")
            .with_journal(" Nature ")
            .citing(vec!["Paper B", "Paper C"]);

        let report = graph.ingest_paper(&record).unwrap();

        assert_eq!(report.paper_id.as_str(), "Paper A");
        // paper + 2 authors + journal + 2 stubs
        assert_eq!(report.entities_created, 6);
        // 2 WROTE + 1 PUBLISHED_IN + 2 CITES
        assert_eq!(report.edges_created, 5);
        assert!(report.is_fully_committed());

        let paper = graph.entity("Paper A").unwrap();
        let paper = paper.as_paper().unwrap();
        assert_eq!(paper.journal.as_deref(), Some("Nature"));
        assert_eq!(paper.authors, vec!["Alice".to_string(), " Bob".to_string()]);
        assert!(graph.entity("Paper B").unwrap().as_paper().unwrap().stub);
    }

    #[test]
    fn existing_cited_paper_is_not_overwritten() {
        let graph = CitationGraph::new();
        graph
            .ingest_paper(&PaperRecord::new("B").with_year("1990"))
            .unwrap();
        let report = graph
            .ingest_paper(&PaperRecord::new("A").citing("B"))
            .unwrap();

        assert_eq!(report.entities_created, 1);
        let b = graph.entity("B").unwrap();
        assert_eq!(b.as_paper().unwrap().year.as_deref(), Some("1990"));
        assert!(!b.as_paper().unwrap().stub);
    }

    #[test]
    fn author_colliding_with_paper_is_rejected_not_fatal() {
        let graph = CitationGraph::new();
        graph.ingest_paper(&PaperRecord::new("Turing")).unwrap();

        let report = graph
            .ingest_paper(
                &PaperRecord::new("Computing Machinery")
                    .with_authors("Turing, Church")
                    .with_journal("Mind"),
            )
            .unwrap();

        assert_eq!(report.rejections.len(), 1);
        assert_eq!(report.rejections[0].key.as_str(), "Turing");
        assert_eq!(report.rejections[0].existing, EntityKind::Paper);
        // Church's WROTE and the PUBLISHED_IN edge still landed
        assert_eq!(report.edges_created, 2);
        assert_eq!(graph.entity("Turing").unwrap().kind(), EntityKind::Paper);
    }

    #[test]
    fn cited_title_colliding_with_author_is_rejected() {
        let graph = CitationGraph::new();
        graph
            .ingest_paper(&PaperRecord::new("A").with_authors("Knuth"))
            .unwrap();
        let report = graph
            .ingest_paper(&PaperRecord::new("B").citing("Knuth"))
            .unwrap();

        assert_eq!(report.rejections.len(), 1);
        assert_eq!(report.edges_created, 0);
        assert_eq!(graph.relation_count_of(RelationType::Cites), 0);
    }

    #[test]
    fn title_colliding_with_author_fails_the_record() {
        let graph = CitationGraph::new();
        graph
            .ingest_paper(&PaperRecord::new("A").with_authors("Knuth"))
            .unwrap();
        let err = graph
            .ingest_paper(&PaperRecord::new("Knuth").with_authors("Someone"))
            .unwrap_err();

        assert!(matches!(err, GraphError::TypeConflict { .. }));
        assert!(graph.entity("Someone").is_none());
    }

    #[test]
    fn batch_skips_failures_and_keeps_going() {
        let graph = CitationGraph::new();
        let records = vec![
            PaperRecord::new("A"),
            PaperRecord::new(""),
            PaperRecord::new("B").citing("A"),
        ];

        let batch = graph.ingest_batch(&records);

        assert_eq!(batch.processed, 2);
        assert_eq!(batch.skipped, 1);
        assert_eq!(batch.failures[0].index, 1);
        assert_eq!(graph.count(EntityKind::Paper), 2);
    }

    #[test]
    fn committed_mutations_reach_the_store() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let graph = CitationGraph::with_store(store.clone());
        graph
            .ingest_paper(
                &PaperRecord::new("A")
                    .with_authors("Alice")
                    .citing("B"),
            )
            .unwrap();

        assert_eq!(store.load_entities().unwrap().len(), 3);
        assert_eq!(store.load_relations().unwrap().len(), 2);
    }
}
