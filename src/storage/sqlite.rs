//! SQLite storage backend

use super::traits::{GraphStore, OpenStore, StorageError, StorageResult};
use crate::graph::{
    Entity, EntityData, EntityId, EntityKind, EntityMetadata, GraphEvent, Relation, RelationType,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// SQLite-backed graph store
///
/// One table per graph component. Entity keys are unique across kinds,
/// mirroring the in-memory registry; relations are keyed by their sequence
/// number and reference both endpoints. Writing a second relation or a
/// different entity under a sequence number already in use is an error.
/// Thread-safe via an internal mutex on the connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Initialize the database schema
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            -- Entities table: one row per paper, author or journal
            CREATE TABLE IF NOT EXISTS entities (
                key TEXT PRIMARY KEY,
                kind TEXT NOT NULL CHECK (kind IN ('paper', 'author', 'journal')),
                seq INTEGER NOT NULL UNIQUE,
                data_json TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_entities_kind
                ON entities(kind, seq);

            -- Relations table: append-only, parallel edges allowed
            CREATE TABLE IF NOT EXISTS relations (
                seq INTEGER PRIMARY KEY,
                source_key TEXT NOT NULL,
                target_key TEXT NOT NULL,
                relation TEXT NOT NULL CHECK (relation IN ('WROTE', 'PUBLISHED_IN', 'CITES')),
                created_at TEXT NOT NULL,
                FOREIGN KEY (source_key) REFERENCES entities(key),
                FOREIGN KEY (target_key) REFERENCES entities(key)
            );

            -- Indexes for edge traversal by type
            CREATE INDEX IF NOT EXISTS idx_relations_source
                ON relations(source_key, relation);
            CREATE INDEX IF NOT EXISTS idx_relations_target
                ON relations(target_key, relation);

            -- Enable foreign keys
            PRAGMA foreign_keys = ON;

            -- Enable WAL mode for concurrent reads during writes
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn upsert_entity(conn: &Connection, entity: &Entity) -> StorageResult<()> {
        let data_json = serde_json::to_string(&entity.data)?;
        conn.execute(
            r#"
            INSERT INTO entities (key, kind, seq, data_json, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(key) DO UPDATE SET
                kind = excluded.kind,
                data_json = excluded.data_json,
                updated_at = excluded.updated_at
            "#,
            params![
                entity.id.as_str(),
                entity.kind().as_str(),
                entity.metadata.seq as i64,
                data_json,
                entity.metadata.created_at.to_rfc3339(),
                entity.metadata.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn insert_relation(conn: &Connection, relation: &Relation) -> StorageResult<()> {
        conn.execute(
            r#"
            INSERT INTO relations (seq, source_key, target_key, relation, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                relation.seq as i64,
                relation.source.as_str(),
                relation.target.as_str(),
                relation.relation.as_str(),
                relation.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn parse_date(value: &str) -> StorageResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| StorageError::DateParse(e.to_string()))
    }

    fn parse_seq(value: i64) -> StorageResult<usize> {
        usize::try_from(value)
            .map_err(|_| StorageError::Corrupt(format!("negative sequence number {}", value)))
    }

    /// Deserialize an entity from database columns
    fn row_to_entity(
        key: String,
        kind: String,
        seq: i64,
        data_json: String,
        created_at: String,
        updated_at: String,
    ) -> StorageResult<Entity> {
        let data: EntityData = serde_json::from_str(&data_json)?;
        let kind: EntityKind = kind.parse().map_err(StorageError::Corrupt)?;
        if data.kind() != kind {
            return Err(StorageError::Corrupt(format!(
                "entity '{}' has kind column {} but {} data",
                key,
                kind,
                data.kind()
            )));
        }
        Ok(Entity {
            id: EntityId::from_string(key),
            data,
            metadata: EntityMetadata {
                seq: Self::parse_seq(seq)?,
                created_at: Self::parse_date(&created_at)?,
                updated_at: Self::parse_date(&updated_at)?,
            },
        })
    }

    /// Deserialize a relation from database columns
    fn row_to_relation(
        seq: i64,
        source: String,
        target: String,
        relation: String,
        created_at: String,
    ) -> StorageResult<Relation> {
        let relation: RelationType = relation.parse().map_err(StorageError::Corrupt)?;
        Ok(Relation {
            seq: Self::parse_seq(seq)?,
            source: EntityId::from_string(source),
            target: EntityId::from_string(target),
            relation,
            created_at: Self::parse_date(&created_at)?,
        })
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl GraphStore for SqliteStore {
    fn save_entity(&self, entity: &Entity) -> StorageResult<()> {
        Self::upsert_entity(&self.conn(), entity)
    }

    fn save_relation(&self, relation: &Relation) -> StorageResult<()> {
        Self::insert_relation(&self.conn(), relation)
    }

    fn load_entities(&self) -> StorageResult<Vec<Entity>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT key, kind, seq, data_json, created_at, updated_at FROM entities ORDER BY seq",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut entities = Vec::new();
        for row in rows {
            let (key, kind, seq, data_json, created_at, updated_at) = row?;
            entities.push(Self::row_to_entity(key, kind, seq, data_json, created_at, updated_at)?);
        }
        Ok(entities)
    }

    fn load_relations(&self) -> StorageResult<Vec<Relation>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT seq, source_key, target_key, relation, created_at FROM relations ORDER BY seq",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut relations = Vec::new();
        for row in rows {
            let (seq, source, target, relation, created_at) = row?;
            relations.push(Self::row_to_relation(seq, source, target, relation, created_at)?);
        }
        Ok(relations)
    }

    /// Applies the whole batch in one transaction
    fn apply(&self, events: &[GraphEvent]) -> StorageResult<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        for event in events {
            match event {
                GraphEvent::EntityUpserted(entity) => Self::upsert_entity(&tx, entity)?,
                GraphEvent::RelationAdded(relation) => Self::insert_relation(&tx, relation)?,
            }
        }
        tx.commit()?;
        Ok(())
    }
}
