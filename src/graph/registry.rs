//! Entity registry: identity and attributes, in first-seen order

use super::engine::{GraphError, GraphResult};
use super::entity::{Entity, EntityData, EntityId, EntityKind};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;

/// Handle returned by [`EntityRegistry::upsert`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRef {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Registration order of the entity
    pub seq: usize,
    /// Whether this upsert created the entity
    pub created: bool,
}

/// Total mapping from identity key to entity.
///
/// Lifecycle is create-or-merge; entities are never removed, so a position
/// in `entities` doubles as the registration sequence number.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the entity, or merge `data` into the existing one.
    ///
    /// Reusing a key with a different kind is a [`GraphError::TypeConflict`]
    /// and leaves the registry unchanged.
    pub fn upsert(&mut self, id: EntityId, data: EntityData) -> GraphResult<EntityRef> {
        if id.is_empty() {
            return Err(GraphError::Validation(format!(
                "{} key must not be empty",
                data.kind()
            )));
        }

        let requested = data.kind();
        if let Some(&pos) = self.index.get(&id) {
            let entity = &mut self.entities[pos];
            let existing = entity.kind();
            if !entity.data.merge(data) {
                return Err(GraphError::TypeConflict {
                    key: id,
                    existing,
                    requested,
                });
            }
            entity.metadata.updated_at = Utc::now();
            return Ok(EntityRef {
                id,
                kind: existing,
                seq: pos,
                created: false,
            });
        }

        let seq = self.entities.len();
        self.entities.push(Entity::new(id.clone(), data, seq));
        self.index.insert(id.clone(), seq);
        Ok(EntityRef {
            id,
            kind: requested,
            seq,
            created: true,
        })
    }

    /// Append an entity loaded from storage, keeping its attributes,
    /// timestamps and sequence number. The sequence number must be the next
    /// free position.
    pub(crate) fn restore(&mut self, entity: Entity) -> GraphResult<()> {
        if let Some(existing) = self.get(&entity.id) {
            return Err(GraphError::TypeConflict {
                key: entity.id.clone(),
                existing: existing.kind(),
                requested: entity.kind(),
            });
        }
        let seq = self.entities.len();
        if entity.metadata.seq != seq {
            return Err(GraphError::Validation(format!(
                "entity '{}' has sequence {}, expected {}",
                entity.id, entity.metadata.seq, seq
            )));
        }
        self.index.insert(entity.id.clone(), seq);
        self.entities.push(entity);
        Ok(())
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.index.get(id).map(|&pos| &self.entities[pos])
    }

    pub fn kind_of(&self, id: &EntityId) -> Option<EntityKind> {
        self.get(id).map(Entity::kind)
    }

    /// Entities of one kind, in registration order
    pub fn list(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.kind() == kind)
    }

    /// All entities, in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.list(kind).count()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
