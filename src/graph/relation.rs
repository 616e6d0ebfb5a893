//! Typed, directed relations between entities

use super::entity::{EntityId, EntityKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The three relation types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    /// author → paper
    Wrote,
    /// paper → journal
    PublishedIn,
    /// paper → cited paper
    Cites,
}

impl RelationType {
    pub const ALL: [RelationType; 3] = [Self::Wrote, Self::PublishedIn, Self::Cites];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrote => "WROTE",
            Self::PublishedIn => "PUBLISHED_IN",
            Self::Cites => "CITES",
        }
    }

    /// Entity kinds the relation connects, as (source, target)
    pub fn endpoints(&self) -> (EntityKind, EntityKind) {
        match self {
            Self::Wrote => (EntityKind::Author, EntityKind::Paper),
            Self::PublishedIn => (EntityKind::Paper, EntityKind::Journal),
            Self::Cites => (EntityKind::Paper, EntityKind::Paper),
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown relation type: {}", s))
    }
}

/// A directed edge. Never deduplicated: adding the same
/// (source, target, relation) twice stores two records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Insertion order across the whole store, starting at 0
    pub seq: usize,
    pub source: EntityId,
    pub target: EntityId,
    pub relation: RelationType,
    pub created_at: DateTime<Utc>,
}

impl Relation {
    pub(crate) fn new(
        seq: usize,
        source: EntityId,
        target: EntityId,
        relation: RelationType,
    ) -> Self {
        Self {
            seq,
            source,
            target,
            relation,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_type_parses_its_own_names() {
        for rel in RelationType::ALL {
            assert_eq!(rel.as_str().parse::<RelationType>().unwrap(), rel);
        }
        assert!("cites".parse::<RelationType>().is_err());
    }

    #[test]
    fn endpoints_follow_direction() {
        assert_eq!(
            RelationType::Wrote.endpoints(),
            (EntityKind::Author, EntityKind::Paper)
        );
        assert_eq!(
            RelationType::PublishedIn.endpoints(),
            (EntityKind::Paper, EntityKind::Journal)
        );
    }
}
