//! Entity representation: papers, authors and journals

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identity key of an entity
///
/// The key is the trimmed display string (a paper's title, an author's or a
/// journal's name). Serializes as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Normalize a display string into an identity key
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    /// Wrap an already-normalized key (used when loading from storage)
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::normalize(s)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self::normalize(&s)
    }
}

/// The three entity variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Paper,
    Author,
    Journal,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paper => "paper",
            Self::Author => "author",
            Self::Journal => "journal",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paper" => Ok(Self::Paper),
            "author" => Ok(Self::Author),
            "journal" => Ok(Self::Journal),
            other => Err(format!("unknown entity kind: {}", other)),
        }
    }
}

/// Returns the trimmed value, or `None` when nothing is left
pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Paper attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Author names exactly as submitted, for display
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    /// True while the paper only exists because another paper cited it
    #[serde(default)]
    pub stub: bool,
}

impl Paper {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// A citation placeholder carrying only the title
    pub fn stub(title: impl Into<String>) -> Self {
        Self {
            stub: true,
            ..Self::new(title)
        }
    }

    /// Set the year; blank values are treated as absent
    pub fn with_year(mut self, year: Option<&str>) -> Self {
        self.year = non_empty(year);
        self
    }

    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    /// Set the journal; blank values are treated as absent
    pub fn with_journal(mut self, journal: Option<&str>) -> Self {
        self.journal = non_empty(journal);
        self
    }

    /// Merge incoming attributes into this paper.
    ///
    /// Non-empty incoming values overwrite; absent or empty values never
    /// erase what is already stored. A stub stays a stub only while every
    /// upsert it has seen was a stub.
    pub fn merge(&mut self, incoming: Paper) {
        if incoming.year.is_some() {
            self.year = incoming.year;
        }
        if !incoming.authors.is_empty() {
            self.authors = incoming.authors;
        }
        if incoming.journal.is_some() {
            self.journal = incoming.journal;
        }
        self.stub = self.stub && incoming.stub;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    pub name: String,
}

/// Attributes of an entity, one variant per kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntityData {
    Paper(Paper),
    Author(Author),
    Journal(Journal),
}

impl EntityData {
    pub fn author(name: impl Into<String>) -> Self {
        Self::Author(Author { name: name.into() })
    }

    pub fn journal(name: impl Into<String>) -> Self {
        Self::Journal(Journal { name: name.into() })
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Paper(_) => EntityKind::Paper,
            Self::Author(_) => EntityKind::Author,
            Self::Journal(_) => EntityKind::Journal,
        }
    }

    /// Merge same-kind attributes. Returns false (and changes nothing) when
    /// the kinds differ.
    pub(crate) fn merge(&mut self, incoming: EntityData) -> bool {
        match (self, incoming) {
            (Self::Paper(existing), Self::Paper(incoming)) => {
                existing.merge(incoming);
                true
            }
            // Names are the identity key, so there is nothing else to merge
            (Self::Author(_), Self::Author(_)) | (Self::Journal(_), Self::Journal(_)) => true,
            _ => false,
        }
    }
}

/// Registration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    /// First-seen order across the whole registry, starting at 0
    pub seq: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A node in the citation graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub data: EntityData,
    pub metadata: EntityMetadata,
}

impl Entity {
    pub(crate) fn new(id: EntityId, data: EntityData, seq: usize) -> Self {
        let now = Utc::now();
        Self {
            id,
            data,
            metadata: EntityMetadata {
                seq,
                created_at: now,
                updated_at: now,
            },
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.data.kind()
    }

    pub fn as_paper(&self) -> Option<&Paper> {
        match &self.data {
            EntityData::Paper(p) => Some(p),
            _ => None,
        }
    }
}
