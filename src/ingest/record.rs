//! Input records as handed over by transports and file loaders

use serde::{Deserialize, Deserializer, Serialize};

/// A list of names, submitted either as one comma-delimited string or as
/// a list. Both forms normalize identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameList {
    Delimited(String),
    List(Vec<String>),
}

impl Default for NameList {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl NameList {
    /// Trimmed, non-empty names in submission order
    pub fn names(&self) -> Vec<String> {
        let trimmed = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        match self {
            Self::Delimited(s) => s.split(',').filter_map(trimmed).collect(),
            Self::List(items) => items.iter().filter_map(|s| trimmed(s)).collect(),
        }
    }

    /// The submitted entries, untouched. A delimited string is split on
    /// commas without trimming; an empty string yields no entries.
    pub fn verbatim(&self) -> Vec<String> {
        match self {
            Self::Delimited(s) if s.is_empty() => Vec::new(),
            Self::Delimited(s) => s.split(',').map(str::to_string).collect(),
            Self::List(items) => items.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }
}

impl From<&str> for NameList {
    fn from(s: &str) -> Self {
        Self::Delimited(s.to_string())
    }
}

impl From<String> for NameList {
    fn from(s: String) -> Self {
        Self::Delimited(s)
    }
}

impl From<Vec<String>> for NameList {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for NameList {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

/// One paper submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    #[serde(default)]
    pub title: String,
    #[serde(
        default,
        deserialize_with = "deserialize_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "deserialize_names")]
    pub authors: NameList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(default, deserialize_with = "deserialize_names")]
    pub cited_papers: NameList,
}

impl PaperRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_authors(mut self, authors: impl Into<NameList>) -> Self {
        self.authors = authors.into();
        self
    }

    pub fn with_journal(mut self, journal: impl Into<String>) -> Self {
        self.journal = Some(journal.into());
        self
    }

    pub fn citing(mut self, cited: impl Into<NameList>) -> Self {
        self.cited_papers = cited.into();
        self
    }
}

/// Years arrive as strings or bare numbers
fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Year>::deserialize(deserializer)?.map(|year| match year {
        Year::Text(s) => s,
        Year::Int(n) => n.to_string(),
        Year::Float(n) => n.to_string(),
    }))
}

/// `null` is accepted as an empty list
fn deserialize_names<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NameList, D::Error> {
    Ok(Option::<NameList>::deserialize(deserializer)?.unwrap_or_default())
}
