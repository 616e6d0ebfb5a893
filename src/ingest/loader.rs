//! Record files: a JSON array of records, or a CSV table with one row per
//! paper
//!
//! CSV columns are matched by header name (`title`, `authors`, `journal`,
//! `year`, `cited_papers`); missing columns read as empty and unknown ones
//! are ignored. Author and citation cells are comma-delimited lists.

use super::record::{NameList, PaperRecord};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors from reading a record file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON records in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid CSV records in '{}': {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
}

/// Record file formats, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Csv,
}

impl RecordFormat {
    /// `.csv` (any case) is CSV; everything else is read as JSON
    pub fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

/// One CSV row, every cell optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    title: String,
    authors: String,
    journal: String,
    year: String,
    cited_papers: String,
}

impl From<CsvRow> for PaperRecord {
    fn from(row: CsvRow) -> Self {
        let filled = |cell: String| (!cell.is_empty()).then_some(cell);
        PaperRecord {
            title: row.title,
            year: filled(row.year),
            authors: NameList::Delimited(row.authors),
            journal: filled(row.journal),
            cited_papers: NameList::Delimited(row.cited_papers),
        }
    }
}

/// Read every record in `path`, in file order
pub fn read_records(path: &Path) -> Result<Vec<PaperRecord>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let format = RecordFormat::of(path);

    let records = match format {
        RecordFormat::Csv => records_from_csv(reader).map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?,
        RecordFormat::Json => records_from_json(reader).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?,
    };
    debug!(path = %path.display(), ?format, records = records.len(), "read record file");
    Ok(records)
}

/// Records from a CSV table with a header row. Cells are trimmed.
pub fn records_from_csv<R: Read>(reader: R) -> Result<Vec<PaperRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    reader
        .deserialize::<CsvRow>()
        .map(|row| row.map(PaperRecord::from))
        .collect()
}

/// Records from a JSON array
pub fn records_from_json<R: Read>(reader: R) -> Result<Vec<PaperRecord>, serde_json::Error> {
    serde_json::from_reader(reader)
}
