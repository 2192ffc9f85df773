//! Header-keyed CSV files: rules, filters, table list, modifiers, lookups.
//!
//! Numeric cells are cast to numbers; other cells are passed through
//! untrimmed, and normalization happens in the engine.
//! Missing columns read as empty strings and blank lines are skipped.

use std::fs::File;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};
use remap_model::{Record, Value};
use serde::de::DeserializeOwned;

use crate::error::{IngestError, Result};

/// Open a CSV file with headers cleaned of byte-order marks and padding.
pub(crate) fn open_reader(path: &Path) -> Result<Reader<File>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::csv(path, source))?;
    let headers = clean_headers(
        reader
            .headers()
            .map_err(|source| IngestError::csv(path, source))?,
    );
    reader.set_headers(headers);
    Ok(reader)
}

fn clean_headers(headers: &StringRecord) -> StringRecord {
    headers
        .iter()
        .map(|header| header.trim_matches('\u{feff}').trim())
        .collect()
}

/// Deserialize every row of `path` into `T`.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = open_reader(path)?;
    reader
        .deserialize()
        .map(|row| row.map_err(|source| IngestError::csv(path, source)))
        .collect()
}

/// Like [`read_records`], but a file that does not exist reads as empty.
pub fn read_optional_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if path.exists() {
        read_records(path)
    } else {
        Ok(Vec::new())
    }
}

/// Read every row of `path` as a record keyed by header.
pub fn read_rows(path: &Path) -> Result<Vec<Record>> {
    let mut reader = open_reader(path)?;
    let headers = reader
        .headers()
        .map_err(|source| IngestError::csv(path, source))?
        .clone();
    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|source| IngestError::csv(path, source))?;
        rows.push(to_record(&headers, &row));
    }
    Ok(rows)
}

/// Pair each field with its header; fields beyond the header row are dropped.
pub(crate) fn to_record(headers: &StringRecord, row: &StringRecord) -> Record {
    headers
        .iter()
        .zip(row.iter())
        .map(|(header, field)| (header, Value::from_cell(field)))
        .collect()
}
