//! Delimited result files.
//!
//! Each table gets three files: accepted rows, unresolved duplicates and
//! resolved duplicates. Rows in one bucket may carry different columns, so
//! the header is the union of all columns in first-seen order and absent
//! cells are written as the missing sentinel.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use remap_model::{Bucket, MISSING_SENTINEL, Record, ResultStore, TableResultSet};
use tracing::{debug, info};

use crate::error::{OutputError, Result};

/// Files written for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOutputs {
    pub table: String,
    pub accepted: PathBuf,
    pub duplicates_unresolved: PathBuf,
    pub duplicates_resolved: PathBuf,
}

/// File name of a table's bucket.
pub fn bucket_file_name(table: &str, bucket: Bucket) -> String {
    match bucket {
        Bucket::Accepted => format!("{table}.csv"),
        Bucket::DuplicatesUnresolved => format!("{table}_duplicates.csv"),
        Bucket::DuplicatesResolved => format!("{table}_duplicates_resolved.csv"),
    }
}

/// Union of the rows' columns, in first-seen order.
pub fn union_header(rows: &[Record]) -> Vec<String> {
    let mut header: Vec<String> = Vec::new();
    for row in rows {
        for column in row.columns() {
            if !header.iter().any(|existing| existing == column) {
                header.push(column.to_string());
            }
        }
    }
    header
}

/// Write `rows` as CSV. No rows writes nothing at all.
pub fn write_rows<W: Write>(writer: W, rows: &[Record]) -> csv::Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let header = union_header(rows);
    let mut csv = WriterBuilder::new().from_writer(writer);
    csv.write_record(&header)?;
    for row in rows {
        let fields: Vec<String> = header
            .iter()
            .map(|column| {
                row.get(column)
                    .map_or_else(|| MISSING_SENTINEL.to_string(), |value| value.as_text().into_owned())
            })
            .collect();
        csv.write_record(&fields)?;
    }
    csv.flush()?;
    Ok(())
}

fn write_bucket(dir: &Path, set: &TableResultSet, bucket: Bucket) -> Result<PathBuf> {
    let path = dir.join(bucket_file_name(&set.table, bucket));
    let file = File::create(&path).map_err(|source| OutputError::Io {
        path: path.clone(),
        source,
    })?;
    let rows = set.bucket(bucket);
    write_rows(BufWriter::new(file), rows).map_err(|source| OutputError::Csv {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), rows = rows.len(), bucket = bucket.label(), "wrote bucket");
    Ok(path)
}

/// Write every table of `results` into `dir`, replacing existing files.
pub fn write_results(dir: &Path, results: &ResultStore) -> Result<Vec<TableOutputs>> {
    fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut outputs = Vec::new();
    for set in results.iter() {
        outputs.push(TableOutputs {
            table: set.table.clone(),
            accepted: write_bucket(dir, set, Bucket::Accepted)?,
            duplicates_unresolved: write_bucket(dir, set, Bucket::DuplicatesUnresolved)?,
            duplicates_resolved: write_bucket(dir, set, Bucket::DuplicatesResolved)?,
        });
    }
    info!(dir = %dir.display(), tables = outputs.len(), "results written");
    Ok(outputs)
}
