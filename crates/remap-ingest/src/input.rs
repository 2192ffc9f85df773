//! Streaming reader for the legacy input file.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{Reader, StringRecord};
use remap_model::Record;

use crate::csv_files::{open_reader, to_record};
use crate::error::{IngestError, Result};

/// Yields input records one at a time, in file order.
pub struct InputReader {
    path: PathBuf,
    reader: Reader<File>,
    headers: StringRecord,
    row: StringRecord,
    position: u64,
}

impl InputReader {
    pub fn open(path: &Path) -> Result<Self> {
        let mut reader = open_reader(path)?;
        let headers = reader
            .headers()
            .map_err(|source| IngestError::csv(path, source))?
            .clone();
        Ok(Self {
            path: path.to_path_buf(),
            reader,
            headers,
            row: StringRecord::new(),
            position: 0,
        })
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter()
    }

    /// Records read so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read the next record, or `None` at end of file.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        let has_row = self
            .reader
            .read_record(&mut self.row)
            .map_err(|source| IngestError::InputRecord {
                path: self.path.clone(),
                position: self.position + 1,
                source,
            })?;
        if !has_row {
            return Ok(None);
        }
        self.position += 1;
        Ok(Some(to_record(&self.headers, &self.row)))
    }
}

impl Iterator for InputReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Number of records in an input file, for progress reporting.
pub fn count_records(path: &Path) -> Result<u64> {
    let mut reader = open_reader(path)?;
    let mut row = StringRecord::new();
    let mut count = 0;
    while reader
        .read_record(&mut row)
        .map_err(|source| IngestError::InputRecord {
            path: path.to_path_buf(),
            position: count + 1,
            source,
        })?
    {
        count += 1;
    }
    Ok(count)
}
