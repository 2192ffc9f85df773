//! Per-table output buckets.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::record::Record;

/// Field prefix for colliding in-progress rows attached to unresolved duplicates.
pub const IN_PROGRESS_PREFIX: &str = "output_";
/// Field prefix for colliding reference rows attached to unresolved duplicates.
pub const REFERENCE_PREFIX: &str = "db_";

/// The bucket a produced record lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    Accepted,
    DuplicatesResolved,
    DuplicatesUnresolved,
}

impl Bucket {
    pub fn label(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::DuplicatesResolved => "duplicates_resolved",
            Self::DuplicatesUnresolved => "duplicates_unresolved",
        }
    }
}

/// Append-only result buckets of one target table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableResultSet {
    pub table: String,
    pub accepted: Vec<Record>,
    pub duplicates_resolved: Vec<Record>,
    pub duplicates_unresolved: Vec<Record>,
}

impl TableResultSet {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, bucket: Bucket, record: Record) {
        match bucket {
            Bucket::Accepted => self.accepted.push(record),
            Bucket::DuplicatesResolved => self.duplicates_resolved.push(record),
            Bucket::DuplicatesUnresolved => self.duplicates_unresolved.push(record),
        }
    }

    pub fn bucket(&self, bucket: Bucket) -> &[Record] {
        match bucket {
            Bucket::Accepted => &self.accepted,
            Bucket::DuplicatesResolved => &self.duplicates_resolved,
            Bucket::DuplicatesUnresolved => &self.duplicates_unresolved,
        }
    }

    pub fn total(&self) -> usize {
        self.accepted.len() + self.duplicates_resolved.len() + self.duplicates_unresolved.len()
    }
}

/// Result sets for every table of a run, kept in processing order.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    sets: Vec<TableResultSet>,
    index: HashMap<String, usize>,
}

impl ResultStore {
    /// Create empty result sets for `tables`, in the given order.
    pub fn new<I, S>(tables: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self::default();
        for table in tables {
            let table = table.into();
            if store.index.contains_key(&table) {
                return Err(ModelError::DuplicateTable(table));
            }
            store.index.insert(table.clone(), store.sets.len());
            store.sets.push(TableResultSet::new(table));
        }
        Ok(store)
    }

    pub fn get(&self, table: &str) -> Option<&TableResultSet> {
        self.index.get(table).map(|&idx| &self.sets[idx])
    }

    pub fn get_mut(&mut self, table: &str) -> Result<&mut TableResultSet> {
        match self.index.get(table) {
            Some(&idx) => Ok(&mut self.sets[idx]),
            None => Err(ModelError::UnknownTable(table.to_string())),
        }
    }

    /// Accepted rows of `table`; empty for a table outside the run.
    pub fn accepted(&self, table: &str) -> &[Record] {
        self.get(table).map_or(&[], |set| set.accepted.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableResultSet> {
        self.sets.iter()
    }
}
