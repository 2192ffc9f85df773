use std::collections::HashMap;

use crate::record::Record;

/// Read-only snapshot of existing target-system tables and lookup tables,
/// keyed by table name.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDataset {
    tables: HashMap<String, Vec<Record>>,
}

impl ReferenceDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a table.
    pub fn insert(&mut self, name: impl Into<String>, rows: Vec<Record>) {
        self.tables.insert(name.into(), rows);
    }

    pub fn with_table(mut self, name: impl Into<String>, rows: Vec<Record>) -> Self {
        self.insert(name, rows);
        self
    }

    /// Rows of `name`; a table that was never loaded reads as empty.
    pub fn rows(&self, name: &str) -> &[Record] {
        self.tables.get(name).map_or(&[], Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}
