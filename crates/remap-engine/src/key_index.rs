use std::collections::HashMap;

use remap_model::Value;

/// Renumbering counters per composite primary key.
///
/// Counters start at 1 on the first collision of a key and only grow for the
/// lifetime of a run.
#[derive(Debug, Clone, Default)]
pub struct DuplicateKeyIndex {
    counters: HashMap<String, u32>,
}

impl DuplicateKeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table name followed by the key values, joined with `|`.
    pub fn composite_key<'v>(table: &str, values: impl IntoIterator<Item = &'v Value>) -> String {
        let mut key = table.to_string();
        for value in values {
            key.push('|');
            key.push_str(&value.as_text());
        }
        key
    }

    /// Advance and return the counter for `key`.
    pub fn next(&mut self, key: String) -> u32 {
        let counter = self.counters.entry(key).or_insert(0);
        *counter += 1;
        *counter
    }

    pub fn get(&self, key: &str) -> Option<u32> {
        self.counters.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}
