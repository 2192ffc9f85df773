use serde::{Deserialize, Serialize};

use crate::value::Value;

/// An ordered column -> value mapping.
///
/// Column order is insertion order; inserting an existing column replaces its
/// value in place. Records are small (one row of one table), so lookups are a
/// linear scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Value of `column`, treating an absent column as missing.
    pub fn value_or_missing(&self, column: &str) -> &Value {
        const MISSING: &Value = &Value::Missing;
        self.get(column).unwrap_or(MISSING)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        if let Some(slot) = self.fields.iter_mut().find(|(name, _)| *name == column) {
            slot.1 = value;
        } else {
            self.fields.push((column, value));
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_preserves_order_and_overwrites() {
        let mut record = Record::new();
        record.insert("B", "1");
        record.insert("A", "2");
        record.insert("B", "3");
        let columns: Vec<&str> = record.columns().collect();
        assert_eq!(columns, vec!["B", "A"]);
        assert_eq!(record.get("B"), Some(&Value::from("3")));
    }

    #[test]
    fn absent_column_reads_as_missing() {
        let record: Record = [("A", "x")].into_iter().collect();
        assert_eq!(record.value_or_missing("Z"), &Value::Missing);
    }
}
