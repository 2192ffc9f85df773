//! Equality filters over records.
//!
//! All collision checks and identifier lookups reduce to the same operation:
//! select the rows of a bucket whose columns loosely equal a set of values.
//! An empty filter selects every row.

use remap_model::{IdKey, Record, Value};

use crate::options::KeyFilterMode;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyFilter {
    pairs: Vec<(String, Value)>,
    matches_nothing: bool,
}

impl KeyFilter {
    /// Filter from explicit pairs; pairs with a blank column are dropped.
    pub fn new<I, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, Value)>,
        C: Into<String>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(column, value)| (column.into(), value))
            .filter(|(column, _)| !column.trim().is_empty())
            .collect();
        Self {
            pairs,
            matches_nothing: false,
        }
    }

    /// A filter that selects no row.
    pub fn nothing() -> Self {
        Self {
            pairs: Vec::new(),
            matches_nothing: true,
        }
    }

    /// Primary-key filter built from a candidate's own values.
    ///
    /// Missing key values stay in the filter and match other missing values;
    /// empty text and numeric zero are dropped.
    pub fn primary_key(columns: &[String], candidate: &Record) -> Self {
        Self::new(
            columns
                .iter()
                .map(|column| (column.as_str(), candidate.value_or_missing(column).clone()))
                .filter(|(_, value)| !is_falsy(value)),
        )
    }

    /// Full-record filter: every populated column of the candidate.
    pub fn full_record(candidate: &Record) -> Self {
        Self::new(
            candidate
                .iter()
                .filter(|(_, value)| !value.is_blank_or_zero())
                .map(|(column, value)| (column, value.clone())),
        )
    }

    /// Identifier lookup filter: each key column must equal the normalized
    /// input value of its source field.
    pub fn identifier(keys: &[IdKey], input: &Record, mode: KeyFilterMode) -> Self {
        let mut pairs = Vec::with_capacity(keys.len());
        for key in keys.iter().filter(|key| !key.column.is_empty()) {
            let value = Value::normalize(input.get(&key.source));
            if value.is_blank_or_zero() {
                match mode {
                    KeyFilterMode::IgnoreMissing => continue,
                    KeyFilterMode::RequireAll => return Self::nothing(),
                }
            }
            pairs.push((key.column.clone(), value));
        }
        Self {
            pairs,
            matches_nothing: false,
        }
    }

    pub fn matches_nothing(&self) -> bool {
        self.matches_nothing
    }

    pub fn pairs(&self) -> &[(String, Value)] {
        &self.pairs
    }

    /// Values of the filter in column order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.pairs.iter().map(|(_, value)| value)
    }

    pub fn matches(&self, record: &Record) -> bool {
        !self.matches_nothing
            && self
                .pairs
                .iter()
                .all(|(column, value)| record.value_or_missing(column).loose_eq(value))
    }

    /// Rows of `rows` passing the filter, in their original order.
    pub fn select<'r>(&self, rows: &'r [Record]) -> Vec<&'r Record> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Missing => false,
        Value::Text(text) => text.is_empty(),
        Value::Number(number) => *number == 0.0 || number.is_nan(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs.iter().map(|(k, v)| (*k, Value::from(*v))).collect()
    }

    #[test]
    fn empty_filter_matches_every_row() {
        let rows = vec![record(&[("A", "1")]), record(&[("A", "2")])];
        assert_eq!(KeyFilter::default().select(&rows).len(), 2);
        assert!(KeyFilter::nothing().select(&rows).is_empty());
    }

    #[test]
    fn primary_key_keeps_missing_values() {
        let mut candidate = record(&[("ID", "7")]);
        candidate.insert("Code", Value::Missing);
        let filter =
            KeyFilter::primary_key(&["ID".to_string(), "Code".to_string()], &candidate);
        assert_eq!(filter.pairs().len(), 2);
        let mut other = record(&[("ID", "7")]);
        assert!(filter.matches(&other));
        other.insert("Code", "x");
        assert!(!filter.matches(&other));
    }

    #[test]
    fn identifier_filter_respects_mode() {
        let keys = vec![
            IdKey {
                column: "Owner".to_string(),
                source: "owner_id".to_string(),
            },
            IdKey {
                column: "Site".to_string(),
                source: "site".to_string(),
            },
        ];
        let input = record(&[("owner_id", "4"), ("site", "  ")]);
        let loose = KeyFilter::identifier(&keys, &input, KeyFilterMode::IgnoreMissing);
        assert_eq!(loose.pairs().len(), 1);
        assert!(loose.matches(&record(&[("Owner", "4"), ("Site", "B")])));

        let strict = KeyFilter::identifier(&keys, &input, KeyFilterMode::RequireAll);
        assert!(strict.matches_nothing());
    }

    #[test]
    fn number_matches_numeric_text() {
        let filter = KeyFilter::new([("ID", Value::Number(3.0))]);
        assert!(filter.matches(&record(&[("ID", "3")])));
        assert!(!filter.matches(&record(&[("ID", "3.5")])));
    }
}
