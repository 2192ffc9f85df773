//! Table-scoped inclusion predicates.

use remap_model::{FilterKind, Record, TableFilter, Value};

/// Whether `input` takes part in the table the filters belong to.
///
/// Filters are AND-combined and evaluated in order, stopping at the first
/// one that fails. No filters means unconditional inclusion.
pub fn include(input: &Record, filters: &[TableFilter]) -> bool {
    filters.iter().all(|filter| passes(filter, input))
}

/// Evaluate one filter against the normalized value of its column.
pub fn passes(filter: &TableFilter, input: &Record) -> bool {
    let value = Value::normalize(input.get(&filter.column));
    match &filter.kind {
        FilterKind::Equal(expected) => value.loose_eq(&Value::from(expected.as_str())),
        FilterKind::NotEqual(expected) => !value.loose_eq(&Value::from(expected.as_str())),
        FilterKind::Null => is_null(&value),
        FilterKind::NotNull => !is_null(&value),
        FilterKind::Unrecognized(_) => true,
    }
}

fn is_null(value: &Value) -> bool {
    value.is_missing() || value.as_text().trim().is_empty()
}
