//! Property checks for table filters.

use proptest::prelude::*;
use remap_engine::include;
use remap_engine::row_filter::passes;
use remap_model::{FilterKind, Record, TableFilter, Value};

fn arb_record() -> impl Strategy<Value = Record> {
    prop::collection::vec(("[a-c]", "[ xy0-9]{0,3}"), 0..4).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(column, value)| (column, Value::from(value)))
            .collect()
    })
}

fn arb_filter() -> impl Strategy<Value = TableFilter> {
    let kind = prop_oneof![
        "[xy0-9]{1,2}".prop_map(FilterKind::Equal),
        "[xy0-9]{1,2}".prop_map(FilterKind::NotEqual),
        Just(FilterKind::Null),
        Just(FilterKind::NotNull),
    ];
    ("[a-d]", kind).prop_map(|(column, kind)| TableFilter {
        table: "T".to_string(),
        column,
        kind,
    })
}

/// Filter semantics restated over plain strings: a cell is its trimmed
/// text, and blank or absent cells are null.
fn expected_include(record: &Record, filters: &[TableFilter]) -> bool {
    filters.iter().all(|filter| {
        let cell = record
            .get(&filter.column)
            .map(|value| value.as_text().trim().to_string())
            .filter(|text| !text.is_empty());
        match &filter.kind {
            FilterKind::Equal(expected) => cell.as_deref() == Some(expected.as_str()),
            FilterKind::NotEqual(expected) => cell.as_deref() != Some(expected.as_str()),
            FilterKind::Null => cell.is_none(),
            FilterKind::NotNull => cell.is_some(),
            FilterKind::Unrecognized(_) => true,
        }
    })
}

proptest! {
    #[test]
    fn no_filters_include_everything(record in arb_record()) {
        prop_assert!(include(&record, &[]));
    }

    #[test]
    fn include_matches_string_semantics(
        record in arb_record(),
        filters in prop::collection::vec(arb_filter(), 0..4),
    ) {
        prop_assert_eq!(include(&record, &filters), expected_include(&record, &filters));
    }

    #[test]
    fn null_and_not_null_are_complementary(record in arb_record(), column in "[a-d]") {
        let null = TableFilter { table: "T".to_string(), column: column.clone(), kind: FilterKind::Null };
        let not_null = TableFilter { table: "T".to_string(), column, kind: FilterKind::NotNull };
        prop_assert_ne!(passes(&null, &record), passes(&not_null, &record));
    }

    #[test]
    fn equal_and_not_equal_are_complementary(record in arb_record(), column in "[a-d]", expected in "[xy0-9]{1,2}") {
        let equal = TableFilter { table: "T".to_string(), column: column.clone(), kind: FilterKind::Equal(expected.clone()) };
        let not_equal = TableFilter { table: "T".to_string(), column, kind: FilterKind::NotEqual(expected) };
        prop_assert_ne!(passes(&equal, &record), passes(&not_equal, &record));
    }
}
