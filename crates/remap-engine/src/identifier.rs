//! Sequence-style identifier assignment.
//!
//! An identifier continues the highest identifier already assigned to rows
//! sharing the rule's key values: first in an in-progress bucket, then in a
//! reference table. With no match anywhere the sequence starts at 1.

use remap_model::{IdRule, Record, Value};
use tracing::trace;

use crate::error::{EngineError, Result};
use crate::key_filter::KeyFilter;
use crate::options::KeyFilterMode;

/// Where an identifier lookup searches, and names for error reporting.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierScope<'a> {
    /// Table and column the identifier is produced for.
    pub table: &'a str,
    pub column: &'a str,
    /// In-progress bucket searched first.
    pub bucket_name: &'a str,
    pub bucket: &'a [Record],
    /// Reference table searched when the bucket has no match.
    pub fallback_name: &'a str,
    pub fallback: &'a [Record],
}

/// Next identifier for `input` under `rule`.
///
/// In-progress matches continue at `max + increment`; reference matches
/// continue at `max + 1`.
pub fn assign(
    rule: &IdRule,
    scope: &IdentifierScope<'_>,
    input: &Record,
    mode: KeyFilterMode,
) -> Result<i64> {
    let filter = KeyFilter::identifier(&rule.keys, input, mode);

    let matches = filter.select(scope.bucket);
    if !matches.is_empty() {
        let max = max_identifier(&matches, &rule.id_column, scope, scope.bucket_name)?;
        trace!(table = scope.table, column = scope.column, max, "identifier continues in-progress sequence");
        return next_after(max, rule.increment, scope, scope.bucket_name);
    }

    let matches = filter.select(scope.fallback);
    if !matches.is_empty() {
        let max = max_identifier(&matches, &rule.id_column, scope, scope.fallback_name)?;
        trace!(table = scope.table, column = scope.column, max, "identifier continues reference sequence");
        return next_after(max, 1, scope, scope.fallback_name);
    }

    Ok(1)
}

fn next_after(max: i64, step: i64, scope: &IdentifierScope<'_>, source_table: &str) -> Result<i64> {
    max.checked_add(step)
        .ok_or_else(|| EngineError::IdentifierOverflow {
            table: scope.table.to_string(),
            column: scope.column.to_string(),
            source_table: source_table.to_string(),
            value: max,
        })
}

fn max_identifier(
    rows: &[&Record],
    id_column: &str,
    scope: &IdentifierScope<'_>,
    source_table: &str,
) -> Result<i64> {
    let mut max = i64::MIN;
    for row in rows {
        let value = Value::normalize(row.get(id_column));
        let Some(id) = value.as_leading_int() else {
            return Err(EngineError::NonNumericIdentifier {
                table: scope.table.to_string(),
                column: scope.column.to_string(),
                source_table: source_table.to_string(),
                value: value.to_string(),
            });
        };
        max = max.max(id);
    }
    Ok(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use remap_model::IdKey;

    fn rule(increment: i64) -> IdRule {
        IdRule {
            id_column: "Seq".to_string(),
            fallback_table: "Ref".to_string(),
            id_table: None,
            increment,
            keys: vec![IdKey {
                column: "Owner".to_string(),
                source: "owner".to_string(),
            }],
        }
    }

    fn row(owner: &str, seq: f64) -> Record {
        [("Owner", Value::from(owner)), ("Seq", Value::Number(seq))]
            .into_iter()
            .collect()
    }

    fn scope<'a>(bucket: &'a [Record], fallback: &'a [Record]) -> IdentifierScope<'a> {
        IdentifierScope {
            table: "T",
            column: "Seq",
            bucket_name: "T",
            bucket,
            fallback_name: "Ref",
            fallback,
        }
    }

    #[test]
    fn increment_applies_to_in_progress_only() {
        let input: Record = [("owner", "a")].into_iter().collect();
        let bucket = vec![row("a", 4.0)];
        let fallback = vec![row("a", 20.0)];
        let next = assign(&rule(0), &scope(&bucket, &fallback), &input, KeyFilterMode::IgnoreMissing);
        assert_eq!(next.expect("id"), 4);
        let next = assign(&rule(0), &scope(&[], &fallback), &input, KeyFilterMode::IgnoreMissing);
        assert_eq!(next.expect("id"), 21);
    }

    #[test]
    fn non_numeric_identifier_is_fatal() {
        let input: Record = [("owner", "a")].into_iter().collect();
        let bucket: Vec<Record> = vec![[("Owner", "a"), ("Seq", "abc")].into_iter().collect()];
        let err = assign(&rule(1), &scope(&bucket, &[]), &input, KeyFilterMode::IgnoreMissing)
            .expect_err("non-numeric");
        assert!(matches!(err, EngineError::NonNumericIdentifier { .. }));
    }

    #[test]
    fn identifier_past_i64_max_is_an_error() {
        let input: Record = [("owner", "a")].into_iter().collect();
        let top: Vec<Record> = vec![
            [("Owner", "a"), ("Seq", "9223372036854775807")]
                .into_iter()
                .collect(),
        ];
        let err = assign(&rule(1), &scope(&top, &[]), &input, KeyFilterMode::IgnoreMissing)
            .expect_err("overflow");
        assert!(matches!(
            err,
            EngineError::IdentifierOverflow { value: i64::MAX, ref source_table, .. } if source_table == "T"
        ));
        let err = assign(&rule(1), &scope(&[], &top), &input, KeyFilterMode::IgnoreMissing)
            .expect_err("overflow");
        assert!(err.to_string().contains("in Ref overflows"), "{err}");
    }

    #[test]
    fn strict_mode_restarts_when_key_missing() {
        let input = Record::new();
        let bucket = vec![row("a", 4.0)];
        let strict = assign(&rule(1), &scope(&bucket, &bucket), &input, KeyFilterMode::RequireAll);
        assert_eq!(strict.expect("id"), 1);
        let loose = assign(&rule(1), &scope(&bucket, &[]), &input, KeyFilterMode::IgnoreMissing);
        assert_eq!(loose.expect("id"), 5);
    }
}
