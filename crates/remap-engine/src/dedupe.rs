//! Duplicate classification and renumbering.
//!
//! Each produced record is checked against the table's accepted rows first
//! and the reference table of the same name second. A key collision whose
//! populated columns all match an existing row is merged silently. Any other
//! collision is flagged for review, unless it is an in-progress collision on
//! a table with a renumbering directive, in which case the record's key is
//! rewritten to `original.counter` and the record is accepted.

use remap_model::{
    Bucket, IN_PROGRESS_PREFIX, REFERENCE_PREFIX, Record, ReferenceDataset, RenumberDirective,
    ResultStore, Value,
};
use tracing::debug;

use crate::catalog::TableRules;
use crate::error::Result;
use crate::key_filter::KeyFilter;
use crate::key_index::DuplicateKeyIndex;

/// Where a candidate ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub bucket: Bucket,
    pub renumbered: bool,
}

enum Collision {
    None,
    Exact,
    /// First colliding row, attached to the candidate when flagged.
    Inexact(Record),
}

fn collide(key: &KeyFilter, candidate: &Record, rows: &[Record]) -> Collision {
    let matches = key.select(rows);
    let Some(first) = matches.first() else {
        return Collision::None;
    };
    let exact = KeyFilter::full_record(candidate);
    if matches.iter().any(|row| exact.matches(row)) {
        Collision::Exact
    } else {
        Collision::Inexact((*first).clone())
    }
}

/// Classify `candidate` for `table` and append it to its bucket.
///
/// `input` is the record the candidate was built from; renumbering rewrites
/// its key field so tables processed later see the new value.
pub fn classify(
    table: &TableRules,
    mut candidate: Record,
    input: &mut Record,
    results: &mut ResultStore,
    reference: &ReferenceDataset,
    key_index: &mut DuplicateKeyIndex,
) -> Result<Classification> {
    let key = KeyFilter::primary_key(&table.primary_key, &candidate);
    let set = results.get_mut(&table.name)?;

    let mut renumbered = false;
    let bucket = match collide(&key, &candidate, &set.accepted) {
        Collision::Exact => Bucket::DuplicatesResolved,
        Collision::Inexact(existing) => match &table.renumber {
            Some(directive) => {
                renumber(&mut candidate, input, &key, &table.name, directive, key_index);
                renumbered = true;
                Bucket::Accepted
            }
            None => {
                attach(&mut candidate, &existing, IN_PROGRESS_PREFIX);
                Bucket::DuplicatesUnresolved
            }
        },
        Collision::None => match collide(&key, &candidate, reference.rows(&table.name)) {
            Collision::None => Bucket::Accepted,
            Collision::Exact => Bucket::DuplicatesResolved,
            Collision::Inexact(existing) => {
                attach(&mut candidate, &existing, REFERENCE_PREFIX);
                Bucket::DuplicatesUnresolved
            }
        },
    };

    debug!(table = %table.name, bucket = bucket.label(), renumbered, "classified record");
    set.push(bucket, candidate);
    Ok(Classification { bucket, renumbered })
}

/// Copy the colliding row's fields onto the candidate under `prefix`.
fn attach(candidate: &mut Record, existing: &Record, prefix: &str) {
    for (column, value) in existing.iter() {
        candidate.insert(format!("{prefix}{column}"), value.clone());
    }
}

/// Rewrite the candidate's key to `original.counter` and record an audit note.
///
/// Returns the new key value.
pub fn renumber(
    candidate: &mut Record,
    input: &mut Record,
    key: &KeyFilter,
    table: &str,
    directive: &RenumberDirective,
    key_index: &mut DuplicateKeyIndex,
) -> String {
    let original = candidate
        .value_or_missing(&directive.output_field)
        .as_text()
        .into_owned();
    let counter = key_index.next(DuplicateKeyIndex::composite_key(table, key.values()));
    let renumbered = format!("{original}.{counter}");

    if !directive.comment_field.is_empty() {
        let previous = match candidate.value_or_missing(&directive.comment_field) {
            value if value.is_missing() => String::new(),
            value => value.as_text().into_owned(),
        };
        let note = format!(
            "{original} renumbered to {renumbered}. {};{previous}",
            directive.comment
        );
        candidate.insert(directive.comment_field.clone(), Value::Text(note));
    }
    candidate.insert(directive.output_field.clone(), Value::Text(renumbered.clone()));
    if !directive.input_field.is_empty() {
        input.insert(directive.input_field.clone(), Value::Text(renumbered.clone()));
    }
    renumbered
}
