//! Per-run context driving records through every target table.
//!
//! A run owns its result buckets and renumbering counters. Records are
//! processed strictly one at a time: for each table in catalog order the row
//! filter gates the record, the fan-out plan produces candidates, and each
//! candidate is classified before the next one is built.

use std::time::Instant;

use remap_model::{Bucket, Record, ReferenceDataset, ResultStore};
use serde::Serialize;
use tracing::{info, info_span, trace};

use crate::catalog::RuleCatalog;
use crate::dedupe::{Classification, classify};
use crate::error::Result;
use crate::evaluate::Resolver;
use crate::fanout::build_record;
use crate::key_index::DuplicateKeyIndex;
use crate::options::EngineOptions;
use crate::row_filter::include;

/// What one input record produced across all tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordOutcome {
    pub accepted: usize,
    pub renumbered: usize,
    pub merged: usize,
    pub flagged: usize,
}

impl RecordOutcome {
    fn record(&mut self, classification: Classification) {
        match classification.bucket {
            Bucket::Accepted => self.accepted += 1,
            Bucket::DuplicatesResolved => self.merged += 1,
            Bucket::DuplicatesUnresolved => self.flagged += 1,
        }
        if classification.renumbered {
            self.renumbered += 1;
        }
    }

    pub fn produced(&self) -> usize {
        self.accepted + self.merged + self.flagged
    }
}

/// Bucket counts for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub table: String,
    pub accepted: usize,
    pub duplicates_resolved: usize,
    pub duplicates_unresolved: usize,
    /// Accepted rows whose key was renumbered.
    pub renumbered: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub records: usize,
    pub tables: Vec<TableSummary>,
}

impl RunSummary {
    pub fn total(&self) -> RecordOutcome {
        self.tables
            .iter()
            .fold(RecordOutcome::default(), |mut acc, table| {
                acc.accepted += table.accepted;
                acc.renumbered += table.renumbered;
                acc.merged += table.duplicates_resolved;
                acc.flagged += table.duplicates_unresolved;
                acc
            })
    }
}

/// Results of a finished run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub results: ResultStore,
    pub summary: RunSummary,
}

pub struct MigrationRun<'a> {
    catalog: &'a RuleCatalog,
    reference: &'a ReferenceDataset,
    options: EngineOptions,
    results: ResultStore,
    key_index: DuplicateKeyIndex,
    renumbered: Vec<usize>,
    records: usize,
}

impl<'a> MigrationRun<'a> {
    pub fn new(
        catalog: &'a RuleCatalog,
        reference: &'a ReferenceDataset,
        options: EngineOptions,
    ) -> Result<Self> {
        let results = ResultStore::new(catalog.table_names())?;
        Ok(Self {
            catalog,
            reference,
            options,
            results,
            key_index: DuplicateKeyIndex::new(),
            renumbered: vec![0; catalog.len()],
            records: 0,
        })
    }

    /// Push one input record through every table.
    ///
    /// The record may be modified: renumbering rewrites its key field so
    /// later tables observe the new value.
    pub fn process_record(&mut self, input: &mut Record) -> Result<RecordOutcome> {
        let mut outcome = RecordOutcome::default();
        for (position, table) in self.catalog.tables().iter().enumerate() {
            if !include(input, &table.filters) {
                trace!(table = %table.name, record = self.records, "record filtered out");
                continue;
            }
            for rules in table.plan.variants() {
                let candidate = {
                    let resolver =
                        Resolver::new(&table.name, self.reference, &self.results, &self.options);
                    build_record(rules, &resolver, input)?
                };
                let classification = classify(
                    table,
                    candidate,
                    input,
                    &mut self.results,
                    self.reference,
                    &mut self.key_index,
                )?;
                if classification.renumbered {
                    self.renumbered[position] += 1;
                }
                outcome.record(classification);
            }
        }
        self.records += 1;
        Ok(outcome)
    }

    pub fn summary(&self) -> RunSummary {
        let tables = self
            .results
            .iter()
            .zip(&self.renumbered)
            .map(|(set, renumbered)| TableSummary {
                table: set.table.clone(),
                accepted: set.accepted.len(),
                duplicates_resolved: set.duplicates_resolved.len(),
                duplicates_unresolved: set.duplicates_unresolved.len(),
                renumbered: *renumbered,
            })
            .collect();
        RunSummary {
            records: self.records,
            tables,
        }
    }

    pub fn finish(self) -> RunOutput {
        let summary = self.summary();
        RunOutput {
            results: self.results,
            summary,
        }
    }
}

/// Run every record of `records` through a fresh run.
pub fn run_records<I>(
    catalog: &RuleCatalog,
    reference: &ReferenceDataset,
    options: EngineOptions,
    records: I,
) -> Result<RunOutput>
where
    I: IntoIterator<Item = Record>,
{
    let span = info_span!("migration_run", tables = catalog.len());
    let _guard = span.enter();
    let start = Instant::now();

    let mut run = MigrationRun::new(catalog, reference, options)?;
    for mut record in records {
        run.process_record(&mut record)?;
    }
    let output = run.finish();
    let total = output.summary.total();
    info!(
        records = output.summary.records,
        accepted = total.accepted,
        merged = total.merged,
        flagged = total.flagged,
        renumbered = total.renumbered,
        duration_ms = start.elapsed().as_millis(),
        "migration run complete"
    );
    Ok(output)
}
