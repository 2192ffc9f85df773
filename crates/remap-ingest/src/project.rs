//! Load everything a run needs before processing starts.

use std::path::Path;
use std::time::Instant;

use remap_engine::RuleSources;
use remap_model::{
    MappingRule, RawMappingRule, RawTableFilter, Record, ReferenceDataset, TableEntry,
    TableFilter,
};
use tracing::{info, info_span, warn};

use crate::config::ProjectConfig;
use crate::csv_files::{read_optional_records, read_records, read_rows};
use crate::error::Result;
use crate::reference::read_reference_table;

/// A fully loaded project: configuration, rules and reference data.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub config: ProjectConfig,
    pub tables: Vec<TableEntry>,
    pub sources: RuleSources,
    /// Lookup tables and reference snapshots, keyed by their configured name.
    pub reference: ReferenceDataset,
}

impl LoadedProject {
    /// Read the configuration at `path` and every file it names except the
    /// input file, which is streamed later.
    pub fn load(path: &Path) -> Result<Self> {
        let span = info_span!("load_project", config = %path.display());
        let _guard = span.enter();
        let start = Instant::now();

        let config = ProjectConfig::load(path)?;
        let tables: Vec<TableEntry> = read_records(&config.table_list)?
            .into_iter()
            .filter(|entry: &TableEntry| !entry.table.trim().is_empty())
            .collect();
        let sources = load_sources(&config)?;
        let reference = load_reference(&config)?;

        info!(
            tables = tables.len(),
            one_to_one = sources.one_to_one.len(),
            one_to_many = sources.one_to_many.len(),
            one_to_few = sources.one_to_few.len(),
            filters = sources.filters.len(),
            modifiers = sources.modifiers.len(),
            duration_ms = start.elapsed().as_millis(),
            "project loaded"
        );
        Ok(Self {
            config,
            tables,
            sources,
            reference,
        })
    }
}

fn load_rules(path: &Path) -> Result<Vec<MappingRule>> {
    let raw: Vec<RawMappingRule> = read_records(path)?;
    Ok(raw
        .iter()
        .filter(|rule| !rule.table.trim().is_empty())
        .map(MappingRule::from_raw)
        .collect())
}

fn load_sources(config: &ProjectConfig) -> Result<RuleSources> {
    let span = info_span!("load_rules");
    let _guard = span.enter();

    let filters: Vec<RawTableFilter> = read_records(&config.table_filters)?;
    let modifiers = match &config.modifiers {
        Some(path) => read_optional_records(path)?,
        None => Vec::new(),
    };
    Ok(RuleSources {
        one_to_one: load_rules(&config.one_to_one_column_mappings)?,
        one_to_many: load_rules(&config.one_to_many_column_mappings)?,
        one_to_few: load_rules(&config.one_to_few_column_mappings)?,
        filters: filters
            .iter()
            .filter(|filter| !filter.table.trim().is_empty())
            .map(TableFilter::from_raw)
            .collect(),
        modifiers,
    })
}

fn load_reference(config: &ProjectConfig) -> Result<ReferenceDataset> {
    let span = info_span!("load_reference");
    let _guard = span.enter();

    let mut reference = ReferenceDataset::new();
    for lookup in &config.lookups {
        let rows = read_rows(&lookup.file_path)?;
        info!(name = %lookup.name, rows = rows.len(), "lookup table loaded");
        insert_named(&mut reference, &lookup.name, rows);
    }
    for table in &config.tables {
        let rows = read_reference_table(&table.file_path)?;
        info!(name = %table.name, rows = rows.len(), "reference table loaded");
        insert_named(&mut reference, &table.name, rows);
    }
    Ok(reference)
}

fn insert_named(reference: &mut ReferenceDataset, name: &str, rows: Vec<Record>) {
    if reference.contains(name) {
        warn!(name, "reference name loaded twice; the later file wins");
    }
    reference.insert(name, rows);
}
