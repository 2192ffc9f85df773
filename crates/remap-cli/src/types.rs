use std::path::PathBuf;
use std::time::Duration;

use remap_engine::{RuleCatalog, RunSummary};
use remap_output::TableOutputs;

#[derive(Debug)]
pub struct RunResult {
    pub config: PathBuf,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub summary: RunSummary,
    /// Files written per table; empty on a dry run.
    pub outputs: Vec<TableOutputs>,
    pub duration: Duration,
}

#[derive(Debug)]
pub struct InspectResult {
    pub config: PathBuf,
    pub input_file: PathBuf,
    pub catalog: RuleCatalog,
    /// Lookup and reference table names, sorted.
    pub reference_tables: Vec<String>,
}
