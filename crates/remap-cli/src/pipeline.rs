//! Run stages: load, process, output.
//!
//! Each stage runs in its own span and logs a completion line with its
//! duration, so `--log-format json` gives a per-stage timing record.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use remap_engine::{EngineOptions, MigrationRun, RuleCatalog, RunOutput};
use remap_ingest::{InputReader, LoadedProject, count_records};
use remap_model::{Record, ResultStore};
use remap_output::{TableOutputs, write_results};
use tracing::{Level, enabled, info, info_span, trace};

use crate::logging::redact_value;
use crate::types::{InspectResult, RunResult};

const PROGRESS_TEMPLATE: &str =
    "{spinner:.cyan} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} records ({per_sec})";

/// Everything `remap run` needs besides the project itself.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub config: PathBuf,
    /// Overrides `output.dataFilepath`.
    pub output_dir: Option<PathBuf>,
    pub dry_run: bool,
    pub options: EngineOptions,
    pub show_progress: bool,
}

impl RunRequest {
    pub fn new(config: impl Into<PathBuf>) -> Self {
        Self {
            config: config.into(),
            output_dir: None,
            dry_run: false,
            options: EngineOptions::default(),
            show_progress: false,
        }
    }
}

/// Load the project and build its rule catalog.
pub fn load(config: &Path) -> Result<(LoadedProject, RuleCatalog)> {
    let project = LoadedProject::load(config)
        .with_context(|| format!("load project {}", config.display()))?;
    let catalog = RuleCatalog::build(&project.tables, &project.sources)
        .context("build rule catalog")?;
    Ok((project, catalog))
}

/// Stream every input record through a fresh run.
pub fn process(
    project: &LoadedProject,
    catalog: &RuleCatalog,
    options: EngineOptions,
    show_progress: bool,
) -> Result<RunOutput> {
    let input = &project.config.input_file;
    let span = info_span!("process", input = %input.display(), tables = catalog.len());
    let _guard = span.enter();
    let start = Instant::now();

    let progress = if show_progress {
        let total = count_records(input).context("count input records")?;
        progress_bar(total)
    } else {
        ProgressBar::hidden()
    };

    let mut reader = InputReader::open(input).context("open input file")?;
    let mut run = MigrationRun::new(catalog, &project.reference, options)?;
    while let Some(mut record) = reader.next_record()? {
        let key = enabled!(Level::TRACE).then(|| first_value(&record));
        let outcome = run
            .process_record(&mut record)
            .with_context(|| format!("input record {}", reader.position()))?;
        if let Some(key) = key {
            trace!(
                position = reader.position(),
                key = redact_value(&key),
                accepted = outcome.accepted,
                merged = outcome.merged,
                flagged = outcome.flagged,
                "record processed"
            );
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    let output = run.finish();
    let total = output.summary.total();
    info!(
        records = output.summary.records,
        accepted = total.accepted,
        merged = total.merged,
        flagged = total.flagged,
        renumbered = total.renumbered,
        duration_ms = start.elapsed().as_millis(),
        "processing complete"
    );
    Ok(output)
}

/// Write the three result files of every table.
pub fn output(dir: &Path, results: &ResultStore) -> Result<Vec<TableOutputs>> {
    let span = info_span!("output", dir = %dir.display());
    let _guard = span.enter();
    let start = Instant::now();
    let outputs = write_results(dir, results)
        .with_context(|| format!("write results to {}", dir.display()))?;
    info!(
        tables = outputs.len(),
        duration_ms = start.elapsed().as_millis(),
        "output complete"
    );
    Ok(outputs)
}

pub fn execute(request: &RunRequest) -> Result<RunResult> {
    let start = Instant::now();
    let (project, catalog) = load(&request.config)?;
    let output_dir = request
        .output_dir
        .clone()
        .unwrap_or_else(|| project.config.output.data_filepath.clone());

    let RunOutput { results, summary } =
        process(&project, &catalog, request.options, request.show_progress)?;
    let outputs = if request.dry_run {
        info!("dry run; no files written");
        Vec::new()
    } else {
        output(&output_dir, &results)?
    };

    Ok(RunResult {
        config: request.config.clone(),
        output_dir,
        dry_run: request.dry_run,
        summary,
        outputs,
        duration: start.elapsed(),
    })
}

pub fn inspect(config: &Path) -> Result<InspectResult> {
    let (project, catalog) = load(config)?;
    let mut reference_tables: Vec<String> = project
        .reference
        .table_names()
        .map(str::to_string)
        .collect();
    reference_tables.sort();
    Ok(InspectResult {
        config: config.to_path_buf(),
        input_file: project.config.input_file,
        catalog,
        reference_tables,
    })
}

fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template(PROGRESS_TEMPLATE) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

fn first_value(record: &Record) -> String {
    record
        .iter()
        .next()
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}
