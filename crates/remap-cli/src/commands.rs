use std::io::{self, IsTerminal};

use anyhow::Result;
use remap_cli::pipeline::{RunRequest, execute, inspect};
use remap_cli::types::{InspectResult, RunResult};
use remap_engine::{EngineOptions, KeyFilterMode};
use tracing::info_span;

use crate::cli::{InspectArgs, RunArgs};

pub fn run_migration(args: &RunArgs) -> Result<RunResult> {
    let span = info_span!("run", config = %args.config.display(), dry_run = args.dry_run);
    let _guard = span.enter();
    let key_filter_mode = if args.strict_id_keys {
        KeyFilterMode::RequireAll
    } else {
        KeyFilterMode::IgnoreMissing
    };
    let request = RunRequest {
        config: args.config.clone(),
        output_dir: args.output_dir.clone(),
        dry_run: args.dry_run,
        options: EngineOptions::new().with_key_filter_mode(key_filter_mode),
        show_progress: io::stderr().is_terminal(),
    };
    execute(&request)
}

pub fn run_inspect(args: &InspectArgs) -> Result<InspectResult> {
    let span = info_span!("inspect", config = %args.config.display());
    let _guard = span.enter();
    inspect(&args.config)
}
