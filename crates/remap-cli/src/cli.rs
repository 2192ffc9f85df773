//! CLI argument definitions for the remap tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "remap",
    version,
    about = "Migrate legacy records into target tables",
    long_about = "Transform legacy records into rows of one or more target tables.\n\n\
                  Rules come from delimited mapping files; duplicates are merged,\n\
                  renumbered or flagged against in-progress output and existing\n\
                  reference data."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow record values to appear in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process every input record and write the result files.
    Run(RunArgs),

    /// Show the rule catalog a project configuration builds.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Project configuration file (.json or .toml).
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Output directory (default: output.dataFilepath from the configuration).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Process and summarize without writing result files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Treat a missing identifier key value as "no match" instead of ignoring
    /// the key.
    ///
    /// Without this flag a blank key is dropped from the identifier lookup,
    /// which can continue a sequence belonging to unrelated rows.
    #[arg(long = "strict-id-keys")]
    pub strict_id_keys: bool,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Project configuration file (.json or .toml).
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
