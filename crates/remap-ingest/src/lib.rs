//! Project ingestion: configuration, rule files, lookups, reference
//! snapshots and the streamed input file.

pub mod config;
pub mod csv_files;
pub mod error;
pub mod input;
pub mod project;
pub mod reference;

pub use config::{NamedFile, OutputConfig, ProjectConfig};
pub use csv_files::{read_optional_records, read_records, read_rows};
pub use error::{IngestError, Result};
pub use input::{InputReader, count_records};
pub use project::LoadedProject;
pub use reference::read_reference_table;
