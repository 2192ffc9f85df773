//! Row transformation and duplicate-resolution engine.
//!
//! - **catalog**: rules, filters and modifiers indexed per target table
//! - **row_filter**: table-scoped inclusion predicates
//! - **evaluate**: column value resolution for every rule kind
//! - **identifier**: sequence-style identifier continuation
//! - **fanout**: one, few or many output records per input record
//! - **dedupe**: duplicate classification and renumbering
//! - **run**: per-run context owning result buckets and counters

pub mod catalog;
pub mod dedupe;
pub mod error;
pub mod evaluate;
pub mod fanout;
pub mod identifier;
pub mod key_filter;
pub mod key_index;
pub mod options;
pub mod row_filter;
pub mod run;

pub use catalog::{RuleCatalog, RuleSources, TableRules, validate_order};
pub use dedupe::{Classification, classify};
pub use error::{EngineError, Result};
pub use evaluate::Resolver;
pub use fanout::{FanOutMode, FanOutPlan};
pub use key_filter::KeyFilter;
pub use key_index::DuplicateKeyIndex;
pub use options::{EngineOptions, KeyFilterMode};
pub use row_filter::include;
pub use run::{MigrationRun, RecordOutcome, RunOutput, RunSummary, TableSummary, run_records};
