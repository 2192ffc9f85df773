use remap_model::ModelError;
use thiserror::Error;

/// Failures that abort a migration run.
///
/// Rule configuration problems inside a single column never surface here;
/// they resolve to the missing value instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("table listed more than once: {0}")]
    DuplicateTable(String),
    #[error("table {table} names unknown parent {parent}")]
    UnknownParent { table: String, parent: String },
    #[error("table {table} is listed before its parent {parent}")]
    ParentAfterChild { table: String, parent: String },
    #[error("{table}.{column}: invalid D/M/Y date {value:?}")]
    InvalidDate {
        table: String,
        column: String,
        value: String,
    },
    #[error("{table}.{column}: identifier {value:?} in {source_table} is not numeric")]
    NonNumericIdentifier {
        table: String,
        column: String,
        source_table: String,
        value: String,
    },
    #[error("{table}.{column}: identifier after {value} in {source_table} overflows")]
    IdentifierOverflow {
        table: String,
        column: String,
        source_table: String,
        value: i64,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
