use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown table: {0}")]
    UnknownTable(String),
    #[error("table listed more than once: {0}")]
    DuplicateTable(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
