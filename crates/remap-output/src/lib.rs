//! Result emission for migration runs.

pub mod error;
pub mod writer;

pub use error::{OutputError, Result};
pub use writer::{TableOutputs, bucket_file_name, union_header, write_results, write_rows};
