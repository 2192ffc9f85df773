//! Library side of the `remap` binary: logging setup, run stages and
//! summary rendering.

pub mod logging;
pub mod pipeline;
pub mod summary;
pub mod types;
