use serde::{Deserialize, Serialize};

/// How identifier lookups treat a key pair whose input value is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyFilterMode {
    /// Drop the pair and match on the remaining keys. A lookup with every key
    /// missing matches all rows of the searched bucket.
    #[default]
    IgnoreMissing,
    /// A missing key value makes the lookup match nothing, so the identifier
    /// restarts at 1 and the reference fallback is skipped.
    RequireAll,
}

/// Engine behaviour switches for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    pub key_filter_mode: KeyFilterMode,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key_filter_mode(mut self, mode: KeyFilterMode) -> Self {
        self.key_filter_mode = mode;
        self
    }
}
