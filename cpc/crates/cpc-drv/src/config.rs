//! Pipeline configuration.

use std::path::PathBuf;

use cpc_util::FxHashMap;

/// Options threaded through every stage of one [`crate::compile_file`] or
/// [`crate::compile_source`] call.
///
/// This is the programmatic surface the CLI binds command-line flags onto;
/// it carries no I/O or process-exit concerns of its own.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directories searched for `#INCLUDE` targets, in order, after the
    /// including file's own directory.
    pub search_dirs: Vec<PathBuf>,

    /// Preprocessor symbols available to `#IF`, seeded with the spec's
    /// required default.
    pub defines: FxHashMap<String, String>,

    /// Where to write generated Go source. `None` means stdout.
    pub output: Option<PathBuf>,

    /// Emit `tracing::debug!` at every pipeline stage transition.
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        let mut defines = FxHashMap::default();
        defines.insert(
            "TARGET.BITS.PER.WORD".to_string(),
            cpc_pre::DEFAULT_TARGET_BITS_PER_WORD.to_string(),
        );
        Self {
            search_dirs: Vec::new(),
            defines,
            output: None,
            verbose: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }
}
