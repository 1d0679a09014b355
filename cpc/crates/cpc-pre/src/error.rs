//! Fatal error types for the preprocessor.
//!
//! Non-fatal conditions (unterminated `#IF`, stray `#ELSE`/`#ENDIF`) are
//! recorded as diagnostics instead; see [`crate::Preprocessor`].

use std::path::PathBuf;
use thiserror::Error;

/// Error type for preprocessing operations.
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// A `#INCLUDE` target could not be resolved in the current file's
    /// directory or any search directory.
    #[error("include file not found: {path}")]
    IncludeNotFound { path: String },

    /// An include cycle was detected: the target is already being
    /// processed somewhere up the include chain.
    #[error("circular include detected: {}", path.display())]
    CircularInclude { path: PathBuf },

    /// Reading a source or include file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for preprocessing operations.
pub type PreprocessResult<T> = std::result::Result<T, PreprocessError>;
