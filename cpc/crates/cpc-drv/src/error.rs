//! Fatal error types for pipeline orchestration.
//!
//! Most per-stage problems (bad syntax, stray directives) are non-fatal
//! diagnostics accumulated on a [`cpc_util::Handler`] or in a
//! [`cpc_pre::PreprocessOutput`]; see [`crate::CompileOutput`]. The variants
//! here are the handful of conditions that stop the pipeline outright before
//! a diagnostic list can even be produced.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Preprocessing failed (unresolvable `#INCLUDE`, circular include, I/O).
    #[error(transparent)]
    Preprocess(#[from] cpc_pre::PreprocessError),

    /// Code generation found a program it cannot lower (e.g. a name
    /// collision after identifier translation).
    #[error(transparent)]
    Codegen(#[from] cpc_gen::CodeGenError),

    /// Lexing or parsing reported one or more fatal diagnostics.
    #[error("{count} error(s) reported during {stage}")]
    DiagnosticsReported { stage: &'static str, count: usize },

    /// No input files were given.
    #[error("no input files")]
    NoInputFiles,

    /// Writing the generated output failed.
    #[error("failed to write {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
