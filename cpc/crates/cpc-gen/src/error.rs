//! Error types for code generation.
//!
//! Emission is expected to always succeed once the AST has reached this
//! stage (the parser has already rejected anything malformed); these
//! variants exist for the handful of cases where a pre-pass finds a
//! program the generator genuinely cannot lower, rather than for routine
//! per-statement failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeGenError {
    /// Two top-level declarations translate to the same target identifier,
    /// e.g. a `PROC` and a `RECORD` whose names differ only by a `.` that
    /// identifier translation strips.
    #[error("name collision after translation: '{0}'")]
    NameCollision(String),

    /// Internal invariant violated — indicates a bug in the generator.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CodeGenError>;
