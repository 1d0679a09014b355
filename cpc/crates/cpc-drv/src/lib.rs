//! cpc-drv - pipeline orchestration
//!
//! Wires the four compiler-phase crates into one call:
//!
//! ```text
//! source text ──▶ [cpc-pre] ──▶ flattened text + line origins
//!                                      │
//!                                      ▼
//!                                 [cpc-lex] ──▶ tokens
//!                                      │
//!                                      ▼
//!                                 [cpc-par] ──▶ AST
//!                                      │
//!                                      ▼
//!                                 [cpc-gen] ──▶ Go source text
//! ```
//!
//! The preprocessor flattens `#IF`/`#INCLUDE` into a single text before the
//! lexer ever sees it, so a diagnostic the lexer or parser raises is
//! positioned over that flattened text rather than the file the user wrote.
//! [`origin`] threads the preprocessor's line-origin map back through so a
//! reported diagnostic still names the original file and line.
//!
//! This crate is silent: it returns diagnostics and logs stage transitions
//! via `tracing`, but never writes to stdout/stderr itself. Printing and
//! process exit codes are the CLI's job.

mod config;
mod error;
mod origin;

pub use config::Config;
pub use error::{PipelineError, Result};
pub use origin::ResolvedLocation;

use std::path::Path;

use cpc_lex::Lexer;
use cpc_pre::{LineOrigin, PreprocessDiagnostic, Preprocessor};
use cpc_util::diagnostic::{Diagnostic, Handler, Level};

/// One diagnostic with its location resolved back to the program the user
/// wrote.
#[derive(Debug, Clone)]
pub struct ResolvedDiagnostic {
    pub diagnostic: Diagnostic,
    pub location: ResolvedLocation,
}

/// The result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// Generated Go source text.
    pub go_source: String,
    /// Non-fatal diagnostics accumulated along the way. Always empty of
    /// errors: an error-level diagnostic aborts the pipeline with
    /// [`PipelineError::DiagnosticsReported`] before a [`CompileOutput`] is
    /// produced.
    pub diagnostics: Vec<ResolvedDiagnostic>,
}

/// Compiles the file at `path` through the full pipeline.
pub fn compile_file(config: &Config, path: &Path) -> Result<CompileOutput> {
    if config.verbose {
        tracing::debug!(path = %path.display(), "preprocessing");
    }
    let preprocessor = Preprocessor::new(config.search_dirs.clone(), config.defines.clone());
    let output = preprocessor.preprocess_file(path)?;
    run_pipeline(config, path, output.text, output.source_map, output.diagnostics)
}

/// Compiles raw source text with no backing file, for embedding and tests.
/// `origin_name` stands in for the file path in diagnostics.
pub fn compile_source(config: &Config, source: &str, origin_name: &str) -> Result<CompileOutput> {
    let preprocessor = Preprocessor::new(config.search_dirs.clone(), config.defines.clone());
    let output = preprocessor.preprocess_str(source, origin_name)?;
    let root = Path::new(origin_name);
    run_pipeline(config, root, output.text, output.source_map, output.diagnostics)
}

fn run_pipeline(
    config: &Config,
    root: &Path,
    text: String,
    source_map: Vec<LineOrigin>,
    pre_diagnostics: Vec<PreprocessDiagnostic>,
) -> Result<CompileOutput> {
    let mut resolved: Vec<ResolvedDiagnostic> = pre_diagnostics
        .iter()
        .map(|d| ResolvedDiagnostic {
            diagnostic: d.diagnostic.clone(),
            location: origin::resolve_preprocessor_line(d.diagnostic.span.line, &d.file),
        })
        .collect();

    if config.verbose {
        tracing::debug!("lexing");
    }
    let mut handler = Handler::new();
    let tokens: Vec<_> = Lexer::new(&text, &mut handler).collect();

    if config.verbose {
        tracing::debug!("parsing");
    }
    let mut parser = cpc_par::Parser::new(tokens, &mut handler);
    let program = parser.parse();

    let handler_diagnostics = handler.diagnostics();
    resolved.extend(handler_diagnostics.iter().map(|d| ResolvedDiagnostic {
        diagnostic: d.clone(),
        location: origin::resolve_output_line(&source_map, d.span.line, root),
    }));

    log_diagnostics(&resolved);

    if handler.has_errors() {
        return Err(PipelineError::DiagnosticsReported {
            stage: "lexing/parsing",
            count: handler.error_count(),
        });
    }

    if config.verbose {
        tracing::debug!("generating Go source");
    }
    let go_source = cpc_gen::generate(&program)?;

    Ok(CompileOutput {
        go_source,
        diagnostics: resolved,
    })
}

fn log_diagnostics(diagnostics: &[ResolvedDiagnostic]) {
    for rd in diagnostics {
        match rd.diagnostic.level {
            Level::Error => tracing::error!(at = %rd.location, "{}", rd.diagnostic.message),
            Level::Warning => tracing::warn!(at = %rd.location, "{}", rd.diagnostic.message),
            Level::Note | Level::Help | Level::Bug => {
                tracing::debug!(at = %rd.location, "{}", rd.diagnostic.message)
            }
        }
    }
}
