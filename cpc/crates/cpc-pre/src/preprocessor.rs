//! Line-oriented conditional-compilation preprocessor.
//!
//! Expands `#IF`/`#ELSE`/`#ENDIF`/`#DEFINE`/`#INCLUDE` and the no-op
//! directives into a single flat text the lexer can tokenize, while
//! recording which input file and line each output line came from.

use std::fs;
use std::path::{Path, PathBuf};

use cpc_util::diagnostic::{Diagnostic, DiagnosticCode};
use cpc_util::span::{FileId, Span};
use rustc_hash::FxHashMap;

use crate::error::{PreprocessError, PreprocessResult};
use crate::expr;
use crate::line_map::LineOrigin;

/// Default predefined symbol: the target word width assumed when a program
/// does not otherwise specify one.
pub const DEFAULT_TARGET_BITS_PER_WORD: &str = "64";

/// The result of preprocessing one translation unit.
#[derive(Debug)]
pub struct PreprocessOutput {
    /// The expanded text, one output line per input line (except at
    /// `#INCLUDE` sites, which contribute the included file's line count).
    pub text: String,
    /// `source_map[i]` is the origin of output line `i` (0-based).
    pub source_map: Vec<LineOrigin>,
    /// Non-fatal diagnostics accumulated while preprocessing.
    pub diagnostics: Vec<PreprocessDiagnostic>,
}

/// A preprocessor diagnostic paired with the file that was being read when
/// it was raised, since `diagnostic.span.line` alone is relative to that
/// file, not to the root translation unit.
#[derive(Debug, Clone)]
pub struct PreprocessDiagnostic {
    pub file: PathBuf,
    pub diagnostic: Diagnostic,
}

/// A `#IF`/`#ELSE`/`#ENDIF` conditional frame.
struct ConditionalFrame {
    active: bool,
    ever_true: bool,
    /// Line the `#IF` appeared on, for the unterminated-`#IF` diagnostic.
    opened_at: u32,
}

/// Preprocesses occam-family source text.
///
/// One `Preprocessor` can be reused across translation units; it only holds
/// configuration (include search path, predefined symbols), not per-run
/// state.
pub struct Preprocessor {
    search_dirs: Vec<PathBuf>,
    predefined: FxHashMap<String, String>,
}

impl Preprocessor {
    /// Creates a preprocessor with the given include search directories and
    /// predefined symbols.
    pub fn new(search_dirs: Vec<PathBuf>, predefined: FxHashMap<String, String>) -> Self {
        Self {
            search_dirs,
            predefined,
        }
    }

    /// Creates a preprocessor with only the spec-mandated default symbol
    /// (`TARGET.BITS.PER.WORD = "64"`).
    pub fn with_defaults(search_dirs: Vec<PathBuf>) -> Self {
        let mut predefined = FxHashMap::default();
        predefined.insert(
            "TARGET.BITS.PER.WORD".to_string(),
            DEFAULT_TARGET_BITS_PER_WORD.to_string(),
        );
        Self::new(search_dirs, predefined)
    }

    /// Preprocesses the file at `path`.
    pub fn preprocess_file(&self, path: impl AsRef<Path>) -> PreprocessResult<PreprocessOutput> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| PreprocessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let canonical = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());

        let mut ctx = Expansion::new(self, self.predefined.clone());
        ctx.in_progress.push(canonical);
        ctx.process_file(path, path, &content)?;
        Ok(ctx.finish())
    }

    /// Preprocesses raw source text that has no backing file on disk.
    /// `origin_name` is used purely for diagnostics and the source map.
    pub fn preprocess_str(
        &self,
        source: &str,
        origin_name: impl Into<PathBuf>,
    ) -> PreprocessResult<PreprocessOutput> {
        let origin_name = origin_name.into();
        let mut ctx = Expansion::new(self, self.predefined.clone());
        ctx.process_file(&origin_name, &origin_name, source)?;
        Ok(ctx.finish())
    }
}

/// Mutable state threaded through one top-level `preprocess_*` call,
/// including across `#INCLUDE` recursion.
struct Expansion<'a> {
    pp: &'a Preprocessor,
    symbols: FxHashMap<String, String>,
    in_progress: Vec<PathBuf>,
    out_lines: Vec<String>,
    source_map: Vec<LineOrigin>,
    diagnostics: Vec<PreprocessDiagnostic>,
}

impl<'a> Expansion<'a> {
    fn new(pp: &'a Preprocessor, symbols: FxHashMap<String, String>) -> Self {
        Self {
            pp,
            symbols,
            in_progress: Vec::new(),
            out_lines: Vec::new(),
            source_map: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn finish(self) -> PreprocessOutput {
        let mut text = self.out_lines.join("\n");
        if !self.out_lines.is_empty() {
            text.push('\n');
        }
        PreprocessOutput {
            text,
            source_map: self.source_map,
            diagnostics: self.diagnostics,
        }
    }

    fn emit(&mut self, line: &str, origin_file: &Path, origin_line: u32) {
        self.out_lines.push(line.to_string());
        self.source_map
            .push(LineOrigin::new(origin_file, origin_line));
    }

    fn emit_empty(&mut self, origin_file: &Path, origin_line: u32) {
        self.emit("", origin_file, origin_line);
    }

    fn warn(&mut self, code: DiagnosticCode, message: impl Into<String>, line: u32, file: &Path) {
        let diag = Diagnostic::warning(message, Span::point_with_file(FileId::DUMMY, line, 1))
            .with_code(code);
        self.diagnostics.push(PreprocessDiagnostic {
            file: file.to_path_buf(),
            diagnostic: diag,
        });
    }

    /// Processes one file's contents, appending to `self.out_lines` and
    /// recursing into `#INCLUDE`s. `display_path` is what gets recorded in
    /// the source map and diagnostics; `resolve_path` is what include
    /// resolution is relative to (its parent directory).
    fn process_file(
        &mut self,
        display_path: &Path,
        resolve_path: &Path,
        content: &str,
    ) -> PreprocessResult<()> {
        let current_dir = resolve_path.parent();
        let mut stack: Vec<ConditionalFrame> = Vec::new();

        for (idx, raw_line) in content.lines().enumerate() {
            let line_no = (idx + 1) as u32;
            let trimmed = raw_line.trim_start();

            let Some(directive) = trimmed.strip_prefix('#') else {
                if self.all_active(&stack) {
                    self.emit(raw_line, display_path, line_no);
                } else {
                    self.emit_empty(display_path, line_no);
                }
                continue;
            };

            let (name, rest) = split_directive(directive);
            let name_upper = name.to_ascii_uppercase();
            let active_before = self.all_active(&stack);

            match name_upper.as_str() {
                "IF" => {
                    let condition = if active_before {
                        expr::eval(rest, &self.symbols)
                    } else {
                        false
                    };
                    stack.push(ConditionalFrame {
                        active: condition,
                        ever_true: condition,
                        opened_at: line_no,
                    });
                }
                "ELSE" => match stack.last_mut() {
                    Some(frame) => {
                        if frame.ever_true {
                            frame.active = false;
                        } else {
                            frame.active = true;
                            frame.ever_true = true;
                        }
                    }
                    None => {
                        self.warn(
                            DiagnosticCode::W_PRE_STRAY_DIRECTIVE,
                            "#ELSE with no matching #IF",
                            line_no,
                            display_path,
                        );
                    }
                },
                "ENDIF" => {
                    if stack.pop().is_none() {
                        self.warn(
                            DiagnosticCode::W_PRE_STRAY_DIRECTIVE,
                            "#ENDIF with no matching #IF",
                            line_no,
                            display_path,
                        );
                    }
                }
                "DEFINE" if active_before => {
                    let sym = rest.trim();
                    if !sym.is_empty() {
                        self.symbols.insert(sym.to_string(), String::new());
                    }
                }
                "DEFINE" => {}
                "INCLUDE" if active_before => {
                    match parse_include_target(rest) {
                        Some(target) => {
                            self.process_include(&target, current_dir)?;
                            // The included file's own lines take the place
                            // of this directive line entirely; it does not
                            // additionally contribute a blank output line.
                            continue;
                        }
                        None => {
                            let diag = Diagnostic::error(
                                format!("malformed #INCLUDE directive: {rest}"),
                                Span::point_with_file(FileId::DUMMY, line_no, 1),
                            )
                            .with_code(DiagnosticCode::E_PRE_MALFORMED_DIRECTIVE);
                            self.diagnostics.push(PreprocessDiagnostic {
                                file: display_path.to_path_buf(),
                                diagnostic: diag,
                            });
                        }
                    }
                }
                "INCLUDE" => {}
                "COMMENT" | "PRAGMA" | "USE" => {}
                _ => {
                    // Unknown directive: pass through verbatim when active,
                    // otherwise it is dropped along with everything else in
                    // the inactive region.
                    if active_before {
                        self.emit(raw_line, display_path, line_no);
                        continue;
                    }
                }
            }

            self.emit_empty(display_path, line_no);
        }

        for frame in stack {
            self.warn(
                DiagnosticCode::W_PRE_UNTERMINATED_IF,
                format!("#IF opened at line {} is never closed", frame.opened_at),
                frame.opened_at,
                display_path,
            );
        }

        Ok(())
    }

    fn process_include(
        &mut self,
        target: &str,
        current_dir: Option<&Path>,
    ) -> PreprocessResult<()> {
        let resolved = self
            .pp
            .resolve_include(target, current_dir)
            .ok_or_else(|| PreprocessError::IncludeNotFound {
                path: target.to_string(),
            })?;

        let canonical = resolved
            .canonicalize()
            .unwrap_or_else(|_| resolved.clone());
        if self.in_progress.contains(&canonical) {
            return Err(PreprocessError::CircularInclude { path: canonical });
        }

        let content = fs::read_to_string(&resolved).map_err(|source| PreprocessError::Io {
            path: resolved.clone(),
            source,
        })?;

        self.in_progress.push(canonical.clone());
        let result = self.process_file(&resolved, &resolved, &content);
        self.in_progress.pop();
        result
    }

    fn all_active(&self, stack: &[ConditionalFrame]) -> bool {
        stack.iter().all(|f| f.active)
    }
}

impl Preprocessor {
    fn resolve_include(&self, target: &str, current_dir: Option<&Path>) -> Option<PathBuf> {
        if let Some(dir) = current_dir {
            let candidate = dir.join(target);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        for dir in &self.search_dirs {
            let candidate = dir.join(target);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }
}

/// Splits `directive text` (everything after the leading `#`) into
/// (directive name, remainder).
fn split_directive(directive: &str) -> (&str, &str) {
    let directive = directive.trim_start();
    match directive.find(char::is_whitespace) {
        Some(idx) => (&directive[..idx], directive[idx..].trim_start()),
        None => (directive, ""),
    }
}

/// Extracts the quoted path from a `#INCLUDE "path"` argument.
fn parse_include_target(rest: &str) -> Option<String> {
    let rest = rest.trim();
    let inner = rest.strip_prefix('"')?.strip_suffix('"')?;
    if inner.is_empty() {
        None
    } else {
        Some(inner.to_string())
    }
}
