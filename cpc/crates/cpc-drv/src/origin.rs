//! Maps a diagnostic's reported line back to the source file and line the
//! user actually wrote, as opposed to its position in the single flattened
//! text the lexer and parser see.

use std::fmt;
use std::path::{Path, PathBuf};

use cpc_pre::LineOrigin;

/// Where a diagnostic points, in terms of the program as the user wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub file: PathBuf,
    pub line: u32,
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// Resolves a lexer/parser diagnostic's line, which is a 1-based line number
/// in the *flattened preprocessor output*, through that output's source map.
pub fn resolve_output_line(source_map: &[LineOrigin], line: u32, fallback: &Path) -> ResolvedLocation {
    match line.checked_sub(1).and_then(|i| source_map.get(i as usize)) {
        Some(origin) => ResolvedLocation {
            file: origin.file.clone(),
            line: origin.line,
        },
        None => ResolvedLocation {
            file: fallback.to_path_buf(),
            line,
        },
    }
}

/// Resolves a preprocessor diagnostic's line. Unlike lexer/parser
/// diagnostics, the preprocessor already reports line numbers relative to
/// whichever input file it was reading, not the flattened output — so no
/// source-map lookup is needed; the file is simply whichever one the
/// preprocessor was reading when it raised the diagnostic.
pub fn resolve_preprocessor_line(line: u32, file: &Path) -> ResolvedLocation {
    ResolvedLocation {
        file: file.to_path_buf(),
        line,
    }
}
