//! Tracks, for every emitted line, which source file and line it came from.

use std::path::PathBuf;

/// The origin of one emitted output line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineOrigin {
    /// Path (or display name, for string input with no backing file) of the
    /// file the line was read from.
    pub file: PathBuf,
    /// 1-based line number within `file`.
    pub line: u32,
}

impl LineOrigin {
    pub fn new(file: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stores_file_and_line() {
        let origin = LineOrigin::new("main.occ", 3);
        assert_eq!(origin.file, PathBuf::from("main.occ"));
        assert_eq!(origin.line, 3);
    }
}
