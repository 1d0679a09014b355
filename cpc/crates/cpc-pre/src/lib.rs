//! cpc-pre - Conditional-compilation preprocessor
//!
//! Expands `#IF`/`#ELSE`/`#ENDIF`/`#DEFINE`/`#INCLUDE` and the remaining
//! no-op directives into a single flat text, recording for every emitted
//! line which input file and line it came from so downstream diagnostics
//! can still point at the program the user wrote rather than the expanded
//! intermediate text.
//!
//! This crate has no knowledge of tokens, indentation, or the AST; it is a
//! pure text-to-text transform that the lexer consumes.

mod error;
mod expr;
mod line_map;
mod preprocessor;

pub use error::{PreprocessError, PreprocessResult};
pub use line_map::LineOrigin;
pub use preprocessor::{PreprocessDiagnostic, PreprocessOutput, Preprocessor, DEFAULT_TARGET_BITS_PER_WORD};
