//! cpc-lex - Indentation-aware lexer
//!
//! Turns the flat text produced by the preprocessor into a token stream.
//! The lexer is the off-side-rule layer of the pipeline: it synthesizes
//! `INDENT`/`DEDENT`/`NEWLINE` tokens from column positions, suppressing
//! them inside bracket/paren nesting and after a trailing continuation
//! operator, so the parser never has to look at raw whitespace.
//!
//! Token text is kept verbatim — string and byte literal escapes (`*n`,
//! `*t`, …) are not interpreted here, and numeric literals are not parsed
//! into values. That conversion happens in `cpc-par`, once the parser
//! knows the surrounding grammatical context.

pub mod cursor;
mod lexer;
pub mod token;
pub mod unicode;

pub use lexer::Lexer;
pub use token::{keyword_from_ident, Token, TokenKind};

#[cfg(test)]
mod edge_cases;
