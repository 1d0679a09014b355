//! Lexer module.
//!
//! This module organizes the lexer implementation into smaller, focused
//! components:
//! - `core` - main `Lexer` struct, the indentation state machine, and
//!   single-character dispatch
//! - `identifier` - identifier and keyword scanning
//! - `number` - decimal and `#`-hex integer literal scanning
//! - `string` - string and byte literal scanning
//! - `operator` - operator and punctuation scanning

mod core;
mod identifier;
mod number;
mod operator;
mod string;

pub use core::Lexer;
