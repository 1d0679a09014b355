//! cpc-util - Core Utilities and Foundation Types
//!
//! This crate provides the fundamental utilities shared across the cpc compiler
//! pipeline: string interning ([`symbol`]), source location tracking
//! ([`span`]), typed index vectors ([`index_vec`]), definition identifiers
//! ([`def_id`]), and diagnostic reporting ([`diagnostic`]).
//!
//! None of these types are specific to any single compiler phase; they are the
//! common currency passed between the preprocessor, lexer, parser, and code
//! generator.

pub mod def_id;
pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use def_id::{DefId, DefIdGenerator};
pub use diagnostic::Handler;
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, Span};
pub use symbol::Symbol;

pub use error::{
    DiagnosticError, DiagnosticResult, IndexVecError, IndexVecResult, SourceMapError,
    SourceMapResult, SymbolError, SymbolResult,
};

pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
