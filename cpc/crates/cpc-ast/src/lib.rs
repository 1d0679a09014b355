//! cpc-ast - Abstract syntax tree definitions
//!
//! Plain owned-tree node types shared by the parser (which builds them) and
//! the code generator (which walks them). Every node is owned by its
//! parent — there is no sharing and no arena — so ownership mirrors the
//! grammar directly: a `Program` is a `Vec<Stmt>`, and every compound
//! statement or expression holds its children behind a `Box` or `Vec`.
//!
//! Nodes carry a [`cpc_util::Span`] rather than a lexer token: this keeps
//! the AST crate independent of `cpc-lex`, matching the pipeline's
//! dependency order where the code generator depends on the AST alone.

pub mod decl;
pub mod expr;
pub mod stmt;
pub mod types;

pub use decl::{
    Abbrev, AbbrevQualifier, ArrayDecl, ChanDecl, ProtocolDecl, ProtocolKind, ProtocolVariant,
    RecordDecl, RecordField, RetypesDecl, TimerDecl, VarDecl,
};
pub use expr::{
    BinOp, BinaryExpr, CallExpr, ConversionExpr, Expr, IndexExpr, IntBase, Literal,
    RoundingQualifier, SliceExpr, UnOp, UnaryExpr,
};
pub use stmt::{
    AltBlock, AltCase, AltTarget, AssignLhs, AssignTarget, Assignment, CaseChoice, CaseStmt,
    ChannelReceive, ChannelSend, FunctionBody, FunctionDecl, IfChoice, IfStmt, MultiAssignment,
    ParBlock, Program, ProcCall, ProcDecl, Replicator, SeqBlock, Stmt, TimerRead, VariantCase,
    VariantReceive, WhileStmt,
};
pub use types::{ArrayDim, ChannelDirection, ElemType, Param, PrimitiveType, Type};
