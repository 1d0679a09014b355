//! Declaration statements: the non-executable, scope-introducing forms
//! that begin a type keyword (or `VAL`/`INITIAL`/`RETYPES`) and end with a
//! trailing `:`.

use cpc_util::{Span, Symbol};

use crate::expr::Expr;
use crate::types::{ElemType, Type};

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub ty: ElemType,
    pub names: Vec<Symbol>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ArrayDecl {
    /// One size expression per dimension, outermost first.
    pub dims: Vec<Expr>,
    pub elem_ty: ElemType,
    pub names: Vec<Symbol>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ChanDecl {
    pub elem_ty: ElemType,
    /// Zero or more size expressions for a channel-array declaration;
    /// empty means a plain (non-array) channel.
    pub array_dims: Vec<Expr>,
    pub names: Vec<Symbol>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TimerDecl {
    pub names: Vec<Symbol>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ProtocolVariant {
    pub tag: Symbol,
    pub payload: Vec<ElemType>,
}

#[derive(Debug, Clone)]
pub enum ProtocolKind {
    /// A single-value protocol: `PROTOCOL p IS INT:`.
    Simple(ElemType),
    /// An ordered tuple of values sent atomically: `PROTOCOL p IS INT; INT:`.
    Sequential(Vec<ElemType>),
    /// A tagged union, each tag communicating its own payload shape.
    Variant(Vec<ProtocolVariant>),
}

#[derive(Debug, Clone)]
pub struct ProtocolDecl {
    pub name: Symbol,
    pub kind: ProtocolKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct RecordField {
    pub ty: ElemType,
    pub name: Symbol,
}

#[derive(Debug, Clone)]
pub struct RecordDecl {
    pub name: Symbol,
    pub fields: Vec<RecordField>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbbrevQualifier {
    Val,
    Initial,
    None,
}

#[derive(Debug, Clone)]
pub struct Abbrev {
    pub qualifier: AbbrevQualifier,
    pub ty: Option<Type>,
    pub name: Symbol,
    pub value: Expr,
    pub span: Span,
}

/// `RETYPES`: bit-level reinterpretation of `source_name` as `target_ty`,
/// bound to `target_name`.
#[derive(Debug, Clone)]
pub struct RetypesDecl {
    pub is_val: bool,
    pub target_ty: Type,
    pub target_name: Symbol,
    pub source_name: Symbol,
    pub span: Span,
}
