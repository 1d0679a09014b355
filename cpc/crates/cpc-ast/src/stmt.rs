//! Executable statement forms: assignment, communication, the structured
//! process constructs (`SEQ`/`PAR`/`ALT`/`IF`/`CASE`/`WHILE`), and
//! procedure/function declarations.

use cpc_util::{Span, Symbol};

use crate::decl::{Abbrev, ArrayDecl, ChanDecl, ProtocolDecl, RecordDecl, RetypesDecl, TimerDecl, VarDecl};
use crate::expr::{Expr, Literal};
use crate::types::{ElemType, Param};

/// `var = start FOR count [STEP step]`, attached to `SEQ`/`PAR`/`ALT`/`IF`.
#[derive(Debug, Clone)]
pub struct Replicator {
    pub var: Symbol,
    pub start: Expr,
    pub count: Expr,
    pub step: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct AssignTarget {
    pub name: Symbol,
    pub indices: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub enum AssignLhs {
    Target(AssignTarget),
    /// `[arr FROM start FOR length] := src`.
    Slice {
        array: Symbol,
        start: Expr,
        length: Expr,
    },
}

#[derive(Debug, Clone)]
pub struct Assignment {
    pub target: AssignLhs,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MultiAssignment {
    pub targets: Vec<AssignTarget>,
    pub values: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ChannelSend {
    pub channel: Symbol,
    pub channel_indices: Vec<Expr>,
    pub value: Expr,
    /// Trailing values for a sequential-protocol send.
    pub extra_values: Vec<Expr>,
    /// Variant tag, present only when sending on a variant protocol.
    pub variant_tag: Option<Symbol>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ChannelReceive {
    pub channel: Symbol,
    pub channel_indices: Vec<Expr>,
    pub var: Symbol,
    pub var_indices: Vec<Expr>,
    /// Trailing variable names for a sequential-protocol receive.
    pub extra_vars: Vec<Symbol>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TimerRead {
    pub timer: Symbol,
    pub var: Symbol,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VariantCase {
    pub tag: Symbol,
    pub payload_vars: Vec<Symbol>,
    pub body: Vec<Stmt>,
}

/// `chan ? CASE` — dispatches on a variant protocol's tag.
#[derive(Debug, Clone)]
pub struct VariantReceive {
    pub channel: Symbol,
    pub channel_indices: Vec<Expr>,
    pub cases: Vec<VariantCase>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SeqBlock {
    pub replicator: Option<Replicator>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ParBlock {
    pub replicator: Option<Replicator>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// What an `ALT` case waits on. Exactly one of these holds per case.
#[derive(Debug, Clone)]
pub enum AltTarget {
    Channel {
        channel: Symbol,
        channel_indices: Vec<Expr>,
        var: Symbol,
        var_indices: Vec<Expr>,
    },
    TimerAfter {
        timer: Symbol,
        deadline: Expr,
    },
    Skip,
}

#[derive(Debug, Clone)]
pub struct AltCase {
    pub guard: Option<Expr>,
    pub target: AltTarget,
    /// Declarations scoped between the guard and the communication,
    /// visible only inside this case's body.
    pub scoped_decls: Vec<Stmt>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct AltBlock {
    pub replicator: Option<Replicator>,
    /// `PRI ALT` vs plain `ALT`; lowers identically, priority unenforced.
    pub priority: bool,
    pub cases: Vec<AltCase>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum IfChoice {
    Cond {
        cond: Expr,
        body: Vec<Stmt>,
        span: Span,
    },
    /// A choice that is itself a nested `IF`, inlined or lowered specially
    /// by the code generator depending on whether it is replicated.
    Nested(Box<IfStmt>),
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub replicator: Option<Replicator>,
    pub choices: Vec<IfChoice>,
    pub span: Span,
}

/// A `CASE` arm; an empty `values` list denotes the `ELSE` arm.
#[derive(Debug, Clone)]
pub struct CaseChoice {
    pub values: Vec<Literal>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CaseStmt {
    pub selector: Expr,
    pub choices: Vec<CaseChoice>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ProcDecl {
    pub name: Symbol,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum FunctionBody {
    /// `FUNCTION f (...) IS expr`.
    ShortForm(Expr),
    /// A `VALOF` block: local declarations, a process, then `RESULT`.
    Block {
        decls: Vec<Stmt>,
        valof: Vec<Stmt>,
        results: Vec<Expr>,
    },
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: Symbol,
    pub ret_types: Vec<ElemType>,
    pub params: Vec<Param>,
    pub body: FunctionBody,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ProcCall {
    pub name: Symbol,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    VarDecl(VarDecl),
    ArrayDecl(ArrayDecl),
    ChanDecl(ChanDecl),
    TimerDecl(TimerDecl),
    ProtocolDecl(ProtocolDecl),
    RecordDecl(RecordDecl),
    Abbrev(Abbrev),
    Retypes(RetypesDecl),
    Assign(Assignment),
    MultiAssign(MultiAssignment),
    ChannelSend(ChannelSend),
    ChannelReceive(ChannelReceive),
    TimerRead(TimerRead),
    VariantReceive(VariantReceive),
    Seq(SeqBlock),
    Par(ParBlock),
    Alt(AltBlock),
    If(IfStmt),
    Case(CaseStmt),
    While(WhileStmt),
    Proc(ProcDecl),
    Function(FunctionDecl),
    Call(ProcCall),
    Skip(Span),
    Stop(Span),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::VarDecl(d) => d.span,
            Stmt::ArrayDecl(d) => d.span,
            Stmt::ChanDecl(d) => d.span,
            Stmt::TimerDecl(d) => d.span,
            Stmt::ProtocolDecl(d) => d.span,
            Stmt::RecordDecl(d) => d.span,
            Stmt::Abbrev(d) => d.span,
            Stmt::Retypes(d) => d.span,
            Stmt::Assign(s) => s.span,
            Stmt::MultiAssign(s) => s.span,
            Stmt::ChannelSend(s) => s.span,
            Stmt::ChannelReceive(s) => s.span,
            Stmt::TimerRead(s) => s.span,
            Stmt::VariantReceive(s) => s.span,
            Stmt::Seq(s) => s.span,
            Stmt::Par(s) => s.span,
            Stmt::Alt(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::Case(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::Proc(s) => s.span,
            Stmt::Function(s) => s.span,
            Stmt::Call(s) => s.span,
            Stmt::Skip(s) => *s,
            Stmt::Stop(s) => *s,
        }
    }
}

/// A complete source file: a flat, ordered sequence of top-level
/// statements (procedure/function declarations and, for a library-less
/// program, the entry process itself).
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}
