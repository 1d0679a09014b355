//! Read-only passes over the AST that populate generator state before any
//! target text is written: procedure/function signatures (for
//! reference-parameter and call-site lowering), protocol and record
//! definitions (for type declarations and channel typing), the set of
//! boolean-typed variables (for bool↔numeric conversions), and channel
//! element/protocol information (for typing `select` case variables).

use cpc_ast::decl::{ProtocolDecl, RecordDecl};
use cpc_ast::expr::Expr;
use cpc_ast::stmt::{AltTarget, FunctionBody, IfChoice, Stmt};
use cpc_ast::types::{ChannelDirection, ElemType, Param, PrimitiveType};
use cpc_ast::Program;
use cpc_util::{FxHashMap, FxHashSet, Symbol};
use indexmap::IndexMap;

#[derive(Debug, Clone)]
pub struct ChannelInfo {
    pub elem: ElemType,
    pub direction: ChannelDirection,
    pub is_array: bool,
}

/// A parameter is pass-by-reference exactly when it is not `VAL`, not a
/// channel, and not any array-shaped form (the callee gets a pointer to a
/// single value, never to a slice header).
pub fn is_byref_param(p: &Param) -> bool {
    !p.is_value
        && !p.is_channel
        && p.channel_array_dims == 0
        && p.open_array_dims == 0
        && p.fixed_array_size.is_none()
}

/// Depth-first visitor over every statement reachable from `stmts`,
/// including statements nested inside `SEQ`/`PAR`/`IF`/`CASE`/`WHILE`/`ALT`
/// bodies and `PROC`/`FUNCTION` bodies. Local `RECORD`/`PROTOCOL`/`PROC`
/// declarations are visited exactly like top-level ones.
pub fn walk_stmts<'a>(stmts: &'a [Stmt], f: &mut impl FnMut(&'a Stmt)) {
    for stmt in stmts {
        f(stmt);
        match stmt {
            Stmt::Seq(s) => walk_stmts(&s.body, f),
            Stmt::Par(s) => walk_stmts(&s.body, f),
            Stmt::While(s) => walk_stmts(&s.body, f),
            Stmt::Proc(p) => walk_stmts(&p.body, f),
            Stmt::Function(func) => {
                if let FunctionBody::Block { decls, valof, .. } = &func.body {
                    walk_stmts(decls, f);
                    walk_stmts(valof, f);
                }
            }
            Stmt::If(i) => walk_if_choices(&i.choices, f),
            Stmt::Case(c) => {
                for choice in &c.choices {
                    walk_stmts(&choice.body, f);
                }
            }
            Stmt::Alt(a) => {
                for case in &a.cases {
                    walk_stmts(&case.scoped_decls, f);
                    walk_stmts(&case.body, f);
                }
            }
            Stmt::VariantReceive(v) => {
                for case in &v.cases {
                    walk_stmts(&case.body, f);
                }
            }
            _ => {}
        }
    }
}

fn walk_if_choices<'a>(choices: &'a [IfChoice], f: &mut impl FnMut(&'a Stmt)) {
    for choice in choices {
        match choice {
            IfChoice::Cond { body, .. } => walk_stmts(body, f),
            IfChoice::Nested(inner) => walk_if_choices(&inner.choices, f),
        }
    }
}

pub fn collect_top_level_signatures(stmts: &[Stmt]) -> FxHashMap<Symbol, Vec<Param>> {
    let mut map = FxHashMap::default();
    for stmt in stmts {
        match stmt {
            Stmt::Proc(p) => {
                map.insert(p.name, p.params.clone());
            }
            Stmt::Function(func) => {
                map.insert(func.name, func.params.clone());
            }
            _ => {}
        }
    }
    map
}

pub fn collect_protocols(program: &Program) -> IndexMap<Symbol, ProtocolDecl> {
    let mut map = IndexMap::new();
    walk_stmts(&program.stmts, &mut |stmt| {
        if let Stmt::ProtocolDecl(p) = stmt {
            map.insert(p.name, p.clone());
        }
    });
    map
}

pub fn collect_records(program: &Program) -> IndexMap<Symbol, RecordDecl> {
    let mut map = IndexMap::new();
    walk_stmts(&program.stmts, &mut |stmt| {
        if let Stmt::RecordDecl(r) = stmt {
            map.insert(r.name, r.clone());
        }
    });
    map
}

fn expr_is_bool_typed(bool_vars: &FxHashSet<Symbol>, e: &Expr) -> bool {
    matches!(e, Expr::Ident(name, _) if bool_vars.contains(name))
}

/// Names declared with `BOOL` anywhere in the program, so comparisons and
/// arithmetic on them can be told apart from integer operations at
/// lowering time without a full type checker.
pub fn collect_bool_vars(program: &Program) -> FxHashSet<Symbol> {
    let mut set = FxHashSet::default();
    walk_stmts(&program.stmts, &mut |stmt| match stmt {
        Stmt::VarDecl(d) if d.ty == ElemType::Primitive(PrimitiveType::Bool) => {
            set.extend(d.names.iter().copied());
        }
        Stmt::ArrayDecl(d) if d.elem_ty == ElemType::Primitive(PrimitiveType::Bool) => {
            set.extend(d.names.iter().copied());
        }
        Stmt::Proc(p) => {
            for param in &p.params {
                if !param.is_channel && param.ty == ElemType::Primitive(PrimitiveType::Bool) {
                    set.insert(param.name);
                }
            }
        }
        Stmt::Function(func) => {
            for param in &func.params {
                if !param.is_channel && param.ty == ElemType::Primitive(PrimitiveType::Bool) {
                    set.insert(param.name);
                }
            }
        }
        _ => {}
    });
    // fixed point: VAL abbreviations copying a bool expression are bool too.
    let mut changed = true;
    while changed {
        changed = false;
        walk_stmts(&program.stmts, &mut |stmt| {
            if let Stmt::Abbrev(a) = stmt {
                if expr_is_bool_typed(&set, &a.value) && !set.contains(&a.name) {
                    set.insert(a.name);
                    changed = true;
                }
            }
        });
    }
    set
}

/// Channel declarations anywhere in the program, keyed by channel name.
/// Channels that carry a protocol are recorded with `ElemType::Named` so
/// `select`/receive lowering can look the protocol kind up afterwards.
pub fn collect_channel_info(program: &Program) -> FxHashMap<Symbol, ChannelInfo> {
    let mut map = FxHashMap::default();
    walk_stmts(&program.stmts, &mut |stmt| {
        if let Stmt::ChanDecl(c) = stmt {
            for name in &c.names {
                map.insert(
                    *name,
                    ChannelInfo {
                        elem: c.elem_ty.clone(),
                        direction: ChannelDirection::Bidirectional,
                        is_array: !c.array_dims.is_empty(),
                    },
                );
            }
        }
        let params: &[Param] = match stmt {
            Stmt::Proc(p) => &p.params,
            Stmt::Function(f) => &f.params,
            _ => &[],
        };
        for param in params {
            if param.is_channel {
                map.insert(
                    param.name,
                    ChannelInfo {
                        elem: param.ty.clone(),
                        direction: param.channel_direction,
                        is_array: param.channel_array_dims > 0,
                    },
                );
            }
        }
    });
    map
}

/// The single top-level `PROC` whose signature is exactly
/// `(CHAN OF BYTE ?, CHAN OF BYTE !, CHAN OF BYTE !)`, if the program has
/// one — the target of a generated entry harness wiring stdin/stdout/stderr.
pub fn find_entry_byte_proc(stmts: &[Stmt]) -> Option<Symbol> {
    let mut found = None;
    for stmt in stmts {
        let Stmt::Proc(p) = stmt else { continue };
        if p.params.len() != 3 {
            continue;
        }
        let is_byte_chan = |param: &Param, dir: ChannelDirection| {
            param.is_channel
                && param.channel_array_dims == 0
                && param.ty == ElemType::Primitive(PrimitiveType::Byte)
                && param.channel_direction == dir
        };
        let shape = is_byte_chan(&p.params[0], ChannelDirection::Input)
            && is_byte_chan(&p.params[1], ChannelDirection::Output)
            && is_byte_chan(&p.params[2], ChannelDirection::Output);
        if shape {
            if found.is_some() {
                return None;
            }
            found = Some(p.name);
        }
    }
    found
}
