//! Code generation: lowers a parsed program into target-language (Go)
//! source text.
//!
//! Generation is a single forward pass over the AST, preceded by read-only
//! collection passes (see [`prepass`]) that populate signature, protocol,
//! record, boolean-variable, and channel-typing tables the statement and
//! expression lowerers consult as they go. Import requirements are
//! discovered incidentally while lowering bodies, so the body text is
//! rendered into scratch buffers first and the package header/import
//! block/helper functions are rendered last, once every requirement is
//! known.

mod error;
mod expr;
mod idents;
mod items;
mod prepass;
mod stmt;
mod types;

#[cfg(test)]
mod edge_cases;

pub use error::{CodeGenError, Result};

use cpc_ast::decl::{ProtocolDecl, RecordDecl};
use cpc_ast::types::Param;
use cpc_ast::Program;
use cpc_util::{FxHashMap, FxHashSet, Symbol};
use indexmap::IndexMap;

use prepass::ChannelInfo;

/// Standard-library imports and helper functions a program turns out to
/// need, discovered while its body is lowered.
#[derive(Debug, Default, Clone, Copy)]
struct Needs {
    fmt: bool,
    os: bool,
    sync: bool,
    time: bool,
    math: bool,
    reflect: bool,
    unsafe_ptr: bool,
    bufio: bool,
    bool_to_int_helper: bool,
    after_helper: bool,
    transputer_helpers: bool,
}

pub struct Generator {
    protocols: IndexMap<Symbol, ProtocolDecl>,
    records: IndexMap<Symbol, RecordDecl>,
    bool_vars: FxHashSet<Symbol>,
    channels: FxHashMap<Symbol, ChannelInfo>,
    entry_proc: Option<Symbol>,
    top_sigs: FxHashMap<Symbol, Vec<Param>>,
    scope_stack: Vec<FxHashMap<Symbol, Vec<Param>>>,
    byref_locals: Vec<FxHashSet<Symbol>>,
    needs: Needs,
    indent: usize,
    buf: String,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            protocols: IndexMap::new(),
            records: IndexMap::new(),
            bool_vars: FxHashSet::default(),
            channels: FxHashMap::default(),
            entry_proc: None,
            top_sigs: FxHashMap::default(),
            scope_stack: Vec::new(),
            byref_locals: Vec::new(),
            needs: Needs::default(),
            indent: 0,
            buf: String::new(),
        }
    }
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.buf.push_str("\t");
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    fn blank_line(&mut self) {
        self.buf.push('\n');
    }

    fn take_buf(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }

    /// The signature nearest in scope for `name`: an enclosing `PROC`'s own
    /// local nested declarations shadow the top-level table.
    fn lookup_sig(&self, name: Symbol) -> Option<&Vec<Param>> {
        for scope in self.scope_stack.iter().rev() {
            if let Some(sig) = scope.get(&name) {
                return Some(sig);
            }
        }
        self.top_sigs.get(&name)
    }

    fn is_byref_in_scope(&self, name: Symbol) -> bool {
        self.byref_locals.last().is_some_and(|s| s.contains(&name))
    }

    fn collect(&mut self, program: &Program) {
        self.protocols = prepass::collect_protocols(program);
        self.records = prepass::collect_records(program);
        self.bool_vars = prepass::collect_bool_vars(program);
        self.channels = prepass::collect_channel_info(program);
        self.entry_proc = prepass::find_entry_byte_proc(&program.stmts);
        self.top_sigs = prepass::collect_top_level_signatures(&program.stmts);
    }

    /// Every top-level `PROC`/`FUNCTION` name, plus every `RECORD`/`PROTOCOL`
    /// name found anywhere (their Go type declarations are always emitted at
    /// the top level regardless of nesting), must stay distinct after
    /// [`idents::translate_ident`] — two source names that only differ by a
    /// `.` collapse onto the same Go identifier.
    fn check_top_level_collisions(&self, program: &Program) -> Result<()> {
        use cpc_util::FxHashMap;

        let mut seen: FxHashMap<String, Symbol> = FxHashMap::default();
        let mut check = |original: Symbol| -> Result<()> {
            let translated = idents::translate_ident(original.as_str());
            if let Some(prior) = seen.insert(translated.clone(), original) {
                if prior != original {
                    return Err(CodeGenError::NameCollision(translated));
                }
            }
            Ok(())
        };
        for stmt in &program.stmts {
            match stmt {
                cpc_ast::Stmt::Proc(p) => check(p.name)?,
                cpc_ast::Stmt::Function(f) => check(f.name)?,
                _ => {}
            }
        }
        for name in self.records.keys().chain(self.protocols.keys()) {
            check(*name)?;
        }
        Ok(())
    }

    pub fn generate(&mut self, program: &Program) -> Result<String> {
        self.collect(program);
        self.check_top_level_collisions(program)?;

        let types_src = self.render_type_decls();
        let abbrev_src = self.render_top_level_abbrevs(program);
        let funcs_src = self.render_procs_and_functions(program)?;
        let main_src = self.render_entry(program)?;

        // The header and helpers are rendered last: only now do we know
        // every standard-library import and intrinsic the body reached for.
        let header_src = self.render_header();
        let helpers_src = self.render_helpers();

        Ok(format!(
            "{header_src}{helpers_src}{types_src}{abbrev_src}{funcs_src}{main_src}"
        ))
    }
}

/// Convenience entry point equivalent to `Generator::new().generate(program)`.
pub fn generate(program: &Program) -> Result<String> {
    Generator::new().generate(program)
}
