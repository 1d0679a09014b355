//! Top-level emission: package header, imports, intrinsic helpers, type
//! declarations, package-level abbreviations, procedure/function
//! definitions, and the generated entry point.

use cpc_ast::decl::ProtocolKind;
use cpc_ast::stmt::{FunctionBody, FunctionDecl, ProcDecl};
use cpc_ast::types::Param;
use cpc_ast::{Program, Stmt};
use cpc_util::{FxHashMap, FxHashSet, Symbol};

use crate::error::Result;
use crate::idents::translate_ident;
use crate::prepass::is_byref_param;
use crate::types::{channel_go_type, elem_go_type};
use crate::Generator;

impl Generator {
    pub(crate) fn render_header(&mut self) -> String {
        self.buf.clear();
        self.indent = 0;
        self.line("package main");
        self.blank_line();

        let mut imports = Vec::new();
        if self.needs.fmt {
            imports.push("\"fmt\"");
        }
        if self.needs.os {
            imports.push("\"os\"");
        }
        if self.needs.bufio {
            imports.push("\"bufio\"");
        }
        if self.needs.sync {
            imports.push("\"sync\"");
        }
        if self.needs.time {
            imports.push("\"time\"");
        }
        if self.needs.math {
            imports.push("\"math\"");
        }
        if self.needs.reflect {
            imports.push("\"reflect\"");
        }
        if self.needs.unsafe_ptr {
            imports.push("\"unsafe\"");
        }
        if !imports.is_empty() {
            self.line("import (");
            self.indent += 1;
            for import in imports {
                self.line(import);
            }
            self.indent -= 1;
            self.line(")");
            self.blank_line();
        }
        self.take_buf()
    }

    pub(crate) fn render_helpers(&mut self) -> String {
        self.buf.clear();
        self.indent = 0;
        if self.needs.time {
            self.line("func cpcTimerNow() int64 {");
            self.indent += 1;
            self.line("return time.Now().UnixMicro()");
            self.indent -= 1;
            self.line("}");
            self.blank_line();
        }
        if self.needs.after_helper {
            self.line("func cpcAfter(a, b int64) bool {");
            self.indent += 1;
            self.line("return a-b > 0");
            self.indent -= 1;
            self.line("}");
            self.blank_line();
        }
        if self.needs.transputer_helpers {
            self.render_transputer_helpers();
        }
        if self.needs.bool_to_int_helper {
            self.line("func cpcBoolToInt(b bool) int {");
            self.indent += 1;
            self.line("if b {");
            self.indent += 1;
            self.line("return 1");
            self.indent -= 1;
            self.line("}");
            self.line("return 0");
            self.indent -= 1;
            self.line("}");
            self.blank_line();
        }
        self.take_buf()
    }

    /// Fixed-32-bit-semantics helpers for the seven transputer double-word
    /// arithmetic intrinsics. Parameters and returns stay `int` (occam's own
    /// word type) so call sites never need a separate conversion; the
    /// 32-bit truncation happens inside each helper's own arithmetic.
    fn render_transputer_helpers(&mut self) {
        self.line("func LONGSUM(a, b, cin int) (int, int) {");
        self.indent += 1;
        self.line("sum := uint64(uint32(a)) + uint64(uint32(b)) + uint64(uint32(cin))");
        self.line("return int(sum >> 32), int(uint32(sum))");
        self.indent -= 1;
        self.line("}");
        self.blank_line();

        self.line("func LONGDIFF(a, b, bin int) (int, int) {");
        self.indent += 1;
        self.line("diff := int64(uint32(a)) - int64(uint32(b)) - int64(uint32(bin))");
        self.line("borrow := 0");
        self.line("if diff < 0 {");
        self.indent += 1;
        self.line("borrow = 1");
        self.line("diff += 1 << 32");
        self.indent -= 1;
        self.line("}");
        self.line("return borrow, int(uint32(diff))");
        self.indent -= 1;
        self.line("}");
        self.blank_line();

        self.line("func LONGPROD(a, b, c int) (int, int) {");
        self.indent += 1;
        self.line("prod := uint64(uint32(a))*uint64(uint32(b)) + uint64(uint32(c))");
        self.line("return int(uint32(prod >> 32)), int(uint32(prod))");
        self.indent -= 1;
        self.line("}");
        self.blank_line();

        self.line("func LONGDIV(hi, lo, div int) (int, int) {");
        self.indent += 1;
        self.line("dividend := uint64(uint32(hi))<<32 | uint64(uint32(lo))");
        self.line("divisor := uint64(uint32(div))");
        self.line("return int(dividend / divisor), int(dividend % divisor)");
        self.indent -= 1;
        self.line("}");
        self.blank_line();

        self.line("func NORMALISE(hi, lo int) (int, int, int) {");
        self.indent += 1;
        self.line("h, l := uint32(hi), uint32(lo)");
        self.line("places := 0");
        self.line("for h&0x80000000 == 0 && places < 64 {");
        self.indent += 1;
        self.line("h = h<<1 | l>>31");
        self.line("l = l << 1");
        self.line("places++");
        self.indent -= 1;
        self.line("}");
        self.line("return places, int(h), int(l)");
        self.indent -= 1;
        self.line("}");
        self.blank_line();

        self.line("func SHIFTLEFT(hi, lo, places int) (int, int) {");
        self.indent += 1;
        self.line("combined := uint64(uint32(hi))<<32 | uint64(uint32(lo))");
        self.line("shifted := combined << uint(places)");
        self.line("return int(uint32(shifted >> 32)), int(uint32(shifted))");
        self.indent -= 1;
        self.line("}");
        self.blank_line();

        self.line("func SHIFTRIGHT(hi, lo, places int) (int, int) {");
        self.indent += 1;
        self.line("combined := uint64(uint32(hi))<<32 | uint64(uint32(lo))");
        self.line("shifted := combined >> uint(places)");
        self.line("return int(uint32(shifted >> 32)), int(uint32(shifted))");
        self.indent -= 1;
        self.line("}");
        self.blank_line();
    }

    pub(crate) fn render_type_decls(&mut self) -> String {
        self.buf.clear();
        self.indent = 0;
        let records = self.records.clone();
        for (name, record) in &records {
            let go_name = translate_ident(name.as_str());
            self.line(&format!("type {go_name} struct {{"));
            self.indent += 1;
            for field in &record.fields {
                let field_name = translate_ident(field.name.as_str());
                let field_ty = elem_go_type(&field.ty);
                self.line(&format!("{field_name} {field_ty}"));
            }
            self.indent -= 1;
            self.line("}");
            self.blank_line();
        }

        let protocols = self.protocols.clone();
        for (name, proto) in &protocols {
            let go_name = translate_ident(name.as_str());
            match &proto.kind {
                ProtocolKind::Simple(elem) => {
                    self.line(&format!("type {go_name} = {}", elem_go_type(elem)));
                    self.blank_line();
                }
                ProtocolKind::Sequential(elems) => {
                    self.line(&format!("type {go_name} struct {{"));
                    self.indent += 1;
                    for (i, elem) in elems.iter().enumerate() {
                        self.line(&format!("F{i} {}", elem_go_type(elem)));
                    }
                    self.indent -= 1;
                    self.line("}");
                    self.blank_line();
                }
                ProtocolKind::Variant(variants) => {
                    self.line(&format!("type {go_name} interface {{"));
                    self.indent += 1;
                    self.line(&format!("is{go_name}()"));
                    self.indent -= 1;
                    self.line("}");
                    self.blank_line();
                    for variant in variants {
                        let tag_name = translate_ident(variant.tag.as_str());
                        let variant_go = format!("{go_name}_{tag_name}");
                        self.line(&format!("type {variant_go} struct {{"));
                        self.indent += 1;
                        for (i, payload_ty) in variant.payload.iter().enumerate() {
                            self.line(&format!("F{i} {}", elem_go_type(payload_ty)));
                        }
                        self.indent -= 1;
                        self.line("}");
                        self.blank_line();
                        self.line(&format!("func ({variant_go}) is{go_name}() {{}}"));
                        self.blank_line();
                    }
                }
            }
        }
        self.take_buf()
    }

    pub(crate) fn render_top_level_abbrevs(&mut self, program: &Program) -> String {
        self.buf.clear();
        self.indent = 0;
        for stmt in &program.stmts {
            if let Stmt::Abbrev(abbrev) = stmt {
                let name = translate_ident(abbrev.name.as_str());
                let value = self.lower_expr(&abbrev.value);
                self.line(&format!("var {name} = {value}"));
            }
        }
        if !self.buf.is_empty() {
            self.blank_line();
        }
        self.take_buf()
    }

    pub(crate) fn render_procs_and_functions(&mut self, program: &Program) -> Result<String> {
        self.buf.clear();
        self.indent = 0;
        for stmt in &program.stmts {
            match stmt {
                Stmt::Proc(p) => self.render_proc_decl(p)?,
                Stmt::Function(f) => self.render_function_decl(f)?,
                _ => {}
            }
        }
        Ok(self.take_buf())
    }

    pub(crate) fn render_entry(&mut self, program: &Program) -> Result<String> {
        self.buf.clear();
        self.indent = 0;
        if let Some(entry_name) = self.entry_proc {
            self.render_byte_harness(entry_name);
        } else {
            let loose_stmts: Vec<&Stmt> = program
                .stmts
                .iter()
                .filter(|s| !matches!(s, Stmt::Proc(_) | Stmt::Function(_)))
                .collect();
            if !loose_stmts.is_empty() {
                self.line("func main() {");
                self.indent += 1;
                self.scope_stack.push(FxHashMap::default());
                self.byref_locals.push(FxHashSet::default());
                for stmt in loose_stmts {
                    self.lower_stmt(stmt);
                }
                self.byref_locals.pop();
                self.scope_stack.pop();
                self.indent -= 1;
                self.line("}");
            }
        }
        Ok(self.take_buf())
    }

    /// Wires the single recognized top-level `(kb?, scr!, err!)` procedure
    /// to buffered byte channels backed by the process's own stdio.
    fn render_byte_harness(&mut self, entry_name: Symbol) {
        self.needs.bufio = true;
        self.needs.sync = true;
        self.needs.os = true;
        let entry = translate_ident(entry_name.as_str());

        self.line("func main() {");
        self.indent += 1;
        self.line("kb := make(chan byte, 256)");
        self.line("scr := make(chan byte, 256)");
        self.line("errc := make(chan byte, 256)");
        self.line("var wg sync.WaitGroup");
        self.line("wg.Add(2)");
        self.blank_line();
        self.line("go func() {");
        self.indent += 1;
        self.line("reader := bufio.NewReader(os.Stdin)");
        self.line("for {");
        self.indent += 1;
        self.line("b, err := reader.ReadByte()");
        self.line("if err != nil {");
        self.indent += 1;
        self.line("break");
        self.indent -= 1;
        self.line("}");
        self.line("kb <- b");
        self.indent -= 1;
        self.line("}");
        self.line("close(kb)");
        self.indent -= 1;
        self.line("}()");
        self.blank_line();
        self.line("go func() {");
        self.indent += 1;
        self.line("defer wg.Done()");
        self.line("w := bufio.NewWriter(os.Stdout)");
        self.line("defer w.Flush()");
        self.line("for b := range scr {");
        self.indent += 1;
        self.line("if b == 255 {");
        self.indent += 1;
        self.line("w.Flush()");
        self.line("continue");
        self.indent -= 1;
        self.line("}");
        self.line("w.WriteByte(b)");
        self.indent -= 1;
        self.line("}");
        self.indent -= 1;
        self.line("}()");
        self.blank_line();
        self.line("go func() {");
        self.indent += 1;
        self.line("defer wg.Done()");
        self.line("w := bufio.NewWriter(os.Stderr)");
        self.line("defer w.Flush()");
        self.line("for b := range errc {");
        self.indent += 1;
        self.line("if b == 255 {");
        self.indent += 1;
        self.line("w.Flush()");
        self.line("continue");
        self.indent -= 1;
        self.line("}");
        self.line("w.WriteByte(b)");
        self.indent -= 1;
        self.line("}");
        self.indent -= 1;
        self.line("}()");
        self.blank_line();
        self.line(&format!("{entry}(kb, scr, errc)"));
        self.line("close(scr)");
        self.line("close(errc)");
        self.line("wg.Wait()");
        self.indent -= 1;
        self.line("}");
    }

    fn render_params(&self, params: &[Param]) -> String {
        params
            .iter()
            .map(|p| {
                let name = translate_ident(p.name.as_str());
                let ty = self.param_go_type(p);
                format!("{name} {ty}")
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn param_go_type(&self, p: &Param) -> String {
        if p.is_channel {
            return channel_go_type(&p.ty, p.channel_direction, p.channel_array_dims > 0);
        }
        let mut base = elem_go_type(&p.ty);
        let dims = p.open_array_dims + if p.fixed_array_size.is_some() { 1 } else { 0 };
        if dims > 0 {
            for _ in 0..dims {
                base = format!("[]{base}");
            }
            return base;
        }
        if is_byref_param(p) {
            format!("*{base}")
        } else {
            base
        }
    }

    pub(crate) fn push_scope(&mut self, params: &[Param]) {
        let mut byref = FxHashSet::default();
        for param in params {
            if is_byref_param(param) {
                byref.insert(param.name);
            }
        }
        self.byref_locals.push(byref);
        self.scope_stack.push(FxHashMap::default());
    }

    pub(crate) fn pop_scope(&mut self) {
        self.byref_locals.pop();
        self.scope_stack.pop();
    }

    fn render_proc_decl(&mut self, p: &ProcDecl) -> Result<()> {
        let go_name = translate_ident(p.name.as_str());
        let params_str = self.render_params(&p.params);
        self.line(&format!("func {go_name}({params_str}) {{"));
        self.indent += 1;
        self.push_scope(&p.params);
        for stmt in &p.body {
            self.lower_stmt(stmt);
        }
        self.pop_scope();
        self.indent -= 1;
        self.line("}");
        self.blank_line();
        Ok(())
    }

    fn render_function_decl(&mut self, f: &FunctionDecl) -> Result<()> {
        let go_name = translate_ident(f.name.as_str());
        let params_str = self.render_params(&f.params);
        let rets: Vec<String> = f.ret_types.iter().map(elem_go_type).collect();
        let ret_str = match rets.len() {
            0 => String::new(),
            1 => format!(" {}", rets[0]),
            _ => format!(" ({})", rets.join(", ")),
        };
        self.line(&format!("func {go_name}({params_str}){ret_str} {{"));
        self.indent += 1;
        self.push_scope(&f.params);
        match &f.body {
            FunctionBody::ShortForm(expr) => {
                let rendered = self.lower_expr(expr);
                self.line(&format!("return {rendered}"));
            }
            FunctionBody::Block { decls, valof, results } => {
                for decl in decls {
                    self.lower_stmt(decl);
                }
                for stmt in valof {
                    self.lower_stmt(stmt);
                }
                let mut rendered = Vec::with_capacity(results.len());
                for result in results {
                    rendered.push(self.lower_expr(result));
                }
                self.line(&format!("return {}", rendered.join(", ")));
            }
        }
        self.pop_scope();
        self.indent -= 1;
        self.line("}");
        self.blank_line();
        Ok(())
    }
}
