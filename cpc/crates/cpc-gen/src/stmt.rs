//! Statement lowering: every executable and declaration-shaped AST node
//! becomes zero or more lines of target source text, written directly into
//! the generator's scratch buffer so nested blocks inherit the current
//! indentation.

use cpc_ast::decl::ProtocolKind;
use cpc_ast::expr::{Expr, Literal};
use cpc_ast::stmt::{
    AltTarget, AssignLhs, CaseChoice, FunctionBody, IfChoice, Stmt,
};
use cpc_ast::types::{ArrayDim, ElemType, PrimitiveType, Type};
use cpc_util::Symbol;

use crate::idents::translate_ident;
use crate::prepass::is_byref_param;
use crate::types::{channel_go_type, elem_go_type, go_type};
use crate::Generator;

impl Generator {
    pub(crate) fn lower_block(&mut self, body: &[Stmt]) {
        for stmt in body {
            self.lower_stmt(stmt);
        }
    }

    pub(crate) fn lower_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(d) => {
                let names: Vec<String> = d.names.iter().map(|n| translate_ident(n.as_str())).collect();
                let ty = elem_go_type(&d.ty);
                self.line(&format!("var {} {ty}", names.join(", ")));
            }
            Stmt::ArrayDecl(d) => self.lower_array_decl(d),
            Stmt::ChanDecl(d) => self.lower_chan_decl(d),
            Stmt::TimerDecl(_) => {
                self.needs.time = true;
                // A timer has no state of its own; reads call `cpcTimerNow()` directly.
            }
            Stmt::ProtocolDecl(_) | Stmt::RecordDecl(_) => {
                // Locally-scoped record/protocol declarations reuse the same
                // rendering as top-level ones; emitted once up front by the
                // type-declaration pass, so a nested occurrence is a no-op here.
            }
            Stmt::Abbrev(a) => {
                let name = translate_ident(a.name.as_str());
                let value = self.lower_expr(&a.value);
                self.line(&format!("{name} := {value}"));
            }
            Stmt::Retypes(r) => self.lower_retypes(r),
            Stmt::Assign(a) => {
                let value = self.lower_expr(&a.value);
                let target = self.lower_assign_lhs(&a.target);
                match &a.target {
                    AssignLhs::Slice { .. } => self.line(&format!("copy({target}, {value})")),
                    AssignLhs::Target(_) => self.line(&format!("{target} = {value}")),
                }
            }
            Stmt::MultiAssign(m) => {
                let targets: Vec<String> = m
                    .targets
                    .iter()
                    .map(|t| self.lower_assign_target(t))
                    .collect();
                let mut values = Vec::with_capacity(m.values.len());
                for value in &m.values {
                    values.push(self.lower_expr(value));
                }
                self.line(&format!("{} = {}", targets.join(", "), values.join(", ")));
            }
            Stmt::ChannelSend(s) => self.lower_channel_send(s),
            Stmt::ChannelReceive(r) => self.lower_channel_receive(r),
            Stmt::TimerRead(t) => {
                self.needs.time = true;
                let var = translate_ident(t.var.as_str());
                self.line(&format!("{var} = cpcTimerNow()"));
            }
            Stmt::VariantReceive(v) => self.lower_variant_receive(v),
            Stmt::Seq(s) => self.lower_seq(s),
            Stmt::Par(p) => self.lower_par(p),
            Stmt::Alt(a) => self.lower_alt(a),
            Stmt::If(i) => self.lower_if(&i.choices),
            Stmt::Case(c) => self.lower_case(&c.selector, &c.choices),
            Stmt::While(w) => {
                let cond = self.lower_expr(&w.cond);
                self.line(&format!("for {cond} {{"));
                self.indent += 1;
                self.lower_block(&w.body);
                self.indent -= 1;
                self.line("}");
            }
            Stmt::Proc(p) => self.lower_nested_proc(p),
            Stmt::Function(f) => self.lower_nested_function(f),
            Stmt::Call(c) => self.lower_proc_call(c),
            Stmt::Skip(_) => {}
            Stmt::Stop(_) => {
                self.needs.fmt = true;
                self.needs.os = true;
                self.line("fmt.Fprintln(os.Stderr, \"STOP\")");
                self.line("select {}");
            }
        }
    }

    fn go_array_type(&self, elem_ty: &ElemType, dims: usize) -> String {
        let mut base = elem_go_type(elem_ty);
        for _ in 0..dims {
            base = format!("[]{base}");
        }
        base
    }

    /// `name := make([]T, n)`; dimensions beyond the first are allocated
    /// row-by-row since Go has no multi-dimensional `make`.
    fn lower_array_decl(&mut self, d: &cpc_ast::decl::ArrayDecl) {
        let dims: Vec<String> = d.dims.iter().map(|e| self.lower_expr(e)).collect();
        let names = d.names.clone();
        for name in &names {
            let go_name = translate_ident(name.as_str());
            let full_ty = self.go_array_type(&d.elem_ty, dims.len());
            self.line(&format!("{go_name} := make({full_ty}, {})", dims[0]));
            self.lower_array_rows(&go_name, &d.elem_ty, &dims, 1);
        }
    }

    fn lower_array_rows(&mut self, name: &str, elem_ty: &ElemType, dims: &[String], depth: usize) {
        if depth >= dims.len() {
            return;
        }
        let row_ty = self.go_array_type(elem_ty, dims.len() - depth);
        self.line(&format!("for i{depth} := range {name} {{"));
        self.indent += 1;
        let indexed = format!("{name}[i{depth}]");
        self.line(&format!("{indexed} = make({row_ty}, {})", dims[depth]));
        self.lower_array_rows(&indexed, elem_ty, dims, depth + 1);
        self.indent -= 1;
        self.line("}");
    }

    fn lower_chan_decl(&mut self, d: &cpc_ast::decl::ChanDecl) {
        let go_elem = elem_go_type(&d.elem_ty);
        for name in &d.names {
            let go_name = translate_ident(name.as_str());
            if d.array_dims.is_empty() {
                self.line(&format!("{go_name} := make(chan {go_elem})"));
            } else {
                let dim = self.lower_expr(&d.array_dims[0]);
                self.line(&format!("{go_name} := make([]chan {go_elem}, {dim})"));
                self.line(&format!("for i := range {go_name} {{"));
                self.indent += 1;
                self.line(&format!("{go_name}[i] = make(chan {go_elem})"));
                self.indent -= 1;
                self.line("}");
            }
        }
    }

    /// Bit-pattern reinterpretation via `unsafe.Pointer`. When the target
    /// shadows the source name, the source is captured under a temporary
    /// first so the pointer doesn't alias the binding it's replacing.
    fn lower_retypes(&mut self, r: &cpc_ast::decl::RetypesDecl) {
        let target = translate_ident(r.target_name.as_str());
        let source = translate_ident(r.source_name.as_str());

        if let Some(elem_ty) = double_word_array_elem(&r.target_ty) {
            // A 2-element integer array reinterpreting a 64-bit float is not
            // one pointer-sized value: a slice header and a float64 don't
            // share a bit layout, so the two 32-bit words are split out of
            // the float's own bit pattern instead of cast through a pointer.
            self.needs.math = true;
            let bits = format!("math.Float64bits({source})");
            let lower = format!("{elem_ty}(uint32({bits}))");
            let upper = format!("{elem_ty}(uint32({bits} >> 32))");
            self.line(&format!("{target} := []{elem_ty}{{{lower}, {upper}}}"));
            return;
        }

        self.needs.unsafe_ptr = true;
        let ty = go_type(&r.target_ty);
        if target == source {
            let tmp = format!("{source}RetypesSrc");
            self.line(&format!("{tmp} := {source}"));
            self.line(&format!("{target} := *(*{ty})(unsafe.Pointer(&{tmp}))"));
        } else {
            self.line(&format!("{target} := *(*{ty})(unsafe.Pointer(&{source}))"));
        }
    }

    fn lower_assign_target(&mut self, t: &cpc_ast::stmt::AssignTarget) -> String {
        let base = translate_ident(t.name.as_str());
        let base = if self.is_byref_in_scope(t.name) { format!("(*{base})") } else { base };
        let mut rendered = base;
        for index in &t.indices {
            let i = self.lower_expr(index);
            rendered = format!("{rendered}[{i}]");
        }
        rendered
    }

    fn lower_assign_lhs(&mut self, lhs: &AssignLhs) -> String {
        match lhs {
            AssignLhs::Target(t) => self.lower_assign_target(t),
            AssignLhs::Slice { array, start, length } => {
                let array = translate_ident(array.as_str());
                let start = self.lower_expr(start);
                let length = self.lower_expr(length);
                format!("{array}[{start}:{start}+{length}]")
            }
        }
    }

    fn lower_channel_send(&mut self, s: &cpc_ast::stmt::ChannelSend) {
        let channel = self.lower_channel_ref(s.channel, &s.channel_indices);
        let protocol = self.protocol_for_channel(s.channel);

        // The parser has no protocol table, so a variant send's tag arrives
        // indistinguishable from a plain value: `c ! data ; 42` parses with
        // `value` holding the `data` identifier and `42` as the sole extra
        // value. Resolve the tag here, where the channel's protocol is
        // known, by checking whether `value` names one of its variants.
        if let Some((proto_name, ProtocolKind::Variant(variants))) = &protocol {
            if s.variant_tag.is_none() {
                if let Expr::Ident(name, _) = &s.value {
                    if variants.iter().any(|v| v.tag == *name) {
                        let variant_go =
                            format!("{}_{}", translate_ident(proto_name.as_str()), translate_ident(name.as_str()));
                        let mut payload = Vec::with_capacity(s.extra_values.len());
                        for extra in &s.extra_values {
                            payload.push(self.lower_expr(extra));
                        }
                        let fields: Vec<String> = payload
                            .iter()
                            .enumerate()
                            .map(|(i, v)| format!("F{i}: {v}"))
                            .collect();
                        self.line(&format!("{channel} <- {variant_go}{{{}}}", fields.join(", ")));
                        return;
                    }
                }
            }
        }

        let mut values = vec![self.lower_expr(&s.value)];
        for extra in &s.extra_values {
            values.push(self.lower_expr(extra));
        }
        let payload = match (&protocol, &s.variant_tag) {
            (Some((proto_name, ProtocolKind::Variant(_))), Some(tag)) => {
                let variant_go = format!("{}_{}", translate_ident(proto_name.as_str()), translate_ident(tag.as_str()));
                let fields: Vec<String> = values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| format!("F{i}: {v}"))
                    .collect();
                format!("{variant_go}{{{}}}", fields.join(", "))
            }
            (Some((proto_name, ProtocolKind::Sequential(_))), _) if values.len() > 1 => {
                let go_name = translate_ident(proto_name.as_str());
                let fields: Vec<String> = values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| format!("F{i}: {v}"))
                    .collect();
                format!("{go_name}{{{}}}", fields.join(", "))
            }
            _ => values.into_iter().next().unwrap_or_default(),
        };
        self.line(&format!("{channel} <- {payload}"));
    }

    fn lower_channel_receive(&mut self, r: &cpc_ast::stmt::ChannelReceive) {
        let channel = self.lower_channel_ref(r.channel, &r.channel_indices);
        let var = translate_ident(r.var.as_str());
        if r.extra_vars.is_empty() {
            self.line(&format!("{var} = <-{channel}"));
        } else {
            let tmp = format!("{var}Msg");
            self.line(&format!("{tmp} := <-{channel}"));
            self.line(&format!("{var} = {tmp}.F0"));
            for (i, extra) in r.extra_vars.iter().enumerate() {
                let extra_name = translate_ident(extra.as_str());
                self.line(&format!("{extra_name} = {tmp}.F{}", i + 1));
            }
        }
    }

    fn lower_variant_receive(&mut self, v: &cpc_ast::stmt::VariantReceive) {
        let channel = self.lower_channel_ref(v.channel, &v.channel_indices);
        let proto_name = self.protocol_for_channel(v.channel).map(|(n, _)| n);
        self.line(&format!("switch msg := (<-{channel}).(type) {{"));
        self.indent += 1;
        for case in &v.cases {
            let go_proto = proto_name.map(|n| translate_ident(n.as_str())).unwrap_or_default();
            let tag = translate_ident(case.tag.as_str());
            let variant_go = format!("{go_proto}_{tag}");
            self.line(&format!("case {variant_go}:"));
            self.indent += 1;
            for (i, payload_var) in case.payload_vars.iter().enumerate() {
                let name = translate_ident(payload_var.as_str());
                self.line(&format!("{name} := msg.F{i}"));
            }
            self.lower_block(&case.body);
            self.indent -= 1;
        }
        self.indent -= 1;
        self.line("}");
    }

    fn lower_channel_ref(&mut self, channel: Symbol, indices: &[Expr]) -> String {
        let mut rendered = translate_ident(channel.as_str());
        for index in indices {
            let i = self.lower_expr(index);
            rendered = format!("{rendered}[{i}]");
        }
        rendered
    }

    fn protocol_for_channel(&self, channel: Symbol) -> Option<(Symbol, ProtocolKind)> {
        let info = self.channels.get(&channel)?;
        let ElemType::Named(proto_name) = info.elem else { return None };
        let proto = self.protocols.get(&proto_name)?;
        Some((proto_name, proto.kind.clone()))
    }

    fn lower_seq(&mut self, s: &cpc_ast::stmt::SeqBlock) {
        match &s.replicator {
            None => self.lower_block(&s.body),
            Some(rep) => {
                self.with_replicator_for(rep, |gen| gen.lower_block(&s.body));
            }
        }
    }

    /// `go func() { defer wg.Done(); body }()` per parallel branch, joined
    /// with a `sync.WaitGroup`.
    fn lower_par(&mut self, p: &cpc_ast::stmt::ParBlock) {
        self.needs.sync = true;
        match &p.replicator {
            None => {
                self.line("{");
                self.indent += 1;
                self.line("var wg sync.WaitGroup");
                for stmt in &p.body {
                    self.line("wg.Add(1)");
                    self.line("go func() {");
                    self.indent += 1;
                    self.line("defer wg.Done()");
                    self.lower_stmt(stmt);
                    self.indent -= 1;
                    self.line("}()");
                }
                self.line("wg.Wait()");
                self.indent -= 1;
                self.line("}");
            }
            Some(rep) => {
                let var = translate_ident(rep.var.as_str());
                let start = self.lower_expr(&rep.start);
                let count = self.lower_expr(&rep.count);
                let step = rep.step.as_ref().map(|s| self.lower_expr(s)).unwrap_or_else(|| "1".to_string());
                self.line("{");
                self.indent += 1;
                self.line("var wg sync.WaitGroup");
                self.line(&format!(
                    "for {var} := {start}; {var} < {start}+{count}; {var} += {step} {{"
                ));
                self.indent += 1;
                self.line("wg.Add(1)");
                self.line(&format!("go func({var} int) {{"));
                self.indent += 1;
                self.line("defer wg.Done()");
                self.lower_block(&p.body);
                self.indent -= 1;
                self.line(&format!("}}({var})"));
                self.indent -= 1;
                self.line("}");
                self.line("wg.Wait()");
                self.indent -= 1;
                self.line("}");
            }
        }
    }

    fn with_replicator_for(&mut self, rep: &cpc_ast::stmt::Replicator, f: impl FnOnce(&mut Self)) {
        let var = translate_ident(rep.var.as_str());
        let start = self.lower_expr(&rep.start);
        let count = self.lower_expr(&rep.count);
        let step = rep.step.as_ref().map(|s| self.lower_expr(s)).unwrap_or_else(|| "1".to_string());
        self.line(&format!("for {var} := {start}; {var} < {start}+{count}; {var} += {step} {{"));
        self.indent += 1;
        f(self);
        self.indent -= 1;
        self.line("}");
    }

    /// A static (non-replicated) `ALT` lowers directly to `select`; guarded
    /// cases route through a channel variable that is `nil` when the guard
    /// is false, since a `nil` channel never becomes ready in a `select`.
    /// A replicated `ALT` (a variable number of cases) needs `reflect.Select`
    /// instead, since Go's `select` statement has a fixed case count.
    fn lower_alt(&mut self, a: &cpc_ast::stmt::AltBlock) {
        if a.replicator.is_some() {
            self.lower_replicated_alt(a);
            return;
        }
        let mut guard_decls = Vec::new();
        for (i, case) in a.cases.iter().enumerate() {
            if case.guard.is_some() {
                if let AltTarget::Channel { channel, channel_indices, .. } = &case.target {
                    let real = self.lower_channel_ref(*channel, channel_indices);
                    let guard = self.lower_expr(case.guard.as_ref().unwrap());
                    let alt_ty = self.channel_ref_go_type(*channel);
                    let var = format!("altGuard{i}");
                    guard_decls.push((var.clone(), alt_ty, guard, real));
                }
            }
        }
        for (var, ty, guard, real) in &guard_decls {
            self.line(&format!("var {var} {ty}"));
            self.line(&format!("if {guard} {{"));
            self.indent += 1;
            self.line(&format!("{var} = {real}"));
            self.indent -= 1;
            self.line("} else {");
            self.indent += 1;
            self.line(&format!("{var} = nil"));
            self.indent -= 1;
            self.line("}");
        }

        self.line("select {");
        self.indent += 1;
        for (i, case) in a.cases.iter().enumerate() {
            self.lower_block(&case.scoped_decls);
            match &case.target {
                AltTarget::Skip => {
                    self.line("default:");
                }
                AltTarget::TimerAfter { deadline, .. } => {
                    self.needs.time = true;
                    let d = self.lower_expr(deadline);
                    self.line(&format!("case <-time.After(time.Duration({d}) * time.Microsecond):"));
                }
                AltTarget::Channel { channel, channel_indices, var, var_indices } => {
                    let chan_ref = if case.guard.is_some() {
                        format!("altGuard{i}")
                    } else {
                        self.lower_channel_ref(*channel, channel_indices)
                    };
                    let target_var = self.lower_assign_target(&cpc_ast::stmt::AssignTarget {
                        name: *var,
                        indices: var_indices.clone(),
                    });
                    self.line(&format!("case {target_var} = <-{chan_ref}:"));
                }
            }
            self.indent += 1;
            self.lower_block(&case.body);
            self.indent -= 1;
        }
        self.indent -= 1;
        self.line("}");
    }

    fn lower_replicated_alt(&mut self, a: &cpc_ast::stmt::AltBlock) {
        self.needs.reflect = true;
        let rep = a.replicator.as_ref().expect("checked by caller");
        let var = translate_ident(rep.var.as_str());
        let start = self.lower_expr(&rep.start);
        let count = self.lower_expr(&rep.count);
        self.line("{");
        self.indent += 1;
        self.line("var cases []reflect.SelectCase");
        self.line(&format!("for {var} := {start}; {var} < {start}+{count}; {var}++ {{"));
        self.indent += 1;
        // Only the first (representative) case shape is known statically;
        // replicated ALT bodies are expected to share one channel form.
        if let Some(case) = a.cases.first() {
            if let AltTarget::Channel { channel, channel_indices, .. } = &case.target {
                let chan_ref = self.lower_channel_ref(*channel, channel_indices);
                self.line(&format!(
                    "cases = append(cases, reflect.SelectCase{{Dir: reflect.SelectRecv, Chan: reflect.ValueOf({chan_ref})}})"
                ));
            }
        }
        self.indent -= 1;
        self.line("}");
        self.line("chosen, recv, _ := reflect.Select(cases)");
        self.line(&format!("{var} := chosen + {start}"));
        self.line(&format!("_ = {var}"));
        if let Some(case) = a.cases.first() {
            if let AltTarget::Channel { var: case_var, .. } = &case.target {
                let name = translate_ident(case_var.as_str());
                self.line(&format!("{name} := recv.Interface()"));
            }
            self.lower_block(&case.body);
        }
        self.indent -= 1;
        self.line("}");
    }

    fn channel_ref_go_type(&self, channel: Symbol) -> String {
        match self.channels.get(&channel) {
            Some(info) => channel_go_type(&info.elem, info.direction, info.is_array),
            None => "chan int".to_string(),
        }
    }

    /// Non-replicated nested `IF` choices are inlined into the parent
    /// `if`/`else if` chain; a replicated nested choice becomes its own
    /// bounded loop that sets a `matched` flag, since it represents a
    /// variable number of conditions the parent chain can't spell out.
    fn lower_if(&mut self, choices: &[IfChoice]) {
        self.lower_if_from(choices, true);
    }

    fn lower_if_from(&mut self, choices: &[IfChoice], is_first: bool) {
        let Some((choice, rest)) = choices.split_first() else {
            return;
        };
        match choice {
            IfChoice::Cond { cond, body, .. } => {
                let c = self.lower_expr(cond);
                let keyword = if is_first { "if" } else { "} else if" };
                self.line(&format!("{keyword} {c} {{"));
                self.indent += 1;
                self.lower_block(body);
                self.indent -= 1;
                if rest.is_empty() {
                    self.line("}");
                } else {
                    self.lower_if_from(rest, false);
                }
            }
            IfChoice::Nested(inner) => {
                if inner.replicator.is_some() {
                    if !is_first {
                        self.line("} else {");
                        self.indent += 1;
                    }
                    self.lower_replicated_if(inner, rest);
                    if !is_first {
                        self.indent -= 1;
                        self.line("}");
                    }
                } else {
                    // Flatten: the nested IF's own choices splice straight
                    // into this chain as if they were written at this level.
                    let mut flattened = inner.choices.clone();
                    flattened.extend_from_slice(rest);
                    self.lower_if_from(&flattened, is_first);
                }
            }
        }
    }

    fn lower_replicated_if(&mut self, inner: &cpc_ast::stmt::IfStmt, continuation: &[IfChoice]) {
        let rep = inner.replicator.as_ref().expect("checked by caller");
        let var = translate_ident(rep.var.as_str());
        let start = self.lower_expr(&rep.start);
        let count = self.lower_expr(&rep.count);
        self.line("matched := false");
        self.line(&format!(
            "for {var} := {start}; {var} < {start}+{count} && !matched; {var}++ {{"
        ));
        self.indent += 1;
        self.lower_if_matched(&inner.choices);
        self.indent -= 1;
        self.line("}");
        if !continuation.is_empty() {
            self.line("if !matched {");
            self.indent += 1;
            self.lower_if_from(continuation, true);
            self.indent -= 1;
            self.line("}");
        }
    }

    fn lower_if_matched(&mut self, choices: &[IfChoice]) {
        for (i, choice) in choices.iter().enumerate() {
            let IfChoice::Cond { cond, body, .. } = choice else {
                continue;
            };
            let c = self.lower_expr(cond);
            let keyword = if i == 0 { "if" } else { "} else if" };
            self.line(&format!("{keyword} {c} {{"));
            self.indent += 1;
            self.line("matched = true");
            self.lower_block(body);
            self.indent -= 1;
        }
        self.line("}");
    }

    fn lower_case(&mut self, selector: &Expr, choices: &[CaseChoice]) {
        let sel = self.lower_expr(selector);
        self.line(&format!("switch {sel} {{"));
        self.indent += 1;
        for choice in choices {
            if choice.values.is_empty() {
                self.line("default:");
            } else {
                let values: Vec<String> = choice
                    .values
                    .iter()
                    .map(|lit| self.lower_expr(&Expr::Literal(lit.clone(), cpc_util::Span::new(0, 1, 1, 1))))
                    .collect();
                self.line(&format!("case {}:", values.join(", ")));
            }
            self.indent += 1;
            self.lower_block(&choice.body);
            self.indent -= 1;
        }
        self.indent -= 1;
        self.line("}");
    }

    /// A nested `PROC`/`FUNCTION` is scoped to its enclosing body, so it
    /// becomes a local closure variable rather than a package-level
    /// function; Go's own lexical scoping then keeps same-named nested
    /// declarations in different parents from colliding.
    fn lower_nested_proc(&mut self, p: &cpc_ast::stmt::ProcDecl) {
        if let Some(scope) = self.scope_stack.last_mut() {
            scope.insert(p.name, p.params.clone());
        }
        let name = translate_ident(p.name.as_str());
        let params = self.render_nested_params(&p.params);
        self.line(&format!("{name} := func({params}) {{"));
        self.indent += 1;
        self.push_scope(&p.params);
        self.lower_block(&p.body);
        self.pop_scope();
        self.indent -= 1;
        self.line("}");
    }

    fn lower_nested_function(&mut self, f: &cpc_ast::stmt::FunctionDecl) {
        if let Some(scope) = self.scope_stack.last_mut() {
            scope.insert(f.name, f.params.clone());
        }
        let name = translate_ident(f.name.as_str());
        let params = self.render_nested_params(&f.params);
        let rets: Vec<String> = f.ret_types.iter().map(elem_go_type).collect();
        let ret_str = match rets.len() {
            0 => String::new(),
            1 => format!(" {}", rets[0]),
            _ => format!(" ({})", rets.join(", ")),
        };
        self.line(&format!("{name} := func({params}){ret_str} {{"));
        self.indent += 1;
        self.push_scope(&f.params);
        match &f.body {
            FunctionBody::ShortForm(expr) => {
                let rendered = self.lower_expr(expr);
                self.line(&format!("return {rendered}"));
            }
            FunctionBody::Block { decls, valof, results } => {
                self.lower_block(decls);
                self.lower_block(valof);
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
    }

    fn render_nested_params(&self, params: &[cpc_ast::types::Param]) -> String {
        params
            .iter()
            .map(|p| {
                let name = translate_ident(p.name.as_str());
                let ty = if p.is_channel {
                    channel_go_type(&p.ty, p.channel_direction, p.channel_array_dims > 0)
                } else {
                    let mut base = elem_go_type(&p.ty);
                    let dims = p.open_array_dims + if p.fixed_array_size.is_some() { 1 } else { 0 };
                    for _ in 0..dims {
                        base = format!("[]{base}");
                    }
                    if dims == 0 && is_byref_param(p) {
                        base = format!("*{base}");
                    }
                    base
                };
                format!("{name} {ty}")
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn lower_proc_call(&mut self, c: &cpc_ast::stmt::ProcCall) {
        let name = c.name.as_str();
        if let Some(line) = self.lower_builtin_call(name, &c.args) {
            self.line(&line);
            return;
        }
        let go_name = translate_ident(name);
        let mut args = Vec::with_capacity(c.args.len());
        for arg in &c.args {
            args.push(self.lower_expr(arg));
        }
        self.line(&format!("{go_name}({})", args.join(", ")));
    }

    fn lower_builtin_call(&mut self, name: &str, args: &[Expr]) -> Option<String> {
        let rendered = |gen: &mut Self, i: usize| gen.lower_expr(&args[i]);
        match name {
            "print.int" | "print.bool" | "print.string" => {
                self.needs.fmt = true;
                let arg = rendered(self, 0);
                Some(format!("fmt.Println({arg})"))
            }
            "print.newline" => {
                self.needs.fmt = true;
                Some("fmt.Println()".to_string())
            }
            "CAUSEERROR" => Some("panic(\"CAUSEERROR\")".to_string()),
            _ => None,
        }
    }
}

/// The Go element type of a RETYPES target shaped as a fixed 2-element
/// integer array (the float64-double-word case), or `None` for every other
/// target shape.
fn double_word_array_elem(ty: &Type) -> Option<String> {
    match ty {
        Type::Array(inner, dims) if dims.len() == 1 => {
            let Type::Elem(ElemType::Primitive(prim)) = inner.as_ref() else {
                return None;
            };
            if !matches!(prim, PrimitiveType::Int | PrimitiveType::Int16 | PrimitiveType::Int32 | PrimitiveType::Int64) {
                return None;
            }
            match &dims[0] {
                ArrayDim::Sized(Expr::Literal(Literal::Int { value: 2, .. }, _)) => {
                    Some(crate::types::primitive_go_type(*prim).to_string())
                }
                _ => None,
            }
        }
        _ => None,
    }
}
