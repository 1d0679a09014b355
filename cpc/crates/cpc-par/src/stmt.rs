//! The statement dispatcher and every executable (as opposed to
//! declaration) statement form: assignment, channel communication, timer
//! reads, and the structured process constructs.

use cpc_ast::expr::Expr;
use cpc_ast::stmt::{
    AltBlock, AltCase, AltTarget, AssignLhs, AssignTarget, Assignment, CaseChoice, CaseStmt,
    ChannelReceive, ChannelSend, IfChoice, IfStmt, MultiAssignment, ParBlock, ProcCall,
    Replicator, SeqBlock, TimerRead, VariantCase, VariantReceive, WhileStmt,
};
use cpc_ast::Stmt;
use cpc_lex::TokenKind;
use cpc_util::{Span, Symbol};

use crate::Parser;

impl<'a> Parser<'a> {
    /// Dispatches on the current token to the right statement parser. This
    /// is the single entry point every block (`parse_block`, `parse`
    /// itself, `ALT`/`CASE` arm bodies) calls in its loop.
    pub(crate) fn parse_stmt(&mut self) -> Option<Stmt> {
        match self.current().kind {
            TokenKind::Timer => self.parse_timer_decl(),
            TokenKind::Record => self.parse_record_decl(),
            TokenKind::Protocol => self.parse_protocol_decl(),
            TokenKind::Proc => self.parse_proc_decl(),
            TokenKind::Function => self.parse_function_decl(),
            TokenKind::Seq => self.parse_seq_block(),
            TokenKind::Par => self.parse_par_block(),
            TokenKind::KwAlt | TokenKind::Pri => self.parse_alt_block(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::Case => self.parse_case_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Skip => {
                let span = self.advance().span;
                self.end_of_line();
                Some(Stmt::Skip(span))
            }
            TokenKind::Stop => {
                let span = self.advance().span;
                self.end_of_line();
                Some(Stmt::Stop(span))
            }
            TokenKind::Val | TokenKind::Initial => self.parse_typed_construct(),
            _ if self.starts_type() => self.parse_typed_construct(),
            _ => self.parse_ident_led_stmt(),
        }
    }

    /// `var = start FOR count [STEP step]`, read ahead of a `SEQ`/`PAR`/
    /// `IF`/`ALT` block's own body. Absent unless the construct keyword is
    /// directly followed by `name =`.
    fn parse_replicator(&mut self) -> Option<Replicator> {
        if self.check(TokenKind::Ident) && self.peek().kind == TokenKind::Eq {
            let var = self.parse_name_ident()?;
            self.expect(TokenKind::Eq);
            let start = self.parse_expr()?;
            self.expect(TokenKind::For)?;
            let count = self.parse_expr()?;
            let step = if self.match_kind(TokenKind::Step) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            Some(Replicator { var, start, count, step })
        } else {
            None
        }
    }

    fn parse_seq_block(&mut self) -> Option<Stmt> {
        let span_start = self.current().span;
        self.expect(TokenKind::Seq)?;
        let replicator = self.parse_replicator();
        let body = self.parse_block();
        let span = self.finish_span(span_start);
        Some(Stmt::Seq(SeqBlock { replicator, body, span }))
    }

    fn parse_par_block(&mut self) -> Option<Stmt> {
        let span_start = self.current().span;
        self.expect(TokenKind::Par)?;
        let replicator = self.parse_replicator();
        let body = self.parse_block();
        let span = self.finish_span(span_start);
        Some(Stmt::Par(ParBlock { replicator, body, span }))
    }

    fn parse_while_stmt(&mut self) -> Option<Stmt> {
        let span_start = self.current().span;
        self.expect(TokenKind::While)?;
        let cond = self.parse_expr()?;
        let body = self.parse_block();
        let span = self.finish_span(span_start);
        Some(Stmt::While(WhileStmt { cond, body, span }))
    }

    // ---- ALT ------------------------------------------------------------

    fn parse_alt_block(&mut self) -> Option<Stmt> {
        let span_start = self.current().span;
        let priority = self.match_kind(TokenKind::Pri);
        self.expect(TokenKind::KwAlt)?;
        let replicator = self.parse_replicator();
        self.end_of_line();
        if !self.match_kind(TokenKind::Indent) {
            self.error("expected an indented ALT body");
            return None;
        }
        let mut cases = Vec::new();
        while !self.check(TokenKind::Dedent) && !self.is_at_end() {
            match self.parse_alt_case() {
                Some(case) => cases.push(case),
                None => self.recover_to_sync_point(),
            }
        }
        self.expect(TokenKind::Dedent);
        let span = self.finish_span(span_start);
        Some(Stmt::Alt(AltBlock { replicator, priority, cases, span }))
    }

    /// Whether a `&` appears before the end of the current line — the only
    /// way to tell a guarded case (`expr & comm`) from a bare one, since the
    /// guard expression and the communication that follows it can both
    /// start with an identifier.
    fn line_has_guard(&self) -> bool {
        let mut i = self.position;
        loop {
            match self.tokens.get(i).map(|t| t.kind) {
                Some(TokenKind::Amp) => return true,
                Some(TokenKind::Newline) | Some(TokenKind::Eof) | None => return false,
                _ => i += 1,
            }
        }
    }

    fn parse_alt_case(&mut self) -> Option<AltCase> {
        let span_start = self.current().span;
        let guard = if self.line_has_guard() {
            let g = self.parse_expr()?;
            self.expect(TokenKind::Amp)?;
            Some(g)
        } else {
            None
        };

        let mut scoped_decls = Vec::new();
        while self.starts_type() || self.check(TokenKind::Val) || self.check(TokenKind::Initial) {
            match self.parse_typed_construct() {
                Some(stmt) => scoped_decls.push(stmt),
                None => break,
            }
        }

        let target = self.parse_alt_target()?;
        self.end_of_line();
        let body = self.parse_block();
        let span = self.finish_span(span_start);
        Some(AltCase { guard, target, scoped_decls, body, span })
    }

    fn parse_alt_target(&mut self) -> Option<AltTarget> {
        if self.match_kind(TokenKind::Skip) {
            return Some(AltTarget::Skip);
        }
        let name = self.parse_name_ident()?;
        let mut channel_indices = Vec::new();
        while self.match_kind(TokenKind::LBracket) {
            channel_indices.push(self.parse_expr()?);
            self.expect(TokenKind::RBracket)?;
        }
        self.expect(TokenKind::Query)?;
        if self.match_kind(TokenKind::After) {
            let deadline = self.parse_expr()?;
            return Some(AltTarget::TimerAfter { timer: name, deadline });
        }
        let var = self.parse_name_ident()?;
        let mut var_indices = Vec::new();
        while self.match_kind(TokenKind::LBracket) {
            var_indices.push(self.parse_expr()?);
            self.expect(TokenKind::RBracket)?;
        }
        Some(AltTarget::Channel { channel: name, channel_indices, var, var_indices })
    }

    // ---- IF ---------------------------------------------------------------

    fn parse_if_stmt(&mut self) -> Option<Stmt> {
        let inner = self.parse_if_stmt_inner()?;
        Some(Stmt::If(inner))
    }

    fn parse_if_stmt_inner(&mut self) -> Option<IfStmt> {
        let span_start = self.current().span;
        self.expect(TokenKind::If)?;
        let replicator = self.parse_replicator();
        self.end_of_line();
        if !self.match_kind(TokenKind::Indent) {
            self.error("expected an indented IF body");
            return None;
        }
        let mut choices = Vec::new();
        while !self.check(TokenKind::Dedent) && !self.is_at_end() {
            if self.check(TokenKind::If) {
                match self.parse_if_stmt_inner() {
                    Some(nested) => choices.push(IfChoice::Nested(Box::new(nested))),
                    None => self.recover_to_sync_point(),
                }
                continue;
            }
            let choice_start = self.current().span;
            let Some(cond) = self.parse_expr() else {
                self.recover_to_sync_point();
                continue;
            };
            let body = self.parse_block();
            let choice_span = self.finish_span(choice_start);
            choices.push(IfChoice::Cond { cond, body, span: choice_span });
        }
        self.expect(TokenKind::Dedent);
        let span = self.finish_span(span_start);
        Some(IfStmt { replicator, choices, span })
    }

    // ---- CASE ---------------------------------------------------------

    fn parse_case_stmt(&mut self) -> Option<Stmt> {
        let span_start = self.current().span;
        self.expect(TokenKind::Case)?;
        let selector = self.parse_expr()?;
        self.end_of_line();
        if !self.match_kind(TokenKind::Indent) {
            self.error("expected an indented CASE body");
            return None;
        }
        let mut choices = Vec::new();
        while !self.check(TokenKind::Dedent) && !self.is_at_end() {
            let choice_start = self.current().span;
            let values = if self.match_kind(TokenKind::Else) {
                Vec::new()
            } else {
                let Some(first) = self.parse_literal() else {
                    self.recover_to_sync_point();
                    continue;
                };
                let mut values = vec![first];
                while self.match_kind(TokenKind::Comma) {
                    match self.parse_literal() {
                        Some(lit) => values.push(lit),
                        None => break,
                    }
                }
                values
            };
            let body = self.parse_block();
            let choice_span = self.finish_span(choice_start);
            choices.push(CaseChoice { values, body, span: choice_span });
        }
        self.expect(TokenKind::Dedent);
        let span = self.finish_span(span_start);
        Some(Stmt::Case(CaseStmt { selector, choices, span }))
    }

    // ---- assignment, communication, and calls --------------------------

    /// Everything that begins with a bare identifier (or, for a slice
    /// assignment, a `[`) and isn't a declaration: assignment,
    /// multi-assignment, channel send/receive, timer read, variant receive,
    /// and procedure calls.
    fn parse_ident_led_stmt(&mut self) -> Option<Stmt> {
        if self.check(TokenKind::LBracket) {
            return self.parse_slice_assignment();
        }

        let span_start = self.current().span;
        let name = self.parse_name_ident()?;

        if self.check(TokenKind::Is) {
            return self.parse_untyped_abbrev(name, span_start);
        }

        let mut indices = Vec::new();
        while self.match_kind(TokenKind::LBracket) {
            indices.push(self.parse_expr()?);
            self.expect(TokenKind::RBracket)?;
        }

        match self.current().kind {
            TokenKind::Assign => self.parse_assignment(span_start, name, indices),
            TokenKind::Comma => self.parse_multi_assignment(span_start, name, indices),
            TokenKind::Bang => self.parse_channel_send(span_start, name, indices),
            TokenKind::Query => self.parse_channel_receive_or_timer(span_start, name, indices),
            TokenKind::LParen => self.parse_proc_call(span_start, name),
            _ => {
                self.error("expected an assignment, communication, or call");
                None
            }
        }
    }

    fn parse_slice_assignment(&mut self) -> Option<Stmt> {
        let span_start = self.current().span;
        self.expect(TokenKind::LBracket)?;
        let array = self.parse_name_ident()?;
        self.expect(TokenKind::From)?;
        let start = self.parse_expr()?;
        self.expect(TokenKind::For)?;
        let length = self.parse_expr()?;
        self.expect(TokenKind::RBracket)?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        let span = self.finish_span(span_start);
        self.end_of_line();
        Some(Stmt::Assign(Assignment { target: AssignLhs::Slice { array, start, length }, value, span }))
    }

    fn parse_assignment(&mut self, span_start: Span, name: Symbol, indices: Vec<Expr>) -> Option<Stmt> {
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        let span = self.finish_span(span_start);
        self.end_of_line();
        Some(Stmt::Assign(Assignment {
            target: AssignLhs::Target(AssignTarget { name, indices }),
            value,
            span,
        }))
    }

    fn parse_multi_assignment(
        &mut self,
        span_start: Span,
        first_name: Symbol,
        first_indices: Vec<Expr>,
    ) -> Option<Stmt> {
        let mut targets = vec![AssignTarget { name: first_name, indices: first_indices }];
        while self.match_kind(TokenKind::Comma) {
            let name = self.parse_name_ident()?;
            let mut indices = Vec::new();
            while self.match_kind(TokenKind::LBracket) {
                indices.push(self.parse_expr()?);
                self.expect(TokenKind::RBracket)?;
            }
            targets.push(AssignTarget { name, indices });
        }
        self.expect(TokenKind::Assign)?;
        let mut values = vec![self.parse_expr()?];
        while self.match_kind(TokenKind::Comma) {
            values.push(self.parse_expr()?);
        }
        let span = self.finish_span(span_start);
        self.end_of_line();
        Some(Stmt::MultiAssign(MultiAssignment { targets, values, span }))
    }

    /// `c ! v[; extra]*`. A tagged send on a variant protocol is spelled
    /// identically to a plain value send from the parser's point of view —
    /// distinguishing a tag from a value needs the channel's declared
    /// protocol, which this grammar-level pass does not track — so
    /// `variant_tag` is always left `None` here. The code generator, which
    /// does track declared protocols, resolves the tag from `value` when
    /// lowering the send.
    fn parse_channel_send(&mut self, span_start: Span, name: Symbol, channel_indices: Vec<Expr>) -> Option<Stmt> {
        self.expect(TokenKind::Bang)?;
        let value = self.parse_expr()?;
        let mut extra_values = Vec::new();
        while self.match_kind(TokenKind::Semicolon) {
            extra_values.push(self.parse_expr()?);
        }
        let span = self.finish_span(span_start);
        self.end_of_line();
        Some(Stmt::ChannelSend(ChannelSend {
            channel: name,
            channel_indices,
            value,
            extra_values,
            variant_tag: None,
            span,
        }))
    }

    fn parse_channel_receive_or_timer(
        &mut self,
        span_start: Span,
        name: Symbol,
        channel_indices: Vec<Expr>,
    ) -> Option<Stmt> {
        self.expect(TokenKind::Query)?;

        if self.match_kind(TokenKind::Case) {
            return self.parse_variant_receive(span_start, name, channel_indices);
        }

        if self.timer_names.contains(&name) {
            let var = self.parse_name_ident()?;
            let span = self.finish_span(span_start);
            self.end_of_line();
            return Some(Stmt::TimerRead(TimerRead { timer: name, var, span }));
        }

        let var = self.parse_name_ident()?;
        let mut var_indices = Vec::new();
        while self.match_kind(TokenKind::LBracket) {
            var_indices.push(self.parse_expr()?);
            self.expect(TokenKind::RBracket)?;
        }
        let mut extra_vars = Vec::new();
        while self.match_kind(TokenKind::Semicolon) {
            extra_vars.push(self.parse_name_ident()?);
        }
        let span = self.finish_span(span_start);
        self.end_of_line();
        Some(Stmt::ChannelReceive(ChannelReceive {
            channel: name,
            channel_indices,
            var,
            var_indices,
            extra_vars,
            span,
        }))
    }

    fn parse_variant_receive(
        &mut self,
        span_start: Span,
        name: Symbol,
        channel_indices: Vec<Expr>,
    ) -> Option<Stmt> {
        self.end_of_line();
        let mut cases = Vec::new();
        if self.match_kind(TokenKind::Indent) {
            while !self.check(TokenKind::Dedent) && !self.is_at_end() {
                match self.parse_variant_case() {
                    Some(case) => cases.push(case),
                    None => self.recover_to_sync_point(),
                }
            }
            self.expect(TokenKind::Dedent);
        }
        let span = self.finish_span(span_start);
        Some(Stmt::VariantReceive(VariantReceive { channel: name, channel_indices, cases, span }))
    }

    fn parse_variant_case(&mut self) -> Option<VariantCase> {
        let tag = self.parse_name_ident()?;
        let mut payload_vars = Vec::new();
        while self.match_kind(TokenKind::Semicolon) {
            payload_vars.push(self.parse_name_ident()?);
        }
        let body = self.parse_block();
        Some(VariantCase { tag, payload_vars, body })
    }

    fn parse_proc_call(&mut self, span_start: Span, name: Symbol) -> Option<Stmt> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        let span = self.finish_span(span_start);
        self.end_of_line();
        Some(Stmt::Call(ProcCall { name, args, span }))
    }
}

#[cfg(test)]
mod tests {
    use cpc_lex::Lexer;
    use cpc_util::Handler;

    use super::*;

    fn parse_one(source: &'static str) -> (Stmt, Handler) {
        let mut handler = Handler::new();
        let tokens: Vec<_> = Lexer::new(source, &mut handler).collect();
        let mut parser = Parser::new(tokens, &mut handler);
        let stmt = parser.parse_stmt().expect("statement should parse");
        (stmt, handler)
    }

    #[test]
    fn plain_assignment_has_no_indices() {
        let (stmt, handler) = parse_one("x := 1\n");
        assert!(!handler.has_errors());
        match stmt {
            Stmt::Assign(a) => assert!(matches!(a.target, AssignLhs::Target(t) if t.indices.is_empty())),
            _ => panic!("expected an assignment"),
        }
    }

    #[test]
    fn multi_assignment_collects_every_target_and_value() {
        let (stmt, handler) = parse_one("a, b := 1, 2\n");
        assert!(!handler.has_errors());
        match stmt {
            Stmt::MultiAssign(m) => {
                assert_eq!(m.targets.len(), 2);
                assert_eq!(m.values.len(), 2);
            }
            _ => panic!("expected a multi-assignment"),
        }
    }

    #[test]
    fn slice_assignment_reads_the_bracketed_lhs() {
        let (stmt, handler) = parse_one("[buf FROM 0 FOR 4] := src\n");
        assert!(!handler.has_errors());
        assert!(matches!(stmt, Stmt::Assign(a) if matches!(a.target, AssignLhs::Slice { .. })));
    }

    #[test]
    fn channel_send_reads_its_value() {
        let (stmt, handler) = parse_one("c ! v\n");
        assert!(!handler.has_errors());
        assert!(matches!(stmt, Stmt::ChannelSend(_)));
    }

    #[test]
    fn channel_receive_is_distinguished_from_timer_read() {
        let mut handler = Handler::new();
        let tokens: Vec<_> = Lexer::new("c ? v\n", &mut handler).collect();
        let mut parser = Parser::new(tokens, &mut handler);
        let stmt = parser.parse_stmt().expect("statement should parse");
        assert!(matches!(stmt, Stmt::ChannelReceive(_)));
    }

    #[test]
    fn timer_read_is_recognized_once_the_name_is_registered() {
        let mut handler = Handler::new();
        let tokens: Vec<_> = Lexer::new("TIMER tim:\ntim ? now\n", &mut handler).collect();
        let mut parser = Parser::new(tokens, &mut handler);
        parser.parse_stmt();
        let stmt = parser.parse_stmt().expect("statement should parse");
        assert!(matches!(stmt, Stmt::TimerRead(_)));
    }

    #[test]
    fn seq_block_collects_its_statements() {
        let (stmt, handler) = parse_one("SEQ\n  a := 1\n  b := 2\n");
        assert!(!handler.has_errors());
        match stmt {
            Stmt::Seq(s) => assert_eq!(s.body.len(), 2),
            _ => panic!("expected a SEQ block"),
        }
    }

    #[test]
    fn replicated_par_carries_its_replicator() {
        let (stmt, handler) = parse_one("PAR i = 0 FOR 4\n  report(i)\n");
        assert!(!handler.has_errors());
        match stmt {
            Stmt::Par(p) => assert!(p.replicator.is_some()),
            _ => panic!("expected a PAR block"),
        }
    }

    #[test]
    fn alt_case_with_guard_requires_ampersand() {
        let (stmt, handler) = parse_one("ALT\n  ready & c ? v\n    SKIP\n");
        assert!(!handler.has_errors());
        match stmt {
            Stmt::Alt(a) => assert!(a.cases[0].guard.is_some()),
            _ => panic!("expected an ALT block"),
        }
    }

    #[test]
    fn alt_case_without_guard_has_none() {
        let (stmt, handler) = parse_one("ALT\n  c ? v\n    SKIP\n");
        assert!(!handler.has_errors());
        match stmt {
            Stmt::Alt(a) => assert!(a.cases[0].guard.is_none()),
            _ => panic!("expected an ALT block"),
        }
    }

    #[test]
    fn nested_if_is_a_choice_of_its_own() {
        let (stmt, handler) = parse_one("IF\n  a = 1\n    SKIP\n  IF\n    b = 2\n      SKIP\n");
        assert!(!handler.has_errors());
        match stmt {
            Stmt::If(i) => assert!(matches!(i.choices[1], IfChoice::Nested(_))),
            _ => panic!("expected an IF statement"),
        }
    }

    #[test]
    fn case_else_arm_has_no_values() {
        let (stmt, handler) = parse_one("CASE x\n  1\n    SKIP\n  ELSE\n    STOP\n");
        assert!(!handler.has_errors());
        match stmt {
            Stmt::Case(c) => assert!(c.choices[1].values.is_empty()),
            _ => panic!("expected a CASE statement"),
        }
    }

    #[test]
    fn proc_call_collects_its_arguments() {
        let (stmt, handler) = parse_one("report(a, b)\n");
        assert!(!handler.has_errors());
        assert!(matches!(stmt, Stmt::Call(c) if c.args.len() == 2));
    }
}
