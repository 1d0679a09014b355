//! `PROC` and `FUNCTION` declaration parsing.

use cpc_ast::stmt::{FunctionBody, FunctionDecl, ProcDecl};
use cpc_ast::Stmt;
use cpc_lex::TokenKind;

use crate::Parser;

impl<'a> Parser<'a> {
    /// `PROC name(params)` followed by an indented body, then a lone `:`
    /// on the dedented line that closes it.
    pub(crate) fn parse_proc_decl(&mut self) -> Option<Stmt> {
        let span_start = self.current().span;
        self.expect(TokenKind::Proc)?;
        let name = self.parse_name_ident()?;
        let params = self.parse_param_list();
        let body = self.parse_block();
        self.expect(TokenKind::Colon)?;
        let span = self.finish_span(span_start);
        self.end_of_line();
        Some(Stmt::Proc(ProcDecl { name, params, body, span }))
    }

    /// `FUNCTION T[, T]* name(params) IS expr` or the block form: an
    /// indented body of local declarations, a `VALOF` process, and a
    /// trailing `RESULT expr[, expr]*` line.
    pub(crate) fn parse_function_decl(&mut self) -> Option<Stmt> {
        let span_start = self.current().span;
        self.expect(TokenKind::Function)?;

        let mut ret_types = vec![self.parse_elem_type()?];
        while self.check(TokenKind::Comma) && self.next_is_primitive_type_keyword() {
            self.advance();
            ret_types.push(self.parse_elem_type()?);
        }

        let name = self.parse_name_ident()?;
        let params = self.parse_param_list();

        if self.match_kind(TokenKind::Is) {
            let expr = self.parse_expr()?;
            let span = self.finish_span(span_start);
            self.end_of_line();
            return Some(Stmt::Function(FunctionDecl {
                name,
                ret_types,
                params,
                body: FunctionBody::ShortForm(expr),
                span,
            }));
        }

        self.end_of_line();
        if !self.match_kind(TokenKind::Indent) {
            self.error("expected an indented FUNCTION body");
            return None;
        }
        let mut decls = Vec::new();
        while !self.check(TokenKind::Valof) && !self.check(TokenKind::Dedent) && !self.is_at_end() {
            match self.parse_stmt() {
                Some(stmt) => decls.push(stmt),
                None => self.recover_to_sync_point(),
            }
        }
        self.expect(TokenKind::Valof)?;
        let valof = self.parse_block();
        self.expect(TokenKind::KwResult)?;
        let mut results = vec![self.parse_expr()?];
        while self.match_kind(TokenKind::Comma) {
            results.push(self.parse_expr()?);
        }
        self.end_of_line();
        self.expect(TokenKind::Dedent);
        let span = self.finish_span(span_start);
        Some(Stmt::Function(FunctionDecl {
            name,
            ret_types,
            params,
            body: FunctionBody::Block { decls, valof, results },
            span,
        }))
    }

    /// Whether the token right after a `,` continues a multi-result type
    /// list. Only primitive keywords are accepted there, since a bare
    /// identifier at that position is ambiguous between another return
    /// type and the function's own name.
    fn next_is_primitive_type_keyword(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Int
                | TokenKind::Int16
                | TokenKind::Int32
                | TokenKind::Int64
                | TokenKind::KwByte
                | TokenKind::Bool
                | TokenKind::Real
                | TokenKind::Real32
                | TokenKind::Real64
        )
    }
}
