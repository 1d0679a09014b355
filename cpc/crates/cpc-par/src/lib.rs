//! cpc-par - recursive-descent parser
//!
//! Builds a [`cpc_ast::Program`] from the token stream produced by `cpc-lex`.
//! The grammar is driven by the lexer's off-side-rule layout tokens
//! (`NEWLINE`/`INDENT`/`DEDENT`) rather than braces or `begin`/`end` pairs:
//! every statement-level parsing function consumes its own trailing
//! `NEWLINE`, and a compound construct's body is a `parse_block` call that
//! expects an `INDENT`, parses statements until the matching `DEDENT`, and
//! consumes that `DEDENT`.
//!
//! Expressions are parsed without a precedence table. The source language
//! requires explicit parentheses around any expression mixing more than one
//! operator, so `parse_expr` only ever combines a left operand, one operator,
//! and a right operand built from the same left-associative call — there is
//! no Pratt loop here, unlike a grammar whose tokens carry binding power.
//!
//! On a mismatch, the parser records a diagnostic and resynchronizes at the
//! next `NEWLINE` or `DEDENT` rather than aborting, so a single malformed
//! line does not prevent the rest of the file from being parsed.

mod decl;
mod expr;
mod items;
mod stmt;
mod types;

#[cfg(test)]
mod edge_cases;

use rustc_hash::FxHashSet;

use cpc_ast::Program;
use cpc_lex::{Token, TokenKind};
use cpc_util::diagnostic::{DiagnosticBuilder, DiagnosticCode, Handler};
use cpc_util::{Span, Symbol};

/// Recursive-descent parser over a pre-scanned token vector.
///
/// Tokens are collected ahead of time (rather than pulled lazily from the
/// lexer) so lookahead past a balanced `[...]` pair — needed to tell an
/// array-type declaration from a slice-assignment statement, both of which
/// open with `[` — is a matter of indexing `tokens`, not buffering.
pub struct Parser<'a> {
    tokens: Vec<Token>,
    position: usize,
    handler: &'a mut Handler,
    /// Names bound by a `TIMER` declaration seen so far. `name ? target` is
    /// spelled identically for a channel receive and a timer read; this set
    /// is the only identifier classification the parser performs, and exists
    /// solely to pick between `Stmt::ChannelReceive` and `Stmt::TimerRead`.
    timer_names: FxHashSet<Symbol>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, handler: &'a mut Handler) -> Self {
        Self {
            tokens,
            position: 0,
            handler,
            timer_names: FxHashSet::default(),
        }
    }

    /// Parse the whole token stream into a program.
    pub fn parse(&mut self) -> Program {
        let mut stmts = Vec::new();
        while !self.is_at_end() {
            if self.match_kind(TokenKind::Newline) {
                continue;
            }
            match self.parse_stmt() {
                Some(stmt) => stmts.push(stmt),
                None => self.recover_to_sync_point(),
            }
        }
        Program { stmts }
    }

    // ---- token cursor -------------------------------------------------

    fn eof_token(&self) -> Token {
        let span = self
            .tokens
            .last()
            .map(|t| t.span)
            .unwrap_or_else(|| Span::new(0, 0, 1, 1));
        Token::synthetic(TokenKind::Eof, span)
    }

    fn current(&self) -> Token {
        self.tokens.get(self.position).copied().unwrap_or_else(|| self.eof_token())
    }

    fn peek(&self) -> Token {
        self.tokens
            .get(self.position + 1)
            .copied()
            .unwrap_or_else(|| self.eof_token())
    }

    fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn advance(&mut self) -> Token {
        let tok = self.current();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        tok
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.error_expected(kind);
            None
        }
    }

    /// Consume the statement-terminating `NEWLINE`, tolerating its absence
    /// right at end of file (a file need not end with a blank line).
    fn end_of_line(&mut self) {
        if !self.is_at_end() {
            self.expect(TokenKind::Newline);
        }
    }

    fn finish_span(&self, start: Span) -> Span {
        start.merge(
            self.tokens
                .get(self.position.saturating_sub(1))
                .map(|t| t.span)
                .unwrap_or(start),
        )
    }

    fn parse_name_ident(&mut self) -> Option<Symbol> {
        let tok = self.expect(TokenKind::Ident)?;
        Some(tok.text)
    }

    fn parse_name_list(&mut self, first: Symbol) -> Vec<Symbol> {
        let mut names = vec![first];
        while self.match_kind(TokenKind::Comma) {
            match self.parse_name_ident() {
                Some(name) => names.push(name),
                None => break,
            }
        }
        names
    }

    // ---- indentation-driven blocks ------------------------------------

    /// Parse `NEWLINE INDENT stmt* DEDENT`, the body of every compound
    /// construct (`SEQ`/`PAR`/`ALT`/`IF`/`CASE`/`WHILE`/`PROC`/`FUNCTION`
    /// bodies, `RECORD`/`PROTOCOL` member blocks, `VALOF` blocks).
    fn parse_block(&mut self) -> Vec<cpc_ast::Stmt> {
        self.end_of_line();
        if !self.match_kind(TokenKind::Indent) {
            self.error("expected an indented block");
            return Vec::new();
        }
        let mut stmts = Vec::new();
        while !self.check(TokenKind::Dedent) && !self.is_at_end() {
            match self.parse_stmt() {
                Some(stmt) => stmts.push(stmt),
                None => self.recover_to_sync_point(),
            }
        }
        self.expect(TokenKind::Dedent);
        stmts
    }

    // ---- diagnostics and recovery --------------------------------------

    fn error(&mut self, message: impl Into<String>) {
        let span = self.current().span;
        DiagnosticBuilder::error(message)
            .code(DiagnosticCode::E_PARSER_UNEXPECTED_TOKEN)
            .span(span)
            .emit(self.handler);
    }

    fn error_expected(&mut self, expected: TokenKind) {
        let tok = self.current();
        let message = if tok.kind == TokenKind::Eof {
            format!("unexpected end of file, expected {expected:?}")
        } else {
            format!("expected {expected:?}, found {:?}", tok.kind)
        };
        let code = if tok.kind == TokenKind::Eof {
            DiagnosticCode::E_PARSER_UNEXPECTED_EOF
        } else {
            DiagnosticCode::E_PARSER_EXPECTED_TOKEN
        };
        DiagnosticBuilder::error(message)
            .code(code)
            .span(tok.span)
            .emit(self.handler);
    }

    /// Skip to the next statement boundary after a parse failure: the
    /// `NEWLINE` ending the bad line, or a `DEDENT` closing the block the
    /// bad line lived in (left unconsumed so the enclosing `parse_block`
    /// loop sees it and exits cleanly).
    fn recover_to_sync_point(&mut self) {
        while !self.is_at_end() {
            match self.current().kind {
                TokenKind::Newline => {
                    self.advance();
                    return;
                }
                TokenKind::Dedent => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}
