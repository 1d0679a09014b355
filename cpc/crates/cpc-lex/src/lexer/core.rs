//! Core lexer implementation.
//!
//! This module contains the main `Lexer` struct: the indentation state
//! machine, the per-line driving loop, and the single-character dispatch
//! table that hands off to the other `lexer::*` modules.

use std::collections::VecDeque;

use cpc_util::diagnostic::{DiagnosticBuilder, DiagnosticCode, Handler};
use cpc_util::Span;

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Lexer for the input language's indentation-structured source text.
///
/// Tokens are produced lazily: each call to [`Lexer::next_token`] may
/// consume several physical lines (blank or comment-only ones are
/// transparent) and may enqueue more than one layout token — e.g. three
/// `DEDENT`s closing nested blocks at once — of which only the first is
/// returned immediately; the rest are drained from `pending` on subsequent
/// calls before scanning resumes.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    pub cursor: Cursor<'a>,

    /// Error handler for reporting lexical errors.
    pub handler: &'a mut Handler,

    /// Starting position of the current token (byte offset).
    pub token_start: usize,

    /// Line number where the current token starts (1-based).
    token_start_line: u32,

    /// Column number where the current token starts (1-based).
    token_start_column: u32,

    /// Column of each currently open block, bottom is always 0.
    indent_stack: Vec<u32>,

    /// Incremented on `(`/`[`, decremented on `)`/`]`. Layout tokens are
    /// withheld entirely while this is positive.
    suppression_depth: u32,

    /// True when the next call to `next_token` must first measure the
    /// indentation of a fresh physical line.
    at_line_start: bool,

    /// Kind of the last non-layout token returned, used to decide whether
    /// a trailing `NEWLINE` is suppressed by a continuation operator.
    last_significant: Option<TokenKind>,

    /// Layout tokens queued by a single line-start measurement (multiple
    /// `DEDENT`s, or a `DEDENT` followed by an `ILLEGAL` recovery token).
    pending: VecDeque<Token>,

    /// Set once `EOF` has been synthesized, so repeated calls keep
    /// returning it rather than re-running end-of-input bookkeeping.
    eof_emitted: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given (already preprocessed) source text.
    pub fn new(source: &'a str, handler: &'a mut Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
            indent_stack: vec![0],
            suppression_depth: 0,
            at_line_start: true,
            last_significant: None,
            pending: VecDeque::new(),
            eof_emitted: false,
        }
    }

    /// Returns the next token from the source code.
    pub fn next_token(&mut self) -> Token {
        if let Some(tok) = self.pending.pop_front() {
            self.note_significant(tok.kind);
            return tok;
        }

        loop {
            if self.at_line_start {
                if let Some(tok) = self.measure_indentation() {
                    self.note_significant(tok.kind);
                    return tok;
                }
                // Equal indentation: nothing to emit, fall through and scan
                // this line's tokens.
            }

            self.skip_inline_whitespace_and_comment();

            if self.cursor.is_at_end() {
                if let Some(tok) = self.finish_at_eof() {
                    self.note_significant(tok.kind);
                    return tok;
                }
                continue;
            }

            if self.cursor.current_char() == '\n' {
                let suppressed = self.suppression_depth > 0
                    || self
                        .last_significant
                        .map(TokenKind::is_continuation)
                        .unwrap_or(false);
                let span = Span::new(
                    self.cursor.position(),
                    self.cursor.position() + 1,
                    self.cursor.line(),
                    self.cursor.column(),
                );
                self.cursor.advance();

                if suppressed {
                    // Bracket nesting or a trailing continuation operator:
                    // this newline is insignificant, the logical line
                    // carries on; indentation of the next physical line is
                    // never measured.
                    continue;
                }

                self.at_line_start = true;
                let tok = Token::synthetic(TokenKind::Newline, span);
                self.note_significant(tok.kind);
                return tok;
            }

            self.token_start = self.cursor.position();
            self.token_start_line = self.cursor.line();
            self.token_start_column = self.cursor.column();

            let tok = self.scan_token();
            self.note_significant(tok.kind);
            return tok;
        }
    }

    /// Records the byte-offset span of the token currently being scanned,
    /// i.e. from `token_start` to the cursor's current position.
    pub(crate) fn token_span(&self) -> Span {
        Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        )
    }

    fn note_significant(&mut self, kind: TokenKind) {
        if !matches!(kind, TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent) {
            self.last_significant = Some(kind);
        }
    }

    /// Advances past the line's leading spaces/tabs and compares the
    /// resulting column to the indent stack, queuing `INDENT`/`DEDENT`
    /// tokens as needed. Returns `None` when the line's indentation equals
    /// the current block's (nothing to emit, scanning continues on this
    /// line); returns `Some` with the first queued token otherwise.
    fn measure_indentation(&mut self) -> Option<Token> {
        loop {
            while matches!(self.cursor.current_char(), ' ' | '\t') {
                self.cursor.advance();
            }
            let column = self.cursor.column() - 1;

            if self.cursor.is_at_end() {
                self.at_line_start = false;
                return None;
            }

            if self.cursor.current_char() == '\n' || self.is_line_comment_start() {
                // Blank or comment-only line: invisible to the indent
                // machinery, try again at the next line.
                self.skip_to_next_line();
                continue;
            }

            self.at_line_start = false;

            let top = *self.indent_stack.last().unwrap_or(&0);
            if column > top {
                self.indent_stack.push(column);
                let span = Span::new(self.cursor.position(), self.cursor.position(), self.cursor.line(), self.cursor.column());
                return Some(Token::synthetic(TokenKind::Indent, span));
            }
            if column == top {
                return None;
            }

            while *self.indent_stack.last().unwrap_or(&0) > column {
                self.indent_stack.pop();
                let span = Span::new(self.cursor.position(), self.cursor.position(), self.cursor.line(), self.cursor.column());
                self.pending.push_back(Token::synthetic(TokenKind::Dedent, span));
            }

            if *self.indent_stack.last().unwrap_or(&0) != column {
                self.report_error_code(
                    DiagnosticCode::E_LEXER_BAD_DEDENT,
                    format!("dedent to column {} does not match an enclosing indentation level", column + 1),
                );
                self.indent_stack.push(column);
                let span = Span::new(self.cursor.position(), self.cursor.position(), self.cursor.line(), self.cursor.column());
                self.pending.push_back(Token::synthetic(TokenKind::Illegal, span));
            }

            return self.pending.pop_front();
        }
    }

    /// Whether the upcoming `--` starts a line comment (only meaningful
    /// right after skipping leading whitespace).
    fn is_line_comment_start(&self) -> bool {
        self.cursor.current_char() == '-' && self.cursor.peek_char(1) == '-'
    }

    fn skip_to_next_line(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
        if !self.cursor.is_at_end() {
            self.cursor.advance();
        }
    }

    /// Skips spaces/tabs and a trailing `--` line comment without crossing
    /// a newline; newlines are handled by the caller so indentation state
    /// stays in sync.
    fn skip_inline_whitespace_and_comment(&mut self) {
        while matches!(self.cursor.current_char(), ' ' | '\t' | '\r') {
            self.cursor.advance();
        }
        if self.is_line_comment_start() {
            while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                self.cursor.advance();
            }
        }
    }

    /// Closes out any still-open indentation levels and emits `EOF`.
    fn finish_at_eof(&mut self) -> Option<Token> {
        if self.eof_emitted {
            return None;
        }
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            let span = Span::new(self.cursor.position(), self.cursor.position(), self.cursor.line(), self.cursor.column());
            self.pending.push_back(Token::synthetic(TokenKind::Dedent, span));
        }
        let span = Span::new(self.cursor.position(), self.cursor.position(), self.cursor.line(), self.cursor.column());
        self.pending.push_back(Token::synthetic(TokenKind::Eof, span));
        self.eof_emitted = true;
        self.pending.pop_front()
    }

    /// Dispatches on the current character to scan one real token.
    fn scan_token(&mut self) -> Token {
        match self.cursor.current_char() {
            '(' => {
                self.cursor.advance();
                self.suppression_depth += 1;
                self.make(TokenKind::LParen)
            }
            ')' => {
                self.cursor.advance();
                self.suppression_depth = self.suppression_depth.saturating_sub(1);
                self.make(TokenKind::RParen)
            }
            '[' => {
                self.cursor.advance();
                self.suppression_depth += 1;
                self.make(TokenKind::LBracket)
            }
            ']' => {
                self.cursor.advance();
                self.suppression_depth = self.suppression_depth.saturating_sub(1);
                self.make(TokenKind::RBracket)
            }
            ',' => {
                self.cursor.advance();
                self.make(TokenKind::Comma)
            }
            ';' => {
                self.cursor.advance();
                self.make(TokenKind::Semicolon)
            }
            ':' => self.lex_colon(),
            '=' => self.lex_equals(),
            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '+' => self.lex_plus(),
            '-' => self.lex_minus(),
            '*' => self.lex_star(),
            '/' => self.lex_slash(),
            '\\' => self.lex_backslash(),
            '~' => self.lex_tilde(),
            '!' => self.lex_bang(),
            '?' => self.lex_query(),
            '&' => self.lex_amp(),
            '"' => self.lex_string(),
            '\'' => self.lex_byte(),
            '#' => self.lex_hex_number(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if crate::unicode::is_ascii_ident_start(c) => self.lex_identifier(),
            c => {
                self.report_error(format!("unexpected character '{}'", c));
                self.cursor.advance();
                self.make(TokenKind::Illegal)
            }
        }
    }

    /// Builds a token of `kind` spanning from `token_start` to the cursor's
    /// current position, with the raw source text interned.
    pub(crate) fn make(&self, kind: TokenKind) -> Token {
        let text = self.cursor.slice_from(self.token_start);
        Token::new(kind, cpc_util::Symbol::intern(text), self.token_span())
    }

    /// Reports a lexical error at the current token's span.
    pub fn report_error(&mut self, message: String) {
        DiagnosticBuilder::error(message)
            .code(DiagnosticCode::E_LEXER_UNEXPECTED_CHAR)
            .span(self.token_span())
            .emit(self.handler);
    }

    pub(crate) fn report_error_code(&mut self, code: DiagnosticCode, message: String) {
        DiagnosticBuilder::error(message)
            .code(code)
            .span(self.token_span())
            .emit(self.handler);
    }

    /// Returns the current line number (1-based).
    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    /// Returns the current column number (1-based).
    pub fn column(&self) -> u32 {
        self.cursor.column()
    }

    /// Returns the current byte position in the source.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Returns the starting position of the current token.
    pub fn token_start(&mut self) -> usize {
        self.token_start
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}
