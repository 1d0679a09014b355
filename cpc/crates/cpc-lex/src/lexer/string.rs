//! String and byte literal scanning.
//!
//! Both literal kinds keep their `*`-escapes (`*n`, `*t`, `*c`, `*s`, `*'`,
//! `*"`, `**`) as raw text; the lexer only needs to know that a `*` always
//! consumes the following character as part of the literal so an escaped
//! quote doesn't terminate it early. Interpreting the escapes is the
//! parser's job.

use cpc_util::Symbol;
use cpc_util::diagnostic::{DiagnosticBuilder, DiagnosticCode};

use crate::token::{Token, TokenKind};

use super::core::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a double-quoted string literal.
    pub(crate) fn lex_string(&mut self) -> Token {
        self.cursor.advance(); // opening '"'
        loop {
            if self.cursor.is_at_end() || self.cursor.current_char() == '\n' {
                return self.unterminated_literal("string");
            }
            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    return self.make(TokenKind::Str);
                }
                '*' => {
                    self.cursor.advance();
                    if !self.cursor.is_at_end() {
                        self.cursor.advance();
                    }
                }
                _ => self.cursor.advance(),
            }
        }
    }

    /// Lexes a single-quoted byte literal: a single byte, or a `*`-escape
    /// sequence (two characters: `*` and the escape letter).
    pub(crate) fn lex_byte(&mut self) -> Token {
        self.cursor.advance(); // opening '\''

        if self.cursor.is_at_end() || self.cursor.current_char() == '\n' {
            return self.unterminated_literal("byte");
        }

        if self.cursor.current_char() == '*' {
            self.cursor.advance();
            if self.cursor.is_at_end() || self.cursor.current_char() == '\n' {
                return self.unterminated_literal("byte");
            }
        }
        self.cursor.advance();

        if self.cursor.current_char() != '\'' {
            return self.unterminated_literal("byte");
        }
        self.cursor.advance();
        self.make(TokenKind::ByteLit)
    }

    fn unterminated_literal(&mut self, kind: &str) -> Token {
        let message = format!("unterminated {} literal", kind);
        DiagnosticBuilder::error(message)
            .code(DiagnosticCode::E_LEXER_UNTERMINATED_STRING)
            .span(self.token_span())
            .emit(self.handler);
        let text = self.cursor.slice_from(self.token_start);
        Token::new(TokenKind::Illegal, Symbol::intern(text), self.token_span())
    }
}
