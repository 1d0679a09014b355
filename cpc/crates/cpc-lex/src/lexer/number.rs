//! Numeric literal scanning.
//!
//! The input language has exactly two integer forms: plain decimal digits,
//! and `#` followed by hex digits. There are no binary/octal/float literals
//! and no suffixes; the raw digit text is kept verbatim for the parser to
//! convert.

use cpc_util::diagnostic::DiagnosticCode;
use cpc_util::Symbol;

use crate::token::{Token, TokenKind};

use super::core::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a decimal integer literal. The caller has already confirmed
    /// the current character is an ASCII digit.
    pub(crate) fn lex_number(&mut self) -> Token {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
        self.make(TokenKind::Integer)
    }

    /// Lexes a `#`-prefixed hex integer literal, e.g. `#FF`.
    pub(crate) fn lex_hex_number(&mut self) -> Token {
        self.cursor.advance(); // '#'
        let digits_start = self.cursor.position();
        while self.cursor.current_char().is_ascii_hexdigit() {
            self.cursor.advance();
        }
        if self.cursor.position() == digits_start {
            self.report_error_code(
                DiagnosticCode::E_LEXER_INVALID_NUMBER,
                "malformed hex literal: '#' with no hex digits".to_string(),
            );
            let text = self.cursor.slice_from(self.token_start);
            return Token::new(TokenKind::Illegal, Symbol::intern(text), self.token_span());
        }
        self.make(TokenKind::Integer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpc_util::Handler;

    fn lex_one(source: &str) -> Token {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new(source, &mut handler);
        lexer.next_token()
    }

    #[test]
    fn decimal_literal() {
        let tok = lex_one("42");
        assert_eq!(tok.kind, TokenKind::Integer);
        assert_eq!(tok.text.as_str(), "42");
    }

    #[test]
    fn hex_literal() {
        let tok = lex_one("#FF");
        assert_eq!(tok.kind, TokenKind::Integer);
        assert_eq!(tok.text.as_str(), "#FF");
    }

    #[test]
    fn hex_literal_lowercase_digits() {
        let tok = lex_one("#cafe");
        assert_eq!(tok.kind, TokenKind::Integer);
        assert_eq!(tok.text.as_str(), "#cafe");
    }

    #[test]
    fn bare_hash_is_illegal() {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("# x", &mut handler);
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Illegal);
        assert!(handler.has_errors());
    }
}
