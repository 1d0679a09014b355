//! Identifier and keyword scanning.

use cpc_util::Symbol;

use crate::token::{keyword_from_ident, Token, TokenKind};
use crate::unicode::is_ascii_ident_continue;

use super::core::Lexer;

impl<'a> Lexer<'a> {
    /// Scans an identifier or keyword starting at the cursor.
    ///
    /// Letters, digits, and dots all continue an identifier; the caller has
    /// already verified the first character is a valid identifier start.
    pub(crate) fn lex_identifier(&mut self) -> Token {
        while is_ascii_ident_continue(self.cursor.current_char()) || self.cursor.current_char() == '.' {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        let kind = keyword_from_ident(text).unwrap_or(TokenKind::Ident);
        Token::new(kind, Symbol::intern(text), self.token_span())
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
    fn plain_identifier() {
        let tok = lex_one("counter");
        assert_eq!(tok.kind, TokenKind::Ident);
        assert_eq!(tok.text.as_str(), "counter");
    }

    #[test]
    fn dotted_identifier_is_one_token() {
        let tok = lex_one("TARGET.BITS.PER.WORD");
        assert_eq!(tok.kind, TokenKind::Ident);
        assert_eq!(tok.text.as_str(), "TARGET.BITS.PER.WORD");
    }

    #[test]
    fn uppercase_keyword() {
        let tok = lex_one("CHAN");
        assert_eq!(tok.kind, TokenKind::Chan);
    }

    #[test]
    fn func_and_function_are_the_same_keyword() {
        assert_eq!(lex_one("FUNC").kind, TokenKind::Function);
        assert_eq!(lex_one("FUNCTION").kind, TokenKind::Function);
    }

    #[test]
    fn type_keywords() {
        assert_eq!(lex_one("INT16").kind, TokenKind::Int16);
        assert_eq!(lex_one("REAL64").kind, TokenKind::Real64);
        assert_eq!(lex_one("BYTE").kind, TokenKind::KwByte);
    }

    #[test]
    fn mixed_case_is_not_a_keyword() {
        let tok = lex_one("Chan");
        assert_eq!(tok.kind, TokenKind::Ident);
    }

    #[test]
    fn identifier_with_digits() {
        let tok = lex_one("reg32");
        assert_eq!(tok.kind, TokenKind::Ident);
        assert_eq!(tok.text.as_str(), "reg32");
    }
}
