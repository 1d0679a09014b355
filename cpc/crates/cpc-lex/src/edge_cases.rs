//! Edge case tests for cpc-lex.

#[cfg(test)]
mod tests {
    use crate::{Lexer, TokenKind};
    use cpc_util::Handler;

    fn kinds_of(source: &str) -> Vec<TokenKind> {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new(source, &mut handler);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            let eof = tok.kind == TokenKind::Eof;
            out.push(tok.kind);
            if eof {
                break;
            }
        }
        out
    }

    #[test]
    fn edge_empty_source() {
        assert_eq!(kinds_of(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn edge_single_char_ident() {
        assert_eq!(kinds_of("x"), vec![TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn edge_long_identifier() {
        let name = "a".repeat(10000);
        let kinds = kinds_of(&name);
        assert_eq!(kinds, vec![TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn edge_keywords_not_idents() {
        let kinds = kinds_of("PROC seq SEQ");
        assert_eq!(kinds[0], TokenKind::Proc);
        assert_eq!(kinds[1], TokenKind::Ident);
        assert_eq!(kinds[2], TokenKind::Seq);
    }

    #[test]
    fn edge_hex_bounds() {
        let kinds = kinds_of("#0 #FF");
        assert_eq!(kinds[0], TokenKind::Integer);
        assert_eq!(kinds[1], TokenKind::Integer);
    }

    #[test]
    fn edge_empty_string() {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("\"\"", &mut handler);
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Str);
        assert_eq!(tok.text.as_str(), "\"\"");
    }

    #[test]
    fn edge_all_operators() {
        let kinds = kinds_of(": := = <> < > <= >= + - * / \\ /\\ \\/ >< ~ << >> ! ? &");
        assert!(kinds.contains(&TokenKind::Assign));
        assert!(kinds.contains(&TokenKind::Ne));
        assert!(kinds.contains(&TokenKind::BitXor));
        assert!(kinds.contains(&TokenKind::Shl));
        assert!(kinds.contains(&TokenKind::Amp));
    }

    #[test]
    fn edge_all_punctuation() {
        let kinds = kinds_of("( ) [ ] , ; :");
        assert!(kinds.contains(&TokenKind::LParen));
        assert!(kinds.contains(&TokenKind::RBracket));
        assert!(kinds.contains(&TokenKind::Semicolon));
    }

    #[test]
    fn edge_nested_parens_suppress_layout_even_across_blank_lines() {
        let kinds = kinds_of("f(\n\n  x\n)\n");
        assert!(!kinds.contains(&TokenKind::Indent));
        assert!(!kinds.contains(&TokenKind::Dedent));
    }

    #[test]
    fn edge_case_sensitivity() {
        let kinds = kinds_of("Seq SEQ");
        assert_eq!(kinds[0], TokenKind::Ident);
        assert_eq!(kinds[1], TokenKind::Seq);
    }

    #[test]
    fn edge_bools() {
        let kinds = kinds_of("TRUE FALSE");
        assert_eq!(kinds[0], TokenKind::True);
        assert_eq!(kinds[1], TokenKind::False);
    }

    #[test]
    fn edge_underscore_in_identifier() {
        let kinds = kinds_of("my_var");
        assert_eq!(kinds[0], TokenKind::Ident);
    }

    #[test]
    fn edge_tilde_is_unary_not() {
        let kinds = kinds_of("~mask");
        assert_eq!(kinds[0], TokenKind::BitNot);
        assert_eq!(kinds[1], TokenKind::Ident);
    }

    #[test]
    fn edge_all_type_keywords() {
        let kinds = kinds_of("INT INT16 INT32 INT64 BYTE BOOL REAL REAL32 REAL64");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Int,
                TokenKind::Int16,
                TokenKind::Int32,
                TokenKind::Int64,
                TokenKind::KwByte,
                TokenKind::Bool,
                TokenKind::Real,
                TokenKind::Real32,
                TokenKind::Real64,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn err_invalid_hex() {
        let mut handler = Handler::new();
        let tok = Lexer::new("# x", &mut handler).next_token();
        assert_eq!(tok.kind, TokenKind::Illegal);
        assert!(handler.has_errors());
    }

    #[test]
    fn err_unterminated_string() {
        let mut handler = Handler::new();
        let _ = Lexer::new("\"unterminated", &mut handler).next_token();
        assert!(handler.has_errors());
    }

    #[test]
    fn err_unterminated_byte() {
        let mut handler = Handler::new();
        let _ = Lexer::new("'x", &mut handler).next_token();
        assert!(handler.has_errors());
    }

    #[test]
    fn err_invalid_chars() {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("@#`", &mut handler);
        loop {
            if lexer.next_token().kind == TokenKind::Eof {
                break;
            }
        }
        assert!(handler.has_errors());
    }

    #[test]
    fn err_mixed_valid_invalid() {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("INT x IS `42:", &mut handler);
        loop {
            if lexer.next_token().kind == TokenKind::Eof {
                break;
            }
        }
        assert!(handler.has_errors());
    }

    #[test]
    fn edge_whitespace_variations() {
        let kinds = kinds_of("SEQ\t\nSKIP\n");
        assert!(kinds.contains(&TokenKind::Seq));
        assert!(kinds.contains(&TokenKind::Skip));
    }

    #[test]
    fn edge_leading_zeros() {
        let kinds = kinds_of("007");
        assert_eq!(kinds[0], TokenKind::Integer);
    }

    #[test]
    fn edge_dedent_to_unmatched_column_is_illegal() {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("SEQ\n    SKIP\n  STOP\n", &mut handler);
        loop {
            if lexer.next_token().kind == TokenKind::Eof {
                break;
            }
        }
        assert!(handler.has_errors());
    }
}
