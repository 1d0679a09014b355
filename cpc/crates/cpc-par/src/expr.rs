//! Expression parsing.
//!
//! There is no precedence table: an expression is one operand, optionally
//! followed by exactly one binary operator and a second operand. Anything
//! more than that has to be written with explicit parentheses, which is why
//! `Expr::Paren` exists as its own node rather than being discarded — nesting
//! comes from parenthesized sub-expressions, not from a climbing parser.

use cpc_ast::expr::{
    BinOp, BinaryExpr, CallExpr, ConversionExpr, Expr, IndexExpr, IntBase, Literal,
    RoundingQualifier, SliceExpr, UnOp, UnaryExpr,
};
use cpc_ast::types::ElemType;
use cpc_lex::TokenKind;
use cpc_util::Symbol;

use crate::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_expr(&mut self) -> Option<Expr> {
        let left = self.parse_operand()?;
        match self.peek_binop() {
            Some(op) => {
                self.advance();
                let right = self.parse_operand()?;
                let span = left.span().merge(right.span());
                Some(Expr::Binary(BinaryExpr {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                    span,
                }))
            }
            None => Some(left),
        }
    }

    fn peek_binop(&self) -> Option<BinOp> {
        Some(match self.current().kind {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::Mod => BinOp::Mod,
            TokenKind::BitAnd => BinOp::BitAnd,
            TokenKind::BitOr => BinOp::BitOr,
            TokenKind::BitXor => BinOp::BitXor,
            TokenKind::Shl => BinOp::Shl,
            TokenKind::Shr => BinOp::Shr,
            TokenKind::Eq => BinOp::Eq,
            TokenKind::Ne => BinOp::Ne,
            TokenKind::Lt => BinOp::Lt,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::Le => BinOp::Le,
            TokenKind::Ge => BinOp::Ge,
            TokenKind::And => BinOp::And,
            TokenKind::Or => BinOp::Or,
            TokenKind::After => BinOp::After,
            TokenKind::KwPlus => BinOp::CheckedPlus,
            TokenKind::KwMinus => BinOp::CheckedMinus,
            TokenKind::KwTimes => BinOp::CheckedTimes,
            _ => return None,
        })
    }

    /// A single operand: a unary-prefixed expression, `SIZE`/`MOSTNEG`/
    /// `MOSTPOS`, a type conversion, a parenthesized sub-expression, a
    /// bracketed slice or array literal, a literal, or an identifier
    /// optionally followed by index operations or a call's argument list.
    fn parse_operand(&mut self) -> Option<Expr> {
        let span_start = self.current().span;
        match self.current().kind {
            TokenKind::Not => {
                self.advance();
                let inner = self.parse_operand()?;
                let span = self.finish_span(span_start);
                Some(Expr::Unary(UnaryExpr { op: UnOp::Not, expr: Box::new(inner), span }))
            }
            TokenKind::Minus => {
                self.advance();
                let inner = self.parse_operand()?;
                let span = self.finish_span(span_start);
                Some(Expr::Unary(UnaryExpr { op: UnOp::Neg, expr: Box::new(inner), span }))
            }
            TokenKind::BitNot => {
                self.advance();
                let inner = self.parse_operand()?;
                let span = self.finish_span(span_start);
                Some(Expr::Unary(UnaryExpr { op: UnOp::BitNot, expr: Box::new(inner), span }))
            }
            TokenKind::Size => {
                self.advance();
                let inner = self.parse_operand()?;
                let span = self.finish_span(span_start);
                Some(Expr::Size(Box::new(inner), span))
            }
            TokenKind::Mostneg => {
                self.advance();
                let prim = self.parse_primitive_type()?;
                let span = self.finish_span(span_start);
                Some(Expr::Mostneg(prim, span))
            }
            TokenKind::Mostpos => {
                self.advance();
                let prim = self.parse_primitive_type()?;
                let span = self.finish_span(span_start);
                Some(Expr::Mostpos(prim, span))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                let span = self.finish_span(span_start);
                Some(Expr::Paren(Box::new(inner), span))
            }
            TokenKind::LBracket => self.parse_bracket_expr(span_start),
            TokenKind::Integer | TokenKind::Str | TokenKind::ByteLit | TokenKind::True | TokenKind::False => {
                let lit = self.parse_literal()?;
                let span = self.finish_span(span_start);
                Some(Expr::Literal(lit, span))
            }
            _ if self.starts_primitive_type() => self.parse_conversion(span_start),
            TokenKind::Ident => self.parse_ident_operand(span_start),
            _ => {
                self.error("expected an expression");
                None
            }
        }
    }

    /// `T e`, `T ROUND e`, `T TRUNC e`. `ROUND`/`TRUNC` are not reserved
    /// words in the lexer (they lex as plain identifiers), so they are
    /// recognized here by spelling, immediately after a type keyword — the
    /// only place they are meaningful.
    fn parse_conversion(&mut self, span_start: cpc_util::Span) -> Option<Expr> {
        let prim = self.parse_primitive_type()?;
        let qualifier = if self.check(TokenKind::Ident) && self.current().text.as_str() == "ROUND" {
            self.advance();
            RoundingQualifier::Round
        } else if self.check(TokenKind::Ident) && self.current().text.as_str() == "TRUNC" {
            self.advance();
            RoundingQualifier::Trunc
        } else {
            RoundingQualifier::None
        };
        let inner = self.parse_operand()?;
        let span = self.finish_span(span_start);
        Some(Expr::Conversion(ConversionExpr {
            target_ty: ElemType::Primitive(prim),
            qualifier,
            expr: Box::new(inner),
            span,
        }))
    }

    /// `[]` (empty array literal), `[e, e, ...]`, or `[arr FROM start FOR
    /// length]`; the three share a leading `[expr` and only diverge once
    /// `FROM` does or doesn't show up.
    fn parse_bracket_expr(&mut self, span_start: cpc_util::Span) -> Option<Expr> {
        self.advance();
        if self.match_kind(TokenKind::RBracket) {
            let span = self.finish_span(span_start);
            return Some(Expr::ArrayLiteral(Vec::new(), span));
        }
        let first = self.parse_expr()?;
        if self.match_kind(TokenKind::From) {
            let start = self.parse_expr()?;
            self.expect(TokenKind::For)?;
            let length = self.parse_expr()?;
            self.expect(TokenKind::RBracket)?;
            let span = self.finish_span(span_start);
            return Some(Expr::Slice(SliceExpr {
                array: Box::new(first),
                start: Box::new(start),
                length: Box::new(length),
                span,
            }));
        }
        let mut elems = vec![first];
        while self.match_kind(TokenKind::Comma) {
            elems.push(self.parse_expr()?);
        }
        self.expect(TokenKind::RBracket)?;
        let span = self.finish_span(span_start);
        Some(Expr::ArrayLiteral(elems, span))
    }

    fn parse_ident_operand(&mut self, span_start: cpc_util::Span) -> Option<Expr> {
        let name = self.parse_name_ident()?;
        if self.match_kind(TokenKind::LParen) {
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
            return Some(Expr::Call(CallExpr { name, args, span }));
        }
        let mut expr = Expr::Ident(name, span_start);
        while self.match_kind(TokenKind::LBracket) {
            let index = self.parse_expr()?;
            self.expect(TokenKind::RBracket)?;
            let span = self.finish_span(span_start);
            expr = Expr::Index(IndexExpr { base: Box::new(expr), index: Box::new(index), span });
        }
        Some(expr)
    }

    /// A bare literal, used by `CASE` arms which only ever match against
    /// constant values rather than arbitrary expressions.
    pub(crate) fn parse_literal(&mut self) -> Option<Literal> {
        let tok = self.current();
        let lit = match tok.kind {
            TokenKind::Integer => {
                self.advance();
                Self::int_literal_from_text(tok.text)
            }
            TokenKind::Str => {
                self.advance();
                Literal::Str(tok.text)
            }
            TokenKind::ByteLit => {
                self.advance();
                Literal::Byte(tok.text)
            }
            TokenKind::True => {
                self.advance();
                Literal::Bool(true)
            }
            TokenKind::False => {
                self.advance();
                Literal::Bool(false)
            }
            _ => {
                self.error("expected a literal");
                return None;
            }
        };
        Some(lit)
    }

    fn int_literal_from_text(text: Symbol) -> Literal {
        let raw = text.as_str();
        match raw.strip_prefix('#') {
            Some(hex) => Literal::Int {
                value: i64::from_str_radix(hex, 16).unwrap_or(0),
                base: IntBase::Hex,
            },
            None => Literal::Int {
                value: raw.parse().unwrap_or(0),
                base: IntBase::Decimal,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use cpc_lex::Lexer;
    use cpc_util::Handler;

    use super::*;

    fn parse(source: &'static str) -> (Expr, Handler) {
        let mut handler = Handler::new();
        let tokens: Vec<_> = Lexer::new(source, &mut handler).collect();
        let mut parser = Parser::new(tokens, &mut handler);
        let expr = parser.parse_expr().expect("expression should parse");
        (expr, handler)
    }

    #[test]
    fn hex_literal_keeps_its_base() {
        let (expr, handler) = parse("#FF");
        assert!(!handler.has_errors());
        match expr {
            Expr::Literal(Literal::Int { value, base }, _) => {
                assert_eq!(value, 255);
                assert_eq!(base, IntBase::Hex);
            }
            _ => panic!("expected an int literal"),
        }
    }

    #[test]
    fn single_binary_operator_is_accepted_unparenthesized() {
        let (expr, handler) = parse("a + b");
        assert!(!handler.has_errors());
        assert!(matches!(expr, Expr::Binary(b) if b.op == BinOp::Add));
    }

    #[test]
    fn parenthesized_subexpression_is_its_own_node() {
        let (expr, handler) = parse("(a + b) * c");
        assert!(!handler.has_errors());
        match expr {
            Expr::Binary(b) => {
                assert_eq!(b.op, BinOp::Mul);
                assert!(matches!(*b.left, Expr::Paren(_, _)));
            }
            _ => panic!("expected a binary expression"),
        }
    }

    #[test]
    fn slice_expression_reads_from_and_for() {
        let (expr, handler) = parse("[buf FROM 0 FOR 4]");
        assert!(!handler.has_errors());
        assert!(matches!(expr, Expr::Slice(_)));
    }

    #[test]
    fn array_literal_collects_its_elements() {
        let (expr, handler) = parse("[1, 2, 3]");
        assert!(!handler.has_errors());
        assert!(matches!(expr, Expr::ArrayLiteral(elems, _) if elems.len() == 3));
    }

    #[test]
    fn conversion_recognizes_round_by_spelling() {
        let (expr, handler) = parse("REAL32 ROUND x");
        assert!(!handler.has_errors());
        match expr {
            Expr::Conversion(c) => assert_eq!(c.qualifier, RoundingQualifier::Round),
            _ => panic!("expected a conversion"),
        }
    }

    #[test]
    fn call_expression_collects_arguments() {
        let (expr, handler) = parse("f(a, b)");
        assert!(!handler.has_errors());
        assert!(matches!(expr, Expr::Call(c) if c.args.len() == 2));
    }

    #[test]
    fn size_wraps_its_operand() {
        let (expr, handler) = parse("SIZE arr");
        assert!(!handler.has_errors());
        assert!(matches!(expr, Expr::Size(_, _)));
    }

    #[test]
    fn mostneg_carries_its_type() {
        let (expr, handler) = parse("MOSTNEG INT");
        assert!(!handler.has_errors());
        assert!(matches!(expr, Expr::Mostneg(_, _)));
    }
}
