//! Declaration-statement parsing: variable/array/channel/timer declarations,
//! `RECORD` and `PROTOCOL` definitions, abbreviations, and `RETYPES`.

use cpc_ast::decl::{
    Abbrev, AbbrevQualifier, ArrayDecl, ChanDecl, ProtocolDecl, ProtocolKind, ProtocolVariant,
    RecordDecl, RecordField, RetypesDecl, TimerDecl, VarDecl,
};
use cpc_ast::expr::Expr;
use cpc_ast::types::{ElemType, Type};
use cpc_ast::Stmt;
use cpc_lex::TokenKind;

use crate::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_timer_decl(&mut self) -> Option<Stmt> {
        let span_start = self.current().span;
        self.expect(TokenKind::Timer)?;
        let first = self.parse_name_ident()?;
        let names = self.parse_name_list(first);
        for name in &names {
            self.timer_names.insert(*name);
        }
        self.expect(TokenKind::Colon)?;
        let span = self.finish_span(span_start);
        self.end_of_line();
        Some(Stmt::TimerDecl(TimerDecl { names, span }))
    }

    pub(crate) fn parse_record_decl(&mut self) -> Option<Stmt> {
        let span_start = self.current().span;
        self.expect(TokenKind::Record)?;
        let name = self.parse_name_ident()?;
        self.expect(TokenKind::Colon)?;
        self.end_of_line();
        if !self.match_kind(TokenKind::Indent) {
            self.error("expected an indented RECORD field block");
            return None;
        }
        let mut fields = Vec::new();
        while !self.check(TokenKind::Dedent) && !self.is_at_end() {
            let Some(ty) = self.parse_elem_type() else {
                self.recover_to_sync_point();
                continue;
            };
            let Some(field_name) = self.parse_name_ident() else {
                self.recover_to_sync_point();
                continue;
            };
            self.expect(TokenKind::Colon);
            self.end_of_line();
            fields.push(RecordField { ty, name: field_name });
        }
        self.expect(TokenKind::Dedent);
        let span = self.finish_span(span_start);
        Some(Stmt::RecordDecl(RecordDecl { name, fields, span }))
    }

    pub(crate) fn parse_protocol_decl(&mut self) -> Option<Stmt> {
        let span_start = self.current().span;
        self.expect(TokenKind::Protocol)?;
        let name = self.parse_name_ident()?;
        self.expect(TokenKind::Is)?;

        // A variant protocol lists its tags on indented lines after `CASE`;
        // a simple/sequential protocol lists one or more `;`-separated
        // element types on the declaration's own line.
        if self.match_kind(TokenKind::Case) {
            self.end_of_line();
            let mut variants = Vec::new();
            if self.match_kind(TokenKind::Indent) {
                while !self.check(TokenKind::Dedent) && !self.is_at_end() {
                    let Some(tag) = self.parse_name_ident() else {
                        self.recover_to_sync_point();
                        continue;
                    };
                    let mut payload = Vec::new();
                    while self.match_kind(TokenKind::Semicolon) {
                        match self.parse_elem_type() {
                            Some(ty) => payload.push(ty),
                            None => break,
                        }
                    }
                    self.end_of_line();
                    variants.push(ProtocolVariant { tag, payload });
                }
                self.expect(TokenKind::Dedent);
            }
            let span = self.finish_span(span_start);
            return Some(Stmt::ProtocolDecl(ProtocolDecl {
                name,
                kind: ProtocolKind::Variant(variants),
                span,
            }));
        }

        let first = self.parse_elem_type()?;
        let mut rest = Vec::new();
        while self.match_kind(TokenKind::Semicolon) {
            match self.parse_elem_type() {
                Some(ty) => rest.push(ty),
                None => break,
            }
        }
        self.expect(TokenKind::Colon)?;
        let span = self.finish_span(span_start);
        self.end_of_line();
        let kind = if rest.is_empty() {
            ProtocolKind::Simple(first)
        } else {
            rest.insert(0, first);
            ProtocolKind::Sequential(rest)
        };
        Some(Stmt::ProtocolDecl(ProtocolDecl { name, kind, span }))
    }

    /// Everything that begins with an optional `VAL`/`INITIAL` qualifier and
    /// a type: plain declarations, channel declarations, `RETYPES`, and
    /// typed abbreviations. Callers have already confirmed `starts_type()`
    /// (or a qualifier keyword) holds before calling this.
    pub(crate) fn parse_typed_construct(&mut self) -> Option<Stmt> {
        let span_start = self.current().span;
        let qualifier = if self.match_kind(TokenKind::Val) {
            AbbrevQualifier::Val
        } else if self.match_kind(TokenKind::Initial) {
            AbbrevQualifier::Initial
        } else {
            AbbrevQualifier::None
        };

        let mut array_dims = Vec::new();
        while self.check(TokenKind::LBracket) && self.bracket_prefix_is_array_dim() {
            self.advance();
            let dim = self.parse_expr()?;
            self.expect(TokenKind::RBracket)?;
            array_dims.push(dim);
        }

        if self.match_kind(TokenKind::Chan) {
            return self.parse_chan_decl(span_start, array_dims);
        }

        let elem_ty = self.parse_elem_type()?;
        let name = self.parse_name_ident()?;

        if self.match_kind(TokenKind::Retypes) {
            let source = self.parse_name_ident()?;
            self.expect(TokenKind::Colon)?;
            let span = self.finish_span(span_start);
            self.end_of_line();
            let target_ty = Self::wrap_array(Type::Elem(elem_ty), array_dims);
            return Some(Stmt::Retypes(RetypesDecl {
                is_val: qualifier == AbbrevQualifier::Val,
                target_ty,
                target_name: name,
                source_name: source,
                span,
            }));
        }

        if self.match_kind(TokenKind::Is) {
            let value = self.parse_expr()?;
            self.expect(TokenKind::Colon)?;
            let span = self.finish_span(span_start);
            self.end_of_line();
            let ty = Self::wrap_array(Type::Elem(elem_ty), array_dims);
            return Some(Stmt::Abbrev(Abbrev {
                qualifier,
                ty: Some(ty),
                name,
                value,
                span,
            }));
        }

        let names = self.parse_name_list(name);
        self.expect(TokenKind::Colon)?;
        let span = self.finish_span(span_start);
        self.end_of_line();
        if array_dims.is_empty() {
            Some(Stmt::VarDecl(VarDecl { ty: elem_ty, names, span }))
        } else {
            Some(Stmt::ArrayDecl(ArrayDecl {
                dims: array_dims,
                elem_ty,
                names,
                span,
            }))
        }
    }

    fn parse_chan_decl(&mut self, span_start: cpc_util::Span, array_dims: Vec<Expr>) -> Option<Stmt> {
        self.expect(TokenKind::Of)?;
        let elem_ty = self.parse_elem_type()?;
        let first = self.parse_name_ident()?;
        let names = self.parse_name_list(first);
        self.expect(TokenKind::Colon)?;
        let span = self.finish_span(span_start);
        self.end_of_line();
        Some(Stmt::ChanDecl(ChanDecl { elem_ty, array_dims, names, span }))
    }

    /// A bare `IS` abbreviation with no declared type: `name IS expr:`. The
    /// name has already been consumed by the caller, which is the only one
    /// that can tell this apart from an assignment or channel operation on
    /// the same leading identifier.
    pub(crate) fn parse_untyped_abbrev(
        &mut self,
        name: cpc_util::Symbol,
        span_start: cpc_util::Span,
    ) -> Option<Stmt> {
        self.expect(TokenKind::Is)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Colon)?;
        let span = self.finish_span(span_start);
        self.end_of_line();
        Some(Stmt::Abbrev(Abbrev {
            qualifier: AbbrevQualifier::None,
            ty: None,
            name,
            value,
            span,
        }))
    }

    fn wrap_array(elem: Type, dims: Vec<Expr>) -> Type {
        if dims.is_empty() {
            elem
        } else {
            Type::Array(
                Box::new(elem),
                dims.into_iter().map(cpc_ast::types::ArrayDim::Sized).collect(),
            )
        }
    }

    /// Same lookahead as `bracket_prefix_introduces_type`, but also accepts
    /// `CHAN` so a channel-array prefix (`[4]CHAN OF INT c:`) is consumed as
    /// a dimension rather than mistaken for the chan-type branch itself.
    fn bracket_prefix_is_array_dim(&self) -> bool {
        self.bracket_prefix_introduces_type()
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
    fn plain_var_decl_with_multiple_names() {
        let (stmt, handler) = parse_one("INT a, b:\n");
        assert!(!handler.has_errors());
        match stmt {
            Stmt::VarDecl(decl) => assert_eq!(decl.names.len(), 2),
            _ => panic!("expected a VarDecl"),
        }
    }

    #[test]
    fn array_decl_carries_its_dimension() {
        let (stmt, handler) = parse_one("[10]INT buf:\n");
        assert!(!handler.has_errors());
        match stmt {
            Stmt::ArrayDecl(decl) => assert_eq!(decl.dims.len(), 1),
            _ => panic!("expected an ArrayDecl"),
        }
    }

    #[test]
    fn channel_decl_parses_element_type() {
        let (stmt, handler) = parse_one("CHAN OF INT c:\n");
        assert!(!handler.has_errors());
        assert!(matches!(stmt, Stmt::ChanDecl(_)));
    }

    #[test]
    fn val_abbreviation_is_read_only() {
        let (stmt, handler) = parse_one("VAL INT limit IS 100:\n");
        assert!(!handler.has_errors());
        match stmt {
            Stmt::Abbrev(a) => assert_eq!(a.qualifier, AbbrevQualifier::Val),
            _ => panic!("expected an Abbrev"),
        }
    }

    #[test]
    fn timer_decl_registers_the_name() {
        let mut handler = Handler::new();
        let tokens: Vec<_> = Lexer::new("TIMER tim:\n", &mut handler).collect();
        let mut parser = Parser::new(tokens, &mut handler);
        parser.parse_stmt();
        assert!(parser.timer_names.contains(&cpc_util::Symbol::intern("tim")));
    }

    #[test]
    fn retypes_carries_source_and_target_names() {
        let (stmt, handler) = parse_one("VAL INT32 y RETYPES x:\n");
        assert!(!handler.has_errors());
        match stmt {
            Stmt::Retypes(r) => {
                assert_eq!(r.target_name, cpc_util::Symbol::intern("y"));
                assert_eq!(r.source_name, cpc_util::Symbol::intern("x"));
            }
            _ => panic!("expected a RetypesDecl"),
        }
    }
}
