//! Type expressions: primitive element types, array dimensions, and the
//! parameter-typing vocabulary shared by procedure and function signatures.

use cpc_util::Symbol;

/// A primitive or user-named element type. Every declaration, parameter,
/// and conversion ultimately bottoms out at one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Int,
    Int16,
    Int32,
    Int64,
    Byte,
    Bool,
    Real,
    Real32,
    Real64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElemType {
    Primitive(PrimitiveType),
    /// A named record or protocol type.
    Named(Symbol),
}

/// One dimension of an array type: either a fixed size expression or an
/// open `[]T` dimension whose length is determined at the call site.
#[derive(Debug, Clone)]
pub enum ArrayDim {
    Sized(crate::expr::Expr),
    Open,
}

/// A full type expression: an element type, optionally wrapped in one or
/// more array dimensions (outermost dimension first).
#[derive(Debug, Clone)]
pub enum Type {
    Elem(ElemType),
    Array(Box<Type>, Vec<ArrayDim>),
}

impl Type {
    /// The element type at the bottom of any array nesting.
    pub fn elem_type(&self) -> &ElemType {
        match self {
            Type::Elem(e) => e,
            Type::Array(inner, _) => inner.elem_type(),
        }
    }
}

/// Direction restriction on a channel-typed procedure parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelDirection {
    Input,
    Output,
    Bidirectional,
}

/// A single procedure or function parameter.
///
/// Reference-parameter eligibility (value vs. pointer emission) is a
/// property derived from these fields by the code generator, not stored
/// here: a parameter is pass-by-reference when it is not `is_value`, not a
/// channel, has zero channel-array dimensions, zero open-array dimensions,
/// and no fixed array size.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: Symbol,
    pub ty: ElemType,
    pub is_value: bool,
    pub is_channel: bool,
    pub channel_direction: ChannelDirection,
    pub channel_array_dims: u32,
    pub open_array_dims: u32,
    /// Textual fixed-array size, e.g. the literal `10` in `[10]INT`. Kept
    /// as source text rather than a parsed expression since the parser
    /// only needs it for signature matching, not evaluation.
    pub fixed_array_size: Option<Symbol>,
    pub record_ty: Option<Symbol>,
    pub span: cpc_util::Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elem_type_of_plain_primitive() {
        let ty = Type::Elem(ElemType::Primitive(PrimitiveType::Int));
        assert_eq!(ty.elem_type(), &ElemType::Primitive(PrimitiveType::Int));
    }

    #[test]
    fn elem_type_drills_through_array_nesting() {
        let inner = Type::Elem(ElemType::Primitive(PrimitiveType::Byte));
        let ty = Type::Array(
            Box::new(Type::Array(Box::new(inner), vec![ArrayDim::Open])),
            vec![ArrayDim::Open],
        );
        assert_eq!(ty.elem_type(), &ElemType::Primitive(PrimitiveType::Byte));
    }

    #[test]
    fn named_type_for_record_or_protocol() {
        let ty = ElemType::Named(Symbol::intern("point"));
        assert_eq!(ty, ElemType::Named(Symbol::intern("point")));
    }
}
