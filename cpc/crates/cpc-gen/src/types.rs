//! Mapping from AST type expressions to target-language type syntax.
//!
//! Arrays are emitted as slices regardless of whether their dimension was
//! written as a fixed size or left open: sizes here are arbitrary runtime
//! expressions, not compile-time constants, so the target's fixed-size
//! array form (which demands a constant length) does not apply. The
//! dimension expression is used at the allocation site (`make`) instead.

use cpc_ast::types::{ChannelDirection, ElemType, PrimitiveType, Type};

use crate::idents::translate_ident;

pub fn primitive_go_type(prim: PrimitiveType) -> &'static str {
    match prim {
        PrimitiveType::Int => "int",
        PrimitiveType::Int16 => "int16",
        PrimitiveType::Int32 => "int32",
        PrimitiveType::Int64 => "int64",
        PrimitiveType::Byte => "byte",
        PrimitiveType::Bool => "bool",
        PrimitiveType::Real => "float64",
        PrimitiveType::Real32 => "float32",
        PrimitiveType::Real64 => "float64",
    }
}

pub fn elem_go_type(ty: &ElemType) -> String {
    match ty {
        ElemType::Primitive(p) => primitive_go_type(*p).to_string(),
        ElemType::Named(name) => translate_ident(name.as_str()),
    }
}

pub fn go_type(ty: &Type) -> String {
    match ty {
        Type::Elem(e) => elem_go_type(e),
        Type::Array(inner, dims) => {
            let mut out = go_type(inner);
            for _ in dims {
                out = format!("[]{out}");
            }
            out
        }
    }
}

/// `chan T`, `<-chan T`, or `chan<- T`, from the receiving/sending
/// perspective the parameter direction names. Channel arrays always drop
/// direction: a slice of directional channels is not assignable to/from a
/// slice of bidirectional ones, so the element type stays plain `chan T`.
pub fn channel_go_type(elem: &ElemType, direction: ChannelDirection, is_array: bool) -> String {
    let t = elem_go_type(elem);
    if is_array {
        return format!("chan {t}");
    }
    match direction {
        ChannelDirection::Input => format!("<-chan {t}"),
        ChannelDirection::Output => format!("chan<- {t}"),
        ChannelDirection::Bidirectional => format!("chan {t}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpc_ast::types::ArrayDim;

    #[test]
    fn primitive_types_map_to_go_spellings() {
        assert_eq!(primitive_go_type(PrimitiveType::Int32), "int32");
        assert_eq!(primitive_go_type(PrimitiveType::Byte), "byte");
        assert_eq!(primitive_go_type(PrimitiveType::Real), "float64");
    }

    #[test]
    fn array_type_nests_slice_brackets_once_per_dimension() {
        let ty = Type::Array(
            Box::new(Type::Elem(ElemType::Primitive(PrimitiveType::Int))),
            vec![ArrayDim::Open, ArrayDim::Open],
        );
        assert_eq!(go_type(&ty), "[][]int");
    }

    #[test]
    fn named_type_is_translated() {
        let ty = ElemType::Named(cpc_util::Symbol::intern("point"));
        assert_eq!(elem_go_type(&ty), "point");
    }

    #[test]
    fn channel_array_element_drops_direction() {
        let elem = ElemType::Primitive(PrimitiveType::Int);
        assert_eq!(channel_go_type(&elem, ChannelDirection::Input, true), "chan int");
        assert_eq!(channel_go_type(&elem, ChannelDirection::Input, false), "<-chan int");
    }
}
