//! Expression lowering.

use cpc_ast::expr::{BinOp, Expr, IntBase, Literal, RoundingQualifier, UnOp};
use cpc_ast::types::{ElemType, PrimitiveType};

use crate::idents::translate_ident;
use crate::types::{elem_go_type, primitive_go_type};
use crate::Generator;

impl Generator {
    pub(crate) fn lower_expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Ident(name, _) => {
                let translated = translate_ident(name.as_str());
                if self.is_byref_in_scope(*name) {
                    format!("(*{translated})")
                } else {
                    translated
                }
            }
            Expr::Literal(lit, _) => self.lower_literal(lit),
            Expr::Binary(b) => {
                let left = self.lower_expr(&b.left);
                let right = self.lower_expr(&b.right);
                self.lower_binop(b.op, &left, &right)
            }
            Expr::Unary(u) => {
                let inner = self.lower_expr(&u.expr);
                match u.op {
                    UnOp::Neg => format!("-({inner})"),
                    UnOp::Not => format!("!({inner})"),
                    UnOp::BitNot => format!("^({inner})"),
                }
            }
            Expr::Paren(inner, _) => format!("({})", self.lower_expr(inner)),
            Expr::Index(i) => {
                let base = self.lower_expr(&i.base);
                let index = self.lower_expr(&i.index);
                format!("{base}[{index}]")
            }
            Expr::Slice(s) => {
                let array = self.lower_expr(&s.array);
                let start = self.lower_expr(&s.start);
                let length = self.lower_expr(&s.length);
                format!("{array}[{start}:{start}+{length}]")
            }
            Expr::Call(c) => {
                if is_transputer_intrinsic(c.name.as_str()) {
                    self.needs.transputer_helpers = true;
                }
                let name = translate_ident(c.name.as_str());
                let mut args = Vec::with_capacity(c.args.len());
                for arg in &c.args {
                    args.push(self.lower_expr(arg));
                }
                format!("{name}({})", args.join(", "))
            }
            Expr::Conversion(c) => self.lower_conversion(c),
            Expr::Size(inner, _) => {
                let rendered = self.lower_expr(inner);
                format!("len({rendered})")
            }
            Expr::Mostneg(prim, _) => self.lower_most_limit(*prim, false),
            Expr::Mostpos(prim, _) => self.lower_most_limit(*prim, true),
            Expr::ArrayLiteral(elems, _) => self.lower_array_literal(elems),
        }
    }

    fn lower_literal(&self, lit: &Literal) -> String {
        match lit {
            Literal::Int { value, base: IntBase::Hex } => format!("0x{value:X}"),
            Literal::Int { value, base: IntBase::Decimal } => value.to_string(),
            Literal::Str(sym) => format!("{:?}", sym.as_str()),
            Literal::Byte(sym) => translate_byte_literal(sym.as_str()),
            Literal::Bool(b) => b.to_string(),
        }
    }

    fn lower_binop(&mut self, op: BinOp, left: &str, right: &str) -> String {
        match op {
            BinOp::Add | BinOp::CheckedPlus => format!("({left} + {right})"),
            BinOp::Sub | BinOp::CheckedMinus => format!("({left} - {right})"),
            BinOp::Mul | BinOp::CheckedTimes => format!("({left} * {right})"),
            BinOp::Div => format!("({left} / {right})"),
            BinOp::Mod => format!("({left} % {right})"),
            BinOp::BitAnd => format!("({left} & {right})"),
            BinOp::BitOr => format!("({left} | {right})"),
            BinOp::BitXor => format!("({left} ^ {right})"),
            BinOp::Shl => format!("({left} << {right})"),
            BinOp::Shr => format!("({left} >> {right})"),
            BinOp::Eq => format!("({left} == {right})"),
            BinOp::Ne => format!("({left} != {right})"),
            BinOp::Lt => format!("({left} < {right})"),
            BinOp::Gt => format!("({left} > {right})"),
            BinOp::Le => format!("({left} <= {right})"),
            BinOp::Ge => format!("({left} >= {right})"),
            BinOp::And => format!("({left} && {right})"),
            BinOp::Or => format!("({left} || {right})"),
            BinOp::After => {
                self.needs.time = true;
                self.needs.after_helper = true;
                format!("cpcAfter({left}, {right})")
            }
        }
    }

    fn lower_conversion(&mut self, c: &cpc_ast::expr::ConversionExpr) -> String {
        let inner = self.lower_expr(&c.expr);
        let target = elem_go_type(&c.target_ty);

        if matches!(&c.target_ty, ElemType::Primitive(PrimitiveType::Bool)) {
            return format!("({inner} != 0)");
        }
        if self.is_bool_expr(&c.expr) {
            self.needs.bool_to_int_helper = true;
            let as_int = format!("cpcBoolToInt({inner})");
            return if target == "int" { as_int } else { format!("{target}({as_int})") };
        }

        match c.qualifier {
            RoundingQualifier::Round => {
                self.needs.math = true;
                format!("{target}(math.Round(float64({inner})))")
            }
            RoundingQualifier::Trunc | RoundingQualifier::None => format!("{target}({inner})"),
        }
    }

    /// Whether `e` is known to be `bool`-typed, without a full type checker:
    /// literal booleans, names collected by `prepass::collect_bool_vars`,
    /// negation, and the comparison/logical operators (whose results are
    /// always `bool` regardless of operand type).
    fn is_bool_expr(&self, e: &Expr) -> bool {
        match e {
            Expr::Literal(Literal::Bool(_), _) => true,
            Expr::Ident(name, _) => self.bool_vars.contains(name),
            Expr::Paren(inner, _) => self.is_bool_expr(inner),
            Expr::Unary(u) => matches!(u.op, UnOp::Not),
            Expr::Binary(b) => matches!(
                b.op,
                BinOp::And
                    | BinOp::Or
                    | BinOp::Eq
                    | BinOp::Ne
                    | BinOp::Lt
                    | BinOp::Gt
                    | BinOp::Le
                    | BinOp::Ge
            ),
            _ => false,
        }
    }

    fn lower_most_limit(&mut self, prim: PrimitiveType, positive: bool) -> String {
        match prim {
            PrimitiveType::Byte => if positive { "255".into() } else { "0".into() },
            PrimitiveType::Bool => if positive { "true".into() } else { "false".into() },
            PrimitiveType::Real | PrimitiveType::Real32 | PrimitiveType::Real64 => {
                self.needs.math = true;
                if positive { "math.MaxFloat64".into() } else { "-math.MaxFloat64".into() }
            }
            _ => {
                self.needs.math = true;
                let ty = primitive_go_type(prim);
                if positive { format!("math.Max{}", go_math_suffix(ty)) } else { format!("math.Min{}", go_math_suffix(ty)) }
            }
        }
    }

    /// Without a type-checking pass the element type of an array literal is
    /// inferred from its own contents rather than from the declaration it
    /// initializes; a heterogeneous or empty literal falls back to `int`.
    fn lower_array_literal(&mut self, elems: &[Expr]) -> String {
        let elem_ty = elems
            .first()
            .map(|e| infer_literal_go_type(e))
            .unwrap_or_else(|| "int".to_string());
        let mut rendered = Vec::with_capacity(elems.len());
        for elem in elems {
            rendered.push(self.lower_expr(elem));
        }
        format!("[]{elem_ty}{{{}}}", rendered.join(", "))
    }
}

/// The seven transputer double-word arithmetic intrinsics, emitted as
/// fixed-32-bit-semantics helper functions of the same name when used.
fn is_transputer_intrinsic(name: &str) -> bool {
    matches!(
        name,
        "LONGPROD" | "LONGDIV" | "LONGSUM" | "LONGDIFF" | "NORMALISE" | "SHIFTRIGHT" | "SHIFTLEFT"
    )
}

fn go_math_suffix(go_ty: &str) -> &'static str {
    match go_ty {
        "int" => "Int",
        "int16" => "Int16",
        "int32" => "Int32",
        "int64" => "Int64",
        _ => "Int",
    }
}

fn infer_literal_go_type(e: &Expr) -> String {
    match e {
        Expr::Literal(Literal::Int { .. }, _) => "int".to_string(),
        Expr::Literal(Literal::Str(_), _) => "string".to_string(),
        Expr::Literal(Literal::Byte(_), _) => "byte".to_string(),
        Expr::Literal(Literal::Bool(_), _) => "bool".to_string(),
        _ => elem_go_type(&ElemType::Primitive(PrimitiveType::Int)),
    }
}

/// Occam byte-literal escapes (`*n`, `*t`, `*s`, `*c`, `*"`, `**`) translated
/// to their Go rune-literal equivalents; anything else is passed through
/// verbatim inside single quotes.
fn translate_byte_literal(raw: &str) -> String {
    match raw {
        "*n" => "'\\n'".to_string(),
        "*t" => "'\\t'".to_string(),
        "*s" => "' '".to_string(),
        "*c" => "'\\r'".to_string(),
        "*\"" => "'\"'".to_string(),
        "**" => "'*'".to_string(),
        "*'" => "'\\''".to_string(),
        other if other.len() == 1 => format!("'{other}'"),
        other => format!("{other:?}[0]"),
    }
}
