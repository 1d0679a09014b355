//! Identifier translation: source names may contain dots and may collide
//! with target-language keywords or predeclared identifiers.

use cpc_util::FxHashSet;
use std::sync::OnceLock;

fn reserved() -> &'static FxHashSet<&'static str> {
    static RESERVED: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    RESERVED.get_or_init(|| {
        [
            // keywords
            "break", "case", "chan", "const", "continue", "default", "defer", "else",
            "fallthrough", "for", "func", "go", "goto", "if", "import", "interface", "map",
            "package", "range", "return", "select", "struct", "switch", "type", "var",
            // primitive type names
            "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32",
            "uint64", "uintptr", "float32", "float64", "complex64", "complex128", "bool",
            "byte", "rune", "string", "error", "any",
            // commonly-overloaded predeclared identifiers
            "len", "cap", "make", "new", "copy", "close", "delete", "panic", "recover",
            "print", "println", "true", "false", "nil", "iota",
            // reserved for the generated entry harness, not a Go keyword itself
            "main",
        ]
        .into_iter()
        .collect()
    })
}

/// `.` becomes `_`; a result colliding with a reserved name gets a leading
/// underscore so it no longer collides.
pub fn translate_ident(name: &str) -> String {
    let replaced = name.replace('.', "_");
    if reserved().contains(replaced.as_str()) {
        format!("_{replaced}")
    } else {
        replaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dots_become_underscores() {
        assert_eq!(translate_ident("lib.helper"), "lib_helper");
    }

    #[test]
    fn keyword_collision_is_prefixed() {
        assert_eq!(translate_ident("range"), "_range");
        assert_eq!(translate_ident("len"), "_len");
    }

    #[test]
    fn ordinary_name_is_unchanged() {
        assert_eq!(translate_ident("counter"), "counter");
    }

    #[test]
    fn dotted_name_that_collides_after_replacement_is_still_prefixed() {
        assert_eq!(translate_ident("for"), "_for");
    }
}
