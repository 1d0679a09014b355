//! Recursive-descent evaluator for `#IF` expressions.
//!
//! Grammar:
//! ```text
//! expr    := "TRUE" | "FALSE"
//!          | "NOT" expr
//!          | "DEFINED" "(" SYM ")"
//!          | "(" expr ")"
//!          | "(" SYM "=" value ")"
//!          | SYM
//! ```

use rustc_hash::FxHashMap;

/// Evaluates a `#IF` condition against the current symbol table.
///
/// `symbols` maps a defined symbol name to its textual value (empty string
/// for symbols defined via a bare `#DEFINE SYM`).
pub fn eval(expr: &str, symbols: &FxHashMap<String, String>) -> bool {
    let mut parser = ExprParser {
        tokens: tokenize(expr),
        pos: 0,
    };
    parser.parse_expr(symbols)
}

fn tokenize(expr: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            '(' | ')' | '=' => {
                tokens.push(c.to_string());
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                for c in chars.by_ref() {
                    if c == '"' {
                        break;
                    }
                    value.push(c);
                }
                tokens.push(value);
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' || c == '=' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(word);
            }
        }
    }

    tokens
}

struct ExprParser {
    tokens: Vec<String>,
    pos: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn advance(&mut self) -> Option<String> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    /// Parses one expression. Malformed input evaluates to `false` rather
    /// than panicking; the preprocessor has no fatal failure mode for a
    /// bad `#IF` condition.
    fn parse_expr(&mut self, symbols: &FxHashMap<String, String>) -> bool {
        match self.advance() {
            None => false,
            Some(tok) => match tok.to_ascii_uppercase().as_str() {
                "TRUE" => true,
                "FALSE" => false,
                "NOT" => !self.parse_expr(symbols),
                "DEFINED" => {
                    if self.peek() == Some("(") {
                        self.advance();
                        let sym = self.advance().unwrap_or_default();
                        if self.peek() == Some(")") {
                            self.advance();
                        }
                        symbols.contains_key(&sym)
                    } else {
                        false
                    }
                }
                "(" => {
                    // Either a parenthesized sub-expression or `(SYM = value)`.
                    if self.tokens.get(self.pos + 1).map(String::as_str) == Some("=") {
                        let sym = self.advance().unwrap_or_default();
                        self.advance(); // '='
                        let value = self.advance().unwrap_or_default();
                        if self.peek() == Some(")") {
                            self.advance();
                        }
                        symbols.get(&sym).map(|v| v == &value).unwrap_or(false)
                    } else {
                        let inner = self.parse_expr(symbols);
                        if self.peek() == Some(")") {
                            self.advance();
                        }
                        inner
                    }
                }
                sym => symbols.contains_key(sym),
            },
        }
    }
}
