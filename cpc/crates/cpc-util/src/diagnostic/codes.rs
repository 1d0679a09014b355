//! Diagnostic codes for categorizing compiler errors and warnings.
//!
//! This module provides the [`DiagnosticCode`] type for uniquely identifying
//! diagnostic messages, enabling users to look up documentation and suppress
//! specific warnings.
//!
//! # Examples
//!
//! ```
//! use cpc_util::diagnostic::DiagnosticCode;
//!
//! let code = DiagnosticCode::E_PRE_INCLUDE_NOT_FOUND;
//! assert_eq!(code.prefix(), "E");
//! assert_eq!(code.number(), 1001);
//! assert_eq!(code.as_str(), "E1001");
//! ```

/// A unique code identifying a diagnostic message
///
/// Diagnostic codes follow the format `{prefix}{number}` where:
/// - `prefix` is typically "E" for errors or "W" for warnings
/// - `number` is a 4-digit number (padded with zeros)
///
/// This allows users to reference specific diagnostics in documentation
/// and suppression attributes.
///
/// # Examples
///
/// ```
/// use cpc_util::diagnostic::DiagnosticCode;
///
/// let code = DiagnosticCode::new("E", 1);
/// assert_eq!(code.as_str(), "E0001");
///
/// let warning = DiagnosticCode::W_PRE_UNTERMINATED_IF;
/// assert_eq!(warning.prefix(), "W");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    /// The prefix (e.g., "E" for error, "W" for warning)
    pub prefix: &'static str,
    /// The numeric identifier
    pub number: u32,
}

impl DiagnosticCode {
    /// Create a new diagnostic code
    ///
    /// # Arguments
    ///
    /// * `prefix` - The code prefix (typically "E" or "W")
    /// * `number` - The numeric identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use cpc_util::diagnostic::DiagnosticCode;
    ///
    /// let code = DiagnosticCode::new("E", 1001);
    /// assert_eq!(code.prefix(), "E");
    /// assert_eq!(code.number(), 1001);
    /// ```
    #[inline]
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        Self { prefix, number }
    }

    /// Get the prefix (e.g., "E" for error, "W" for warning)
    ///
    /// # Examples
    ///
    /// ```
    /// use cpc_util::diagnostic::DiagnosticCode;
    ///
    /// assert_eq!(DiagnosticCode::E_PRE_INCLUDE_NOT_FOUND.prefix(), "E");
    /// assert_eq!(DiagnosticCode::W_PRE_UNTERMINATED_IF.prefix(), "W");
    /// ```
    #[inline]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Get the numeric identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use cpc_util::diagnostic::DiagnosticCode;
    ///
    /// assert_eq!(DiagnosticCode::E_PRE_INCLUDE_NOT_FOUND.number(), 1001);
    /// assert_eq!(DiagnosticCode::W_PRE_UNTERMINATED_IF.number(), 1001);
    /// ```
    #[inline]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Get the full code string (e.g., "E0001", "W0001")
    ///
    /// # Examples
    ///
    /// ```
    /// use cpc_util::diagnostic::DiagnosticCode;
    ///
    /// assert_eq!(DiagnosticCode::E_PRE_INCLUDE_NOT_FOUND.as_str(), "E1001");
    /// assert_eq!(DiagnosticCode::W_PRE_UNTERMINATED_IF.as_str(), "W1001");
    /// ```
    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }

    // =========================================================================
    // PREPROCESSOR CODES (E1xxx) - see #4.1
    // =========================================================================

    /// E1001: Referenced `#INCLUDE` file could not be read
    pub const E_PRE_INCLUDE_NOT_FOUND: Self = Self::new("E", 1001);
    /// E1002: `#INCLUDE` cycle detected
    pub const E_PRE_CIRCULAR_INCLUDE: Self = Self::new("E", 1002);
    /// E1003: Malformed preprocessor directive
    pub const E_PRE_MALFORMED_DIRECTIVE: Self = Self::new("E", 1003);

    // =========================================================================
    // LEXER CODES (E2xxx) - see #4.2
    // =========================================================================

    /// E2001: Lexer - unexpected character
    pub const E_LEXER_UNEXPECTED_CHAR: Self = Self::new("E", 2001);
    /// E2002: Lexer - unterminated string or byte literal
    pub const E_LEXER_UNTERMINATED_STRING: Self = Self::new("E", 2002);
    /// E2003: Lexer - invalid numeric literal
    pub const E_LEXER_INVALID_NUMBER: Self = Self::new("E", 2003);
    /// E2004: Lexer - dedent to an unmatched column
    pub const E_LEXER_BAD_DEDENT: Self = Self::new("E", 2004);

    // =========================================================================
    // PARSER CODES (E3xxx) - see #4.3
    // =========================================================================

    /// E3001: Parser - unexpected token
    pub const E_PARSER_UNEXPECTED_TOKEN: Self = Self::new("E", 3001);
    /// E3002: Parser - expected a specific token, found another
    pub const E_PARSER_EXPECTED_TOKEN: Self = Self::new("E", 3002);
    /// E3003: Parser - unexpected end of file
    pub const E_PARSER_UNEXPECTED_EOF: Self = Self::new("E", 3003);
    /// E3004: Parser - duplicate declaration in the same scope
    pub const E_PARSER_DUPLICATE_DEF: Self = Self::new("E", 3004);

    // =========================================================================
    // PREDEFINED WARNING CODES (W0001-W9999)
    // =========================================================================

    /// W1001: Preprocessor - unterminated `#IF` (recorded, compilation continues)
    pub const W_PRE_UNTERMINATED_IF: Self = Self::new("W", 1001);
    /// W1002: Preprocessor - stray `#ELSE`/`#ENDIF` (recorded, compilation continues)
    pub const W_PRE_STRAY_DIRECTIVE: Self = Self::new("W", 1002);
}

impl std::fmt::Debug for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DiagnosticCode({})", self.as_str())
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Standalone constant exports for convenience
pub const E_PRE_INCLUDE_NOT_FOUND: DiagnosticCode = DiagnosticCode::E_PRE_INCLUDE_NOT_FOUND;
pub const E_PRE_CIRCULAR_INCLUDE: DiagnosticCode = DiagnosticCode::E_PRE_CIRCULAR_INCLUDE;
pub const E_PRE_MALFORMED_DIRECTIVE: DiagnosticCode = DiagnosticCode::E_PRE_MALFORMED_DIRECTIVE;
pub const E_LEXER_UNEXPECTED_CHAR: DiagnosticCode = DiagnosticCode::E_LEXER_UNEXPECTED_CHAR;
pub const E_LEXER_UNTERMINATED_STRING: DiagnosticCode = DiagnosticCode::E_LEXER_UNTERMINATED_STRING;
pub const E_LEXER_INVALID_NUMBER: DiagnosticCode = DiagnosticCode::E_LEXER_INVALID_NUMBER;
pub const E_LEXER_BAD_DEDENT: DiagnosticCode = DiagnosticCode::E_LEXER_BAD_DEDENT;
pub const E_PARSER_UNEXPECTED_TOKEN: DiagnosticCode = DiagnosticCode::E_PARSER_UNEXPECTED_TOKEN;
pub const E_PARSER_EXPECTED_TOKEN: DiagnosticCode = DiagnosticCode::E_PARSER_EXPECTED_TOKEN;
pub const E_PARSER_UNEXPECTED_EOF: DiagnosticCode = DiagnosticCode::E_PARSER_UNEXPECTED_EOF;
pub const E_PARSER_DUPLICATE_DEF: DiagnosticCode = DiagnosticCode::E_PARSER_DUPLICATE_DEF;
pub const W_PRE_UNTERMINATED_IF: DiagnosticCode = DiagnosticCode::W_PRE_UNTERMINATED_IF;
pub const W_PRE_STRAY_DIRECTIVE: DiagnosticCode = DiagnosticCode::W_PRE_STRAY_DIRECTIVE;
