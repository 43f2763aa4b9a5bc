//! Token kinds produced by the Verilog lexer
//!
//! Only the handful of tokens the declaration and usage scanners care about get
//! their own kind. Everything else (operators, literals, strings) lexes as
//! `ERROR`, which the scanners treat as opaque punctuation.

/// All token kinds recognised by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // WORDS
    // =========================================================================
    IDENT,         // mux_unit, u1, data$q
    ESCAPED_IDENT, // \bus[0]
    SYSTEM_IDENT,  // $display
    INTEGER,       // 42, 1_000

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    HASH,      // #
    L_PAREN,   // (
    R_PAREN,   // )
    SEMICOLON, // ;

    /// Any character the scanners do not distinguish
    ERROR,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT
        )
    }

    /// Check if this is a comment
    pub fn is_comment(self) -> bool {
        matches!(self, Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    /// Check if this token is a word in the `\w+` sense (identifier or number)
    pub fn is_word(self) -> bool {
        matches!(self, Self::IDENT | Self::INTEGER)
    }

    /// Check if this token may precede a usage: whitespace or a statement terminator
    pub fn is_usage_boundary(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::SEMICOLON)
    }
}
