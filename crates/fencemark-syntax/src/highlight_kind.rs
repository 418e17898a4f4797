//! HighlightKind enum for every token the lexer can emit.
//!
//! Every byte of the input lands in exactly one token, so the kinds below
//! cover both meaningful runs (keywords, strings) and filler (whitespace).

/// Kind of a highlighted token.
///
/// We use SCREAMING_CASE following the rust-analyzer convention.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum HighlightKind {
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// Line ending (LF or CRLF)
    NEWLINE,
    /// Line or block comment, including its delimiters
    COMMENT,
    /// Quoted string literal, including its quotes
    STRING,
    /// Numeric literal
    NUMBER,
    /// Identifier that is not a keyword of the flavor
    IDENT,
    /// Reserved word of the flavor
    KEYWORD,
    /// Any other single character
    PUNCT,
    /// Bytes the lexer could not classify
    TEXT,
}

impl HighlightKind {
    /// Scope name attached to tokens of this kind, if any.
    ///
    /// Scopes are what style-class mappings key on; filler kinds have none.
    pub fn scope(self) -> Option<&'static str> {
        match self {
            HighlightKind::COMMENT => Some("comment"),
            HighlightKind::STRING => Some("string"),
            HighlightKind::NUMBER => Some("number"),
            HighlightKind::KEYWORD => Some("keyword"),
            HighlightKind::PUNCT => Some("punctuation"),
            HighlightKind::WHITESPACE
            | HighlightKind::NEWLINE
            | HighlightKind::IDENT
            | HighlightKind::TEXT => None,
        }
    }
}
