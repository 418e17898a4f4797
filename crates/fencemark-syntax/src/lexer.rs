//! # Lexer - Tokenizing Fenced Code
//!
//! This module breaks the text of a code block into highlighted tokens using
//! the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! The most important property of this lexer is that **every byte in the input
//! appears in exactly one token**. We never skip or discard characters. The
//! annotation pipeline relies on this: token spans must tile the code exactly.
//!
//! ```
//! use fencemark_syntax::{Flavor, lexer::lex};
//!
//! let input = "let x = 1; // one\n";
//! let tokens = lex(input, Flavor::CLike);
//!
//! // Concatenating all token texts gives back the original
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Two Passes
//!
//! 1. **Logos pass**: context-free tokens (whitespace, strings, numbers,
//!    identifiers, single punctuation characters). Identifiers that are
//!    keywords of the [`Flavor`] are promoted to `KEYWORD`.
//! 2. **Comment pass**: comment markers depend on the language, so comments
//!    are found afterwards by merging every token from the marker to the end
//!    of the line (line comments) or to the closing delimiter (block comments).
//!    Markers inside string tokens are never considered.

use std::ops::Range;

use logos::Logos;

use crate::{flavor::Flavor, highlight_kind::HighlightKind};

/// Token kinds produced by the Logos lexer.
///
/// This enum exists separately from [`HighlightKind`] because Logos needs to
/// derive on it and because comments and keywords are decided after lexing.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Horizontal whitespace (spaces, tabs)
    #[regex(r"[ \t]+")]
    Whitespace,

    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    /// Double, single or backtick quoted string on one line
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    #[regex(r"`([^`\n])*`")]
    Str,

    /// Decimal or hexadecimal number
    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    Number,

    /// Identifier (keywords are split out later)
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,

    /// Any other single character
    #[regex(r"[^ \t\r\nA-Za-z0-9_$]")]
    Punct,
}

impl TokenKind {
    /// Convert to HighlightKind.
    pub fn to_highlight_kind(self) -> HighlightKind {
        match self {
            TokenKind::Whitespace => HighlightKind::WHITESPACE,
            TokenKind::Newline => HighlightKind::NEWLINE,
            TokenKind::Str => HighlightKind::STRING,
            TokenKind::Number => HighlightKind::NUMBER,
            TokenKind::Ident => HighlightKind::IDENT,
            TokenKind::Punct => HighlightKind::PUNCT,
        }
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: HighlightKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str, flavor: Flavor) -> Vec<Token<'_>> {
    lex_with_spans(input, flavor)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str, flavor: Flavor) -> Vec<(Token<'_>, Range<usize>)> {
    merge_comments(input, raw_tokens(input, flavor), flavor)
        .into_iter()
        .map(|(kind, span)| {
            let text = &input[span.clone()];
            (Token { kind, text }, span)
        })
        .collect()
}

fn raw_tokens(input: &str, flavor: Flavor) -> Vec<(HighlightKind, Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let kind = match result {
            Ok(TokenKind::Ident) if flavor.is_keyword(lexer.slice()) => HighlightKind::KEYWORD,
            Ok(token_kind) => token_kind.to_highlight_kind(),
            // Logos error means unrecognized character - treat as TEXT
            Err(()) => HighlightKind::TEXT,
        };
        tokens.push((kind, lexer.span()));
    }

    tokens
}

fn merge_comments(
    input: &str,
    raw: Vec<(HighlightKind, Range<usize>)>,
    flavor: Flavor,
) -> Vec<(HighlightKind, Range<usize>)> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        let (kind, span) = raw[i].clone();
        let end = match kind {
            HighlightKind::STRING => None,
            _ => comment_len(&input[span.start..], flavor).map(|len| span.start + len),
        };

        let Some(end) = end else {
            out.push((kind, span));
            i += 1;
            continue;
        };

        let mut j = i + 1;
        while j < raw.len() && raw[j].1.start < end {
            j += 1;
        }
        out.push((HighlightKind::COMMENT, span.start..raw[j - 1].1.end));
        i = j;
    }

    out
}

/// Length of the comment starting at the beginning of `rest`, if one starts there.
fn comment_len(rest: &str, flavor: Flavor) -> Option<usize> {
    if let Some(prefix) = flavor.line_comment()
        && rest.starts_with(prefix)
    {
        return Some(rest.find(['\r', '\n']).unwrap_or(rest.len()));
    }
    if let Some((open, close)) = flavor.block_comment()
        && rest.starts_with(open)
    {
        let body = &rest[open.len()..];
        return Some(
            body.find(close)
                .map_or(rest.len(), |at| open.len() + at + close.len()),
        );
    }
    None
}
