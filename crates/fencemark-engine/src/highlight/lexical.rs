use fencemark_syntax::{Flavor, lex_with_spans};

use crate::parsing::rope::Span;

use super::token::{Token, plain_tokens};

/// Produces tokens that tile the code exactly.
///
/// Any highlighter can drive the pipeline as long as its tokens cover every
/// byte of the code in order.
pub trait Highlighter {
    fn highlight(&self, code: &str, lang: Option<&str>) -> Vec<Token>;
}

/// The built-in Logos lexer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalHighlighter;

impl Highlighter for LexicalHighlighter {
    fn highlight(&self, code: &str, lang: Option<&str>) -> Vec<Token> {
        let flavor = Flavor::for_language(lang.unwrap_or_default());
        lex_with_spans(code, flavor)
            .into_iter()
            .map(|(token, range)| Token::new(Span::from(range), token.text, token.kind.scope()))
            .collect()
    }
}

/// No highlighting at all: one unstyled token.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, code: &str, _lang: Option<&str>) -> Vec<Token> {
        plain_tokens(code)
    }
}
