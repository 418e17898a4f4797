use serde::{Deserialize, Serialize};

use crate::parsing::rope::Span;

/// A contiguous highlighted run of code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub span: Span,
    pub text: String,
    /// Highlighter scope, e.g. "keyword"; `None` for unstyled text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Token {
    pub fn new(span: Span, text: impl Into<String>, scope: Option<&str>) -> Self {
        Self {
            span,
            text: text.into(),
            scope: scope.map(str::to_string),
        }
    }

    /// The part of this token inside `span`. `span` must lie within the
    /// token and on character boundaries.
    pub fn slice(&self, span: Span) -> Token {
        let from = span.start - self.span.start;
        let to = span.end - self.span.start;
        Token {
            span,
            text: self.text[from..to].to_string(),
            scope: self.scope.clone(),
        }
    }
}

/// A single unstyled token covering the whole code; empty code has none.
pub fn plain_tokens(code: &str) -> Vec<Token> {
    if code.is_empty() {
        return vec![];
    }
    vec![Token::new(Span::new(0, code.len()), code, None)]
}
