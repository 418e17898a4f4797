use serde::{Deserialize, Serialize};

use crate::parsing::rope::Span;

/// How an annotation decorates the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationKind {
    /// Character range that may nest inside other marks.
    Mark,
    /// Character range anchored inside one line, e.g. a tooltip trigger.
    Inline,
    /// Whole-line decoration keyed by line index.
    Block,
    /// Whole-line group spanning a contiguous run of lines.
    Wrapper,
}

impl AnnotationKind {
    pub fn is_character_level(self) -> bool {
        matches!(self, AnnotationKind::Mark | AnnotationKind::Inline)
    }

    pub fn is_line_level(self) -> bool {
        !self.is_character_level()
    }
}

/// Where an annotation came from when it was parsed out of a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    /// Ordinal of the comment among all annotation comments of the block.
    pub comment: usize,
    /// Index of the code line the comment preceded.
    pub anchor: usize,
    /// The comment line exactly as written.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    pub kind: AnnotationKind,
    pub span: Span,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
}

impl Annotation {
    pub fn new(name: impl Into<String>, kind: AnnotationKind, span: Span) -> Self {
        Self {
            name: name.into(),
            kind,
            span,
            query: None,
            origin: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Same decoration, ignoring where it was parsed from.
    pub fn same_decoration(&self, other: &Annotation) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.span == other.span
            && self.query == other.query
    }
}

/// An annotation comment whose target could not be resolved.
///
/// Kept verbatim so that serializing the block never loses authored text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unresolved {
    pub comment: usize,
    pub anchor: usize,
    pub text: String,
}

/// Indices of the character-level annotations that become tree marks.
pub fn mark_indices(annotations: &[Annotation]) -> Vec<usize> {
    annotations
        .iter()
        .enumerate()
        .filter(|(_, a)| a.kind == AnnotationKind::Mark)
        .map(|(i, _)| i)
        .collect()
}
