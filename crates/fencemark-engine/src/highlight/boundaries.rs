//! Refines a highlighter's token stream at annotation boundaries.

use std::collections::BTreeSet;

use crate::annotations::Annotation;
use crate::error::AnnotationError;
use crate::parsing::rope::Span;

use super::token::Token;

/// Offsets at which tokens must be cut, all within `[0, len]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundarySet {
    len: usize,
    offsets: BTreeSet<usize>,
}

impl BoundarySet {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            offsets: BTreeSet::new(),
        }
    }

    /// Adds a boundary. Offsets past the end of the code are rejected.
    pub fn insert(&mut self, offset: usize) -> Result<(), AnnotationError> {
        if offset > self.len {
            return Err(AnnotationError::OffsetOutOfBounds {
                offset,
                len: self.len,
            });
        }
        self.offsets.insert(offset);
        Ok(())
    }

    /// Start and end of every character-level annotation.
    pub fn from_annotations(
        annotations: &[Annotation],
        len: usize,
    ) -> Result<Self, AnnotationError> {
        let mut set = Self::new(len);
        for annotation in annotations.iter().filter(|a| a.kind.is_character_level()) {
            set.insert(annotation.span.start)?;
            set.insert(annotation.span.end)?;
        }
        Ok(set)
    }

    /// Length of the code the boundaries refer to.
    pub fn code_len(&self) -> usize {
        self.len
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.offsets.contains(&offset)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.offsets.iter().copied()
    }

    /// Boundaries strictly inside `span`.
    pub fn inside(&self, span: Span) -> impl Iterator<Item = usize> + '_ {
        self.offsets
            .range(span.start.saturating_add(1)..span.end.max(span.start + 1))
            .copied()
    }
}

/// Checks that `tokens` tile `[0, len)` in order.
pub fn check_tiling(tokens: &[Token], len: usize) -> Result<(), AnnotationError> {
    let mut expected = 0;
    for token in tokens {
        if token.span.start != expected || token.span.end < token.span.start {
            return Err(AnnotationError::BrokenTiling {
                expected,
                found: token.span.start,
            });
        }
        if token.span.end > len {
            return Err(AnnotationError::OffsetOutOfBounds {
                offset: token.span.end,
                len,
            });
        }
        expected = token.span.end;
    }
    if expected != len {
        return Err(AnnotationError::BrokenTiling {
            expected: len,
            found: expected,
        });
    }
    Ok(())
}

/// Cuts every token at each boundary strictly inside it.
///
/// Pieces inherit the token's scope. The output tiles the code exactly like
/// the input, refined only at the requested boundaries. Empty tokens are
/// dropped.
pub fn split_tokens_by_boundaries(
    tokens: &[Token],
    boundaries: &BoundarySet,
    code: &str,
) -> Result<Vec<Token>, AnnotationError> {
    if boundaries.code_len() != code.len() {
        return Err(AnnotationError::OffsetOutOfBounds {
            offset: boundaries.code_len(),
            len: code.len(),
        });
    }
    check_tiling(tokens, code.len())?;

    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens.iter().filter(|t| !t.span.is_empty()) {
        let mut start = token.span.start;
        for cut in boundaries.inside(token.span) {
            if !code.is_char_boundary(cut) {
                return Err(AnnotationError::MisalignedOffset { offset: cut });
            }
            out.push(token.slice(Span::new(start, cut)));
            start = cut;
        }
        out.push(token.slice(Span::new(start, token.span.end)));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::AnnotationKind;
    use pretty_assertions::assert_eq;

    fn tokens(code: &str, widths: &[usize]) -> Vec<Token> {
        let mut start = 0;
        widths
            .iter()
            .map(|w| {
                let span = Span::new(start, start + w);
                start += w;
                Token::new(span, &code[span.start..span.end], Some("s"))
            })
            .collect()
    }

    fn edges(tokens: &[Token]) -> Vec<(usize, usize)> {
        tokens.iter().map(|t| (t.span.start, t.span.end)).collect()
    }

    #[test]
    fn insert_rejects_out_of_range() {
        let mut set = BoundarySet::new(5);
        assert!(set.insert(5).is_ok());
        assert_eq!(
            set.insert(6),
            Err(AnnotationError::OffsetOutOfBounds { offset: 6, len: 5 })
        );
    }

    #[test]
    fn splits_inside_tokens_only() {
        let code = "const a = 1";
        let input = tokens(code, &[5, 1, 1, 1, 1, 1, 1]);
        let mut set = BoundarySet::new(code.len());
        for b in [0, 2, 5, 6, 11] {
            set.insert(b).unwrap();
        }
        let out = split_tokens_by_boundaries(&input, &set, code).unwrap();
        assert_eq!(
            edges(&out),
            vec![(0, 2), (2, 5), (5, 6), (6, 7), (7, 8), (8, 9), (9, 10), (10, 11)]
        );
        assert_eq!(out[0].text, "co");
        assert_eq!(out[1].scope.as_deref(), Some("s"));
    }

    #[test]
    fn refinement_adds_no_other_edges() {
        let code = "abcdefghij";
        let input = tokens(code, &[4, 3, 3]);
        let mut set = BoundarySet::new(code.len());
        for b in [1, 3, 8] {
            set.insert(b).unwrap();
        }
        let out = split_tokens_by_boundaries(&input, &set, code).unwrap();
        let original: Vec<usize> = input.iter().flat_map(|t| [t.span.start, t.span.end]).collect();
        for t in &out {
            for edge in [t.span.start, t.span.end] {
                assert!(set.contains(edge) || original.contains(&edge), "stray edge {edge}");
            }
        }
        let text: String = out.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(text, code);
    }

    #[test]
    fn broken_tiling_is_reported() {
        let code = "abcdef";
        let mut input = tokens(code, &[2, 2, 2]);
        input.remove(1);
        let set = BoundarySet::new(code.len());
        assert_eq!(
            split_tokens_by_boundaries(&input, &set, code),
            Err(AnnotationError::BrokenTiling {
                expected: 2,
                found: 4
            })
        );
    }

    #[test]
    fn short_tiling_is_reported() {
        let code = "abcdef";
        let input = tokens(code, &[2, 2]);
        let set = BoundarySet::new(code.len());
        assert_eq!(
            split_tokens_by_boundaries(&input, &set, code),
            Err(AnnotationError::BrokenTiling {
                expected: 6,
                found: 4
            })
        );
    }

    #[test]
    fn misaligned_boundary_is_reported() {
        let code = "héllo";
        let input = tokens(code, &[code.len()]);
        let mut set = BoundarySet::new(code.len());
        set.insert(2).unwrap();
        assert_eq!(
            split_tokens_by_boundaries(&input, &set, code),
            Err(AnnotationError::MisalignedOffset { offset: 2 })
        );
    }

    #[test]
    fn boundaries_from_character_annotations_only() {
        let annotations = vec![
            Annotation::new("strong", AnnotationKind::Mark, Span::new(1, 3)),
            Annotation::new("highlight", AnnotationKind::Block, Span::new(0, 4)),
            Annotation::new("tooltip", AnnotationKind::Inline, Span::new(2, 2)),
        ];
        let set = BoundarySet::from_annotations(&annotations, 4).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn empty_code_has_no_tokens() {
        let set = BoundarySet::new(0);
        assert_eq!(split_tokens_by_boundaries(&[], &set, ""), Ok(vec![]));
    }
}
