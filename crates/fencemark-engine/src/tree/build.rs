//! Folds mark annotations and split tokens into a nested tree.

use std::cmp::Reverse;

use crate::annotations::Annotation;
use crate::error::{AnnotationError, NamedSpan};
use crate::highlight::{Token, check_tiling};
use crate::parsing::rope::Span;

use super::node::{TreeNode, Wrap};

fn named(annotations: &[Annotation], index: usize) -> NamedSpan {
    NamedSpan {
        name: annotations[index].name.clone(),
        span: annotations[index].span,
    }
}

/// Orders marks outer-first and rejects partial overlaps.
///
/// Marks are sorted by start ascending, then end descending; the sort is
/// stable so the earlier of two identical ranges becomes the outer node.
pub fn nesting_order(
    annotations: &[Annotation],
    marks: &[usize],
    len: usize,
) -> Result<Vec<usize>, AnnotationError> {
    for &m in marks {
        let span = annotations[m].span;
        if span.end > len || span.start > span.end {
            return Err(AnnotationError::OffsetOutOfBounds {
                offset: span.end.max(span.start),
                len,
            });
        }
    }

    let mut sorted = marks.to_vec();
    sorted.sort_by_key(|&m| (annotations[m].span.start, Reverse(annotations[m].span.end)));

    let mut stack: Vec<usize> = Vec::new();
    for &m in &sorted {
        let span = annotations[m].span;
        while let Some(&top) = stack.last()
            && annotations[top].span.end <= span.start
        {
            stack.pop();
        }
        if let Some(&top) = stack.last()
            && span.end > annotations[top].span.end
        {
            return Err(AnnotationError::MalformedNesting {
                first: named(annotations, top),
                second: named(annotations, m),
            });
        }
        stack.push(m);
    }
    Ok(sorted)
}

/// Builds the annotation tree for one code block.
///
/// `tokens` must tile `[0, len)` and already be split at every mark
/// boundary. Each token lands in the innermost mark containing it; tokens
/// outside all marks are roots. Zero-width marks become empty wraps.
pub fn build_annotation_tree(
    tokens: Vec<Token>,
    annotations: &[Annotation],
    marks: &[usize],
    len: usize,
) -> Result<Vec<TreeNode>, AnnotationError> {
    check_tiling(&tokens, len)?;
    let order = nesting_order(annotations, marks, len)?;
    let mut builder = Builder {
        annotations,
        tokens: tokens.into_iter().peekable(),
    };
    builder.level(&order, Span::new(0, len))
}

struct Builder<'a, I: Iterator<Item = Token>> {
    annotations: &'a [Annotation],
    tokens: std::iter::Peekable<I>,
}

impl<I: Iterator<Item = Token>> Builder<'_, I> {
    /// Builds the children of a node covering `parent`, given the marks
    /// nested inside it in nesting order.
    fn level(&mut self, marks: &[usize], parent: Span) -> Result<Vec<TreeNode>, AnnotationError> {
        let mut out = Vec::new();
        let mut i = 0;
        while i < marks.len() {
            let span = self.annotations[marks[i]].span;
            self.leaves_until(span.start, &mut out)?;

            let mut j = i + 1;
            while j < marks.len() && self.annotations[marks[j]].span.start < span.end {
                j += 1;
            }
            let children = self.level(&marks[i + 1..j], span)?;
            out.push(TreeNode::Mark(Wrap {
                annotation: marks[i],
                span,
                children,
            }));
            i = j;
        }
        self.leaves_until(parent.end, &mut out)?;
        Ok(out)
    }

    /// Moves tokens starting before `limit` into `out`.
    fn leaves_until(&mut self, limit: usize, out: &mut Vec<TreeNode>) -> Result<(), AnnotationError> {
        while let Some(token) = self.tokens.next_if(|t| t.span.start < limit) {
            if token.span.end > limit {
                return Err(AnnotationError::BrokenTiling {
                    expected: limit,
                    found: token.span.end,
                });
            }
            out.push(TreeNode::Leaf(token));
        }
        Ok(())
    }
}
