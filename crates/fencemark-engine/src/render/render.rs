//! Attaches inline, block and wrapper annotations to split lines.

use serde::Serialize;

use crate::annotations::{Annotation, AnnotationKind};
use crate::parsing::rope::{LineIndex, Span};
use crate::tree::{TreeNode, truncate_forest, wrap_inline};

use super::config::RenderConfig;
use super::lines::Line;
use super::wrappers::{WrapperGroup, group_wrappers};

/// One line ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedLine {
    pub index: usize,
    /// Displayed line number.
    pub number: usize,
    /// Content span, without the newline.
    pub span: Span,
    /// Marks and inline wraps over the line's tokens, newline excluded.
    pub nodes: Vec<TreeNode>,
    /// Block annotations touching this line.
    pub decorations: Vec<usize>,
    /// Wrapper groups this line belongs to.
    pub groups: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCode {
    pub lang: Option<String>,
    pub lines: Vec<RenderedLine>,
    pub groups: Vec<WrapperGroup>,
    /// The annotations the indices above refer to.
    pub annotations: Vec<Annotation>,
}

/// Character-level inline targets clipped to one line's content, innermost
/// first so that outer wraps enclose inner ones.
fn inline_targets(annotations: &[Annotation], content: Span) -> Vec<(usize, Span)> {
    let mut targets: Vec<(usize, Span)> = annotations
        .iter()
        .enumerate()
        .filter(|(_, a)| a.kind == AnnotationKind::Inline)
        .filter_map(|(i, a)| {
            if a.span.is_empty() {
                let at = a.span.start;
                (content.start <= at && at <= content.end).then_some((i, a.span))
            } else {
                a.span
                    .intersect(content)
                    .filter(|span| !span.is_empty())
                    .map(|span| (i, span))
            }
        })
        .collect();
    targets.sort_by_key(|&(i, span)| (span.len(), std::cmp::Reverse(i)));
    targets
}

pub fn render_annotated_lines(
    lines: Vec<Line>,
    code: &str,
    annotations: &[Annotation],
    config: &RenderConfig,
) -> RenderedCode {
    let index = LineIndex::new(code);

    let mut decorations = vec![Vec::new(); lines.len()];
    for (i, annotation) in annotations.iter().enumerate() {
        if annotation.kind != AnnotationKind::Block {
            continue;
        }
        let (first, last) = index.lines_of(annotation.span);
        for line in decorations.iter_mut().take(last + 1).skip(first) {
            line.push(i);
        }
    }

    let groups = group_wrappers(annotations, &index);

    let lines = lines
        .into_iter()
        .zip(decorations)
        .map(|(line, decorations)| {
            let content_end = if code[line.span.start..line.span.end].ends_with('\n') {
                line.span.end - 1
            } else {
                line.span.end
            };
            let content = Span::new(line.span.start, content_end);

            let mut nodes = truncate_forest(line.nodes, content_end);
            for (annotation, span) in inline_targets(annotations, content) {
                nodes = wrap_inline(nodes, span, annotation);
            }

            RenderedLine {
                index: line.index,
                number: config.first_line_number + line.index,
                span: content,
                nodes,
                decorations,
                groups: groups
                    .iter()
                    .enumerate()
                    .filter(|(_, g)| g.contains_line(line.index))
                    .map(|(g, _)| g)
                    .collect(),
            }
        })
        .collect();

    RenderedCode {
        lang: None,
        lines,
        groups,
        annotations: annotations.to_vec(),
    }
}
