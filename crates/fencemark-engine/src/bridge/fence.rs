//! Code fence text ⇄ [`CodeBlockDocument`].

use std::collections::BTreeMap;

use crate::annotations::{
    Annotation, AnnotationRule, AnnotationRules, CommentStyle, Directive, Selector, TargetRule,
    normalize::{code_line_count, resolve},
    parse_annotations, parse_directive,
};
use crate::parsing::fence::FenceNode;
use crate::parsing::rope::{LineIndex, Span};

use super::document::CodeBlockDocument;

/// Parses a fence's body into code and annotations.
pub fn from_code_fence_to_code_block_document(
    fence: &FenceNode,
    rules: &AnnotationRules,
) -> CodeBlockDocument {
    let parsed = parse_annotations(&fence.body(), fence.info.lang(), rules);
    CodeBlockDocument {
        info: fence.info.clone(),
        fence: fence.style.clone(),
        code: parsed.code,
        annotations: parsed.annotations,
        unresolved: parsed.unresolved,
    }
}

/// A comment line to insert before code line `anchor`.
struct Emitted {
    anchor: usize,
    /// Ordinal of the source comment; new comments sort after existing ones.
    ordinal: usize,
    seq: usize,
    text: String,
}

struct Writer<'a> {
    document: &'a CodeBlockDocument,
    rules: &'a AnnotationRules,
    style: &'a CommentStyle,
    index: LineIndex,
    lines: usize,
}

impl Writer<'_> {
    fn indent(&self, line: usize) -> &str {
        if line >= self.lines {
            return "";
        }
        let text = self.index.line_text(&self.document.code, line);
        &text[..text.len() - text.trim_start().len()]
    }

    /// Whether the comment that produced `members` still resolves to exactly
    /// these annotations.
    fn is_faithful(&self, members: &[&Annotation]) -> bool {
        let Some(origin) = members.first().and_then(|a| a.origin.as_ref()) else {
            return false;
        };
        if members
            .iter()
            .any(|a| a.origin.as_ref().map(|o| &o.text) != Some(&origin.text))
        {
            return false;
        }
        let Some(directive) = parse_directive(&origin.text, self.style) else {
            return false;
        };
        let Some(rule) = self.rules.find(&directive.name) else {
            return false;
        };
        let Ok(spans) = resolve(
            &directive,
            rule,
            origin.anchor,
            &self.document.code,
            &self.index,
        ) else {
            return false;
        };
        spans.len() == members.len()
            && spans.iter().zip(members).all(|(span, a)| {
                a.span == *span
                    && a.name == rule.name
                    && a.kind == rule.kind
                    && a.query == directive.query
            })
    }

    /// The whole-line character form: first non-blank of `first` to the end
    /// of `last`.
    fn line_form(&self, first: usize, last: usize) -> Span {
        let start = self.index.line_start(first) + self.indent(first).len();
        Span::new(start, self.index.line_end(last))
    }

    fn char_count(&self, span: Span) -> usize {
        self.document.code[span.start..span.end].chars().count()
    }

    /// Canonical comments for an annotation that has no faithful origin.
    fn canonical(&self, annotation: &Annotation, rule: &AnnotationRule) -> Vec<(usize, String)> {
        let span = annotation.span;
        let directive = |selector| Directive {
            name: annotation.name.clone(),
            selector,
            query: annotation.query.clone(),
        };
        let at = |line: usize, selector| {
            (
                line,
                directive(selector).to_comment(self.style, self.indent(line)),
            )
        };

        if annotation.kind.is_line_level() {
            let (first, last) = self.index.lines_of(span);
            return match rule.target {
                TargetRule::NextLine if first == last => vec![at(first, Selector::Default)],
                TargetRule::NextLine => vec![at(
                    first,
                    Selector::Lines {
                        first: 1,
                        last: last - first + 1,
                    },
                )],
                TargetRule::Block if first == 0 && last + 1 >= self.lines => {
                    vec![at(0, Selector::Default)]
                }
                TargetRule::Block => vec![at(
                    0,
                    Selector::Lines {
                        first: first + 1,
                        last: last + 1,
                    },
                )],
            };
        }

        if span.is_empty() {
            log::warn!(
                "Skipping zero-width {} annotation at offset {}: it has no comment form",
                annotation.name,
                span.start
            );
            return vec![];
        }

        if rule.target == TargetRule::Block {
            let first = self.char_count(Span::new(0, span.start)) + 1;
            let last = first + self.char_count(span) - 1;
            return vec![at(0, Selector::Columns { first, last })];
        }

        let (first, last) = self.index.lines_of(span);
        if self.line_form(first, last) == span {
            let selector = if first == last {
                Selector::Default
            } else {
                Selector::Lines {
                    first: 1,
                    last: last - first + 1,
                }
            };
            return vec![at(first, selector)];
        }

        // One comment per touched line.
        let mut out = Vec::new();
        for line in first..=last {
            let Some(piece) = span.intersect(self.index.content_span(line)) else {
                continue;
            };
            if piece.is_empty() {
                continue;
            }
            if self.line_form(line, line) == piece {
                out.push(at(line, Selector::Default));
                continue;
            }
            let first_col = self.char_count(Span::new(self.index.line_start(line), piece.start)) + 1;
            let last_col = first_col + self.char_count(piece) - 1;
            out.push(at(
                line,
                Selector::Columns {
                    first: first_col,
                    last: last_col,
                },
            ));
        }
        out
    }
}

/// Serializes a document back into fence text.
///
/// Annotations whose source comment still resolves to the same ranges are
/// written back verbatim at their original position. Every other annotation
/// gets a canonical comment; unresolved comments are written back unchanged.
pub fn from_code_block_document_to_code_fence(
    document: &CodeBlockDocument,
    rules: &AnnotationRules,
) -> FenceNode {
    let index = LineIndex::new(&document.code);
    let writer = Writer {
        document,
        rules,
        style: rules.comment_style(document.lang()),
        lines: code_line_count(&document.code, &index),
        index,
    };

    let mut by_comment: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, annotation) in document.annotations.iter().enumerate() {
        if let Some(origin) = &annotation.origin {
            by_comment.entry(origin.comment).or_default().push(i);
        }
    }

    let mut emitted = Vec::new();
    let mut written = vec![false; document.annotations.len()];
    for (&ordinal, indices) in &by_comment {
        let members: Vec<&Annotation> = indices.iter().map(|&i| &document.annotations[i]).collect();
        if let Some(origin) = members[0].origin.as_ref()
            && writer.is_faithful(&members)
        {
            emitted.push(Emitted {
                anchor: origin.anchor,
                ordinal,
                seq: 0,
                text: origin.text.clone(),
            });
            for &i in indices {
                written[i] = true;
            }
        }
    }

    for unresolved in &document.unresolved {
        emitted.push(Emitted {
            anchor: unresolved.anchor,
            ordinal: unresolved.comment,
            seq: 0,
            text: unresolved.text.clone(),
        });
    }

    for (seq, annotation) in document.annotations.iter().enumerate() {
        if written[seq] {
            continue;
        }
        let Some(rule) = rules.find(&annotation.name) else {
            log::warn!("Skipping annotation {:?}: no rule has this name", annotation.name);
            continue;
        };
        let ordinal = annotation
            .origin
            .as_ref()
            .map_or(usize::MAX, |origin| origin.comment);
        for (anchor, text) in writer.canonical(annotation, rule) {
            emitted.push(Emitted {
                anchor,
                ordinal,
                seq,
                text,
            });
        }
    }

    emitted.sort_by_key(|e| (e.anchor, e.ordinal, e.seq));

    let code_lines: Vec<&str> = if document.code.is_empty() {
        vec![]
    } else {
        document.code.split('\n').collect()
    };
    let mut comments = emitted.into_iter().peekable();
    let mut lines = Vec::with_capacity(code_lines.len());
    for (i, line) in code_lines.into_iter().enumerate() {
        while let Some(comment) = comments.next_if(|c| c.anchor <= i) {
            lines.push(comment.text);
        }
        lines.push(line.to_string());
    }
    lines.extend(comments.map(|c| c.text));

    FenceNode {
        style: document.fence.clone(),
        info: document.info.clone(),
        lines,
    }
}
