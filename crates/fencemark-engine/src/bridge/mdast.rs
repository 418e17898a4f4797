//! [`CodeBlockDocument`] ⇄ the editor's structured node form.
//!
//! The editor sees a code block as one paragraph per line. Character-level
//! annotations are nested mark nodes inside those paragraphs; an annotation
//! that spans lines is cut into one fragment per line, and all fragments
//! carry the annotation's `key`. Line-level annotations are `LineMarker`
//! nodes placed before the paragraph of their first line.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::annotations::{
    Annotation, AnnotationKind, AnnotationRules, MdastMark, Origin, RuleSource, Unresolved,
};
use crate::error::AnnotationError;
use crate::highlight::{BoundarySet, plain_tokens, split_tokens_by_boundaries};
use crate::parsing::fence::FenceStyle;
use crate::parsing::info::FenceInfo;
use crate::parsing::rope::{LineIndex, Span};
use crate::render::split_tree_by_lines;
use crate::tree::{TreeNode, build_annotation_tree};

use super::document::CodeBlockDocument;

/// The editor-native node an annotation is shown as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkNode {
    Strong,
    Emphasis,
    Delete,
    /// An MDX JSX text element with this name.
    Jsx(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorAttrs {
    /// Shared by every fragment of one annotation.
    pub key: usize,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    /// The fragment also covers the newline ending its line.
    #[serde(default)]
    pub includes_newline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EditorNode {
    Paragraph {
        children: Vec<EditorNode>,
    },
    Text {
        value: String,
    },
    Mark {
        node: MarkNode,
        attrs: EditorAttrs,
        children: Vec<EditorNode>,
    },
    LineMarker {
        attrs: EditorAttrs,
        /// Number of lines covered, starting at the next paragraph.
        lines: usize,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorCodeBlock {
    pub info: FenceInfo,
    pub fence: FenceStyle,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<Unresolved>,
    pub children: Vec<EditorNode>,
}

impl EditorCodeBlock {
    pub fn lang(&self) -> Option<&str> {
        self.info.lang()
    }

    pub fn meta(&self) -> &str {
        self.info.meta()
    }
}

fn mark_node(annotation: &Annotation, rules: &AnnotationRules) -> MarkNode {
    match rules.find(&annotation.name) {
        Some(rule) if rule.source == RuleSource::Mdast => match rule.node {
            Some(MdastMark::Strong) => MarkNode::Strong,
            Some(MdastMark::Emphasis) => MarkNode::Emphasis,
            Some(MdastMark::Delete) => MarkNode::Delete,
            None => MarkNode::Jsx(annotation.name.clone()),
        },
        _ => MarkNode::Jsx(annotation.name.clone()),
    }
}

fn attrs(key: usize, annotation: &Annotation, includes_newline: bool) -> EditorAttrs {
    EditorAttrs {
        key,
        name: annotation.name.clone(),
        query: annotation.query.clone(),
        origin: annotation.origin.clone(),
        includes_newline,
    }
}

struct ToEditor<'a> {
    document: &'a CodeBlockDocument,
    rules: &'a AnnotationRules,
}

impl ToEditor<'_> {
    /// `line_end` is the end of the line including its newline.
    fn convert(&self, nodes: Vec<TreeNode>, line_end: usize, has_newline: bool) -> Vec<EditorNode> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                TreeNode::Leaf(token) => {
                    let text = token.text.strip_suffix('\n').unwrap_or(&token.text);
                    if !text.is_empty() {
                        out.push(EditorNode::Text {
                            value: text.to_string(),
                        });
                    }
                }
                TreeNode::Mark(wrap) | TreeNode::Inline(wrap) => {
                    let annotation = &self.document.annotations[wrap.annotation];
                    let includes_newline = has_newline && wrap.span.end == line_end;
                    out.push(EditorNode::Mark {
                        node: mark_node(annotation, self.rules),
                        attrs: attrs(wrap.annotation, annotation, includes_newline),
                        children: self.convert(wrap.children, line_end, has_newline),
                    });
                }
            }
        }
        out
    }
}

/// Converts a document into the editor's node form.
///
/// Character-level annotations must nest; a partial overlap fails with
/// [`AnnotationError::MalformedNesting`].
pub fn from_code_block_document_to_mdast(
    document: &CodeBlockDocument,
    rules: &AnnotationRules,
) -> Result<EditorCodeBlock, AnnotationError> {
    let code = &document.code;
    let boundaries = BoundarySet::from_annotations(&document.annotations, code.len())?;
    let tokens = split_tokens_by_boundaries(&plain_tokens(code), &boundaries, code)?;
    let chars: Vec<usize> = document
        .annotations
        .iter()
        .enumerate()
        .filter(|(_, a)| a.kind.is_character_level())
        .map(|(i, _)| i)
        .collect();
    let forest = build_annotation_tree(tokens, &document.annotations, &chars, code.len())?;

    let index = LineIndex::new(code);
    let mut markers: BTreeMap<usize, Vec<EditorNode>> = BTreeMap::new();
    for (key, annotation) in document.annotations.iter().enumerate() {
        if annotation.kind.is_character_level() {
            continue;
        }
        let (first, last) = index.lines_of(annotation.span);
        markers.entry(first).or_default().push(EditorNode::LineMarker {
            attrs: attrs(key, annotation, false),
            lines: last - first + 1,
        });
    }

    let converter = ToEditor { document, rules };
    let mut children = Vec::new();
    for line in split_tree_by_lines(forest, code) {
        if let Some(line_markers) = markers.remove(&line.index) {
            children.extend(line_markers);
        }
        let has_newline = code[line.span.start..line.span.end].ends_with('\n');
        children.push(EditorNode::Paragraph {
            children: converter.convert(line.nodes, line.span.end, has_newline),
        });
    }

    Ok(EditorCodeBlock {
        info: document.info.clone(),
        fence: document.fence.clone(),
        unresolved: document.unresolved.clone(),
        children,
    })
}

struct Fragment {
    node: Option<MarkNode>,
    attrs: EditorAttrs,
    span: Span,
}

#[derive(Default)]
struct FromEditor {
    code: String,
    lines: usize,
    fragments: Vec<Fragment>,
    /// Line markers with the line they precede.
    markers: Vec<(usize, EditorAttrs, usize)>,
}

impl FromEditor {
    fn block(&mut self, node: &EditorNode) {
        match node {
            EditorNode::Paragraph { children } => {
                if self.lines > 0 {
                    self.code.push('\n');
                }
                self.lines += 1;
                for child in children {
                    self.inline(child);
                }
            }
            EditorNode::LineMarker { attrs, lines } => {
                self.markers.push((self.lines, attrs.clone(), *lines));
            }
            other => {
                if self.lines == 0 {
                    self.lines = 1;
                }
                self.inline(other);
            }
        }
    }

    fn inline(&mut self, node: &EditorNode) {
        match node {
            EditorNode::Text { value } => self.code.push_str(value),
            EditorNode::Mark {
                node,
                attrs,
                children,
            } => {
                let start = self.code.len();
                for child in children {
                    self.inline(child);
                }
                let end = self.code.len() + usize::from(attrs.includes_newline);
                self.fragments.push(Fragment {
                    node: Some(node.clone()),
                    attrs: attrs.clone(),
                    span: Span::new(start, end),
                });
            }
            EditorNode::Paragraph { children } => {
                for child in children {
                    self.inline(child);
                }
            }
            EditorNode::LineMarker { .. } => {
                log::debug!("Ignoring line marker nested inside a paragraph");
            }
        }
    }
}

fn kind_for(
    name: &str,
    node: Option<&MarkNode>,
    rules: &AnnotationRules,
    line_level: bool,
) -> AnnotationKind {
    match rules.find(name) {
        Some(rule) if rule.kind.is_line_level() == line_level => rule.kind,
        _ if line_level => AnnotationKind::Block,
        _ => match node {
            Some(MarkNode::Jsx(_)) => AnnotationKind::Inline,
            _ => AnnotationKind::Mark,
        },
    }
}

/// Converts the editor's node form back into a document.
///
/// Fragments sharing a key are merged into one annotation; annotations are
/// returned in key order.
pub fn from_mdast_to_code_block_document(
    block: &EditorCodeBlock,
    rules: &AnnotationRules,
) -> CodeBlockDocument {
    let mut walker = FromEditor::default();
    for child in &block.children {
        walker.block(child);
    }
    let FromEditor {
        code,
        lines,
        fragments,
        markers,
    } = walker;
    let len = code.len();

    let mut merged: BTreeMap<usize, Annotation> = BTreeMap::new();
    for fragment in fragments {
        let span = Span::new(fragment.span.start.min(len), fragment.span.end.min(len));
        match merged.get_mut(&fragment.attrs.key) {
            Some(existing) => {
                existing.span = Span::new(
                    existing.span.start.min(span.start),
                    existing.span.end.max(span.end),
                );
            }
            None => {
                let kind = kind_for(&fragment.attrs.name, fragment.node.as_ref(), rules, false);
                merged.insert(fragment.attrs.key, annotation_from(fragment.attrs, kind, span));
            }
        }
    }

    let index = LineIndex::new(&code);
    for (first, attrs, count) in markers {
        if first >= lines || count == 0 {
            log::debug!("Dropping line marker {:?}: no line follows it", attrs.name);
            continue;
        }
        let last = (first + count - 1).min(lines - 1);
        let kind = kind_for(&attrs.name, None, rules, true);
        let span = index.lines_span(first, last);
        merged.insert(attrs.key, annotation_from(attrs, kind, span));
    }

    CodeBlockDocument {
        info: block.info.clone(),
        fence: block.fence.clone(),
        code,
        annotations: merged.into_values().collect(),
        unresolved: block.unresolved.clone(),
    }
}

fn annotation_from(attrs: EditorAttrs, kind: AnnotationKind, span: Span) -> Annotation {
    Annotation {
        name: attrs.name,
        kind,
        span,
        query: attrs.query,
        origin: attrs.origin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::from_code_fence_to_code_block_document;
    use crate::parsing::fence::FenceNode;
    use pretty_assertions::assert_eq;

    fn text(value: &str) -> EditorNode {
        EditorNode::Text {
            value: value.to_string(),
        }
    }

    #[test]
    fn lines_become_paragraphs() {
        let document = CodeBlockDocument::new(Some("js"), "", "a\nb");
        let block = from_code_block_document_to_mdast(&document, &AnnotationRules::default()).unwrap();
        assert_eq!(
            block.children,
            vec![
                EditorNode::Paragraph {
                    children: vec![text("a")]
                },
                EditorNode::Paragraph {
                    children: vec![text("b")]
                },
            ]
        );
    }

    #[test]
    fn native_marks_and_jsx_elements() {
        let document = CodeBlockDocument::new(None, "", "hello")
            .with_annotation(Annotation::new("strong", AnnotationKind::Mark, Span::new(0, 5)))
            .with_annotation(
                Annotation::new("tooltip", AnnotationKind::Inline, Span::new(1, 3)).with_query("t"),
            );
        let block = from_code_block_document_to_mdast(&document, &AnnotationRules::default()).unwrap();
        let EditorNode::Paragraph { children } = &block.children[0] else {
            panic!("expected a paragraph");
        };
        let EditorNode::Mark {
            node,
            children: inner,
            ..
        } = &children[0]
        else {
            panic!("expected a mark");
        };
        assert_eq!(*node, MarkNode::Strong);
        assert_eq!(inner.len(), 3);
        let EditorNode::Mark { node, attrs, .. } = &inner[1] else {
            panic!("expected a nested mark");
        };
        assert_eq!(*node, MarkNode::Jsx("tooltip".into()));
        assert_eq!(attrs.key, 1);
        assert_eq!(attrs.query.as_deref(), Some("t"));
    }

    #[test]
    fn multi_line_mark_is_cut_into_fragments() {
        let document = CodeBlockDocument::new(None, "", "ab\ncd")
            .with_annotation(Annotation::new("mark", AnnotationKind::Mark, Span::new(1, 4)));
        let block = from_code_block_document_to_mdast(&document, &AnnotationRules::default()).unwrap();
        let fragments: Vec<(usize, bool)> = block
            .children
            .iter()
            .filter_map(|p| match p {
                EditorNode::Paragraph { children } => children.iter().find_map(|c| match c {
                    EditorNode::Mark { attrs, .. } => Some((attrs.key, attrs.includes_newline)),
                    _ => None,
                }),
                _ => None,
            })
            .collect();
        assert_eq!(fragments, vec![(0, true), (0, false)]);
    }

    #[test]
    fn line_markers_precede_their_first_line() {
        let document = CodeBlockDocument::new(None, "", "a\nb\nc")
            .with_annotation(Annotation::new("collapse", AnnotationKind::Wrapper, Span::new(2, 5)));
        let block = from_code_block_document_to_mdast(&document, &AnnotationRules::default()).unwrap();
        assert!(matches!(block.children[0], EditorNode::Paragraph { .. }));
        assert!(matches!(
            &block.children[1],
            EditorNode::LineMarker { lines: 2, attrs } if attrs.name == "collapse"
        ));
    }

    #[test]
    fn partial_overlap_is_rejected() {
        let document = CodeBlockDocument::new(None, "", "abcdef")
            .with_annotation(Annotation::new("mark", AnnotationKind::Mark, Span::new(0, 4)))
            .with_annotation(Annotation::new("strong", AnnotationKind::Mark, Span::new(2, 6)));
        assert!(matches!(
            from_code_block_document_to_mdast(&document, &AnnotationRules::default()),
            Err(AnnotationError::MalformedNesting { .. })
        ));
    }

    #[test]
    fn document_survives_editor_round_trip() {
        let rules = AnnotationRules::default();
        let fence = FenceNode::parse(
            "```ts title=a.ts\n// !collapse(1:2)\n// !bold(1:2)\nlet a = 1\n  // !tooltip[/b/] bee\nlet b\n// !highlight\n// !mark[/c/]\nc\n```",
        )
        .unwrap();
        let document = from_code_fence_to_code_block_document(&fence, &rules)
            .with_annotation(Annotation::new("mark", AnnotationKind::Mark, Span::new(0, 0)));
        let block = from_code_block_document_to_mdast(&document, &rules).unwrap();
        let back = from_mdast_to_code_block_document(&block, &rules);
        assert_eq!(back, document);
    }

    #[test]
    fn empty_code_is_one_empty_paragraph() {
        let rules = AnnotationRules::default();
        let document = CodeBlockDocument::new(Some("sh"), "", "");
        let block = from_code_block_document_to_mdast(&document, &rules).unwrap();
        assert_eq!(block.children, vec![EditorNode::Paragraph { children: vec![] }]);
        assert_eq!(from_mdast_to_code_block_document(&block, &rules), document);
    }
}
