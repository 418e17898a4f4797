//! The render path: one code block, or every code block of a page.

use serde::{Serialize, Serializer};

use crate::annotations::{Annotation, AnnotationRules, mark_indices};
use crate::bridge::{CodeBlockDocument, from_code_fence_to_code_block_document};
use crate::error::AnnotationError;
use crate::highlight::{BoundarySet, Highlighter, plain_tokens, split_tokens_by_boundaries};
use crate::parsing::mdx::{ContentNode, parse_mdx};
use crate::parsing::rope::span_text;
use crate::registry::BLOCK_ID_ATTR;
use crate::render::{RenderConfig, RenderedCode, render_annotated_lines, split_tree_by_lines, to_html};
use crate::tree::{TreeNode, build_annotation_tree};

/// Rejects annotations that fall outside `code` or cut a character.
pub fn validate_annotations(code: &str, annotations: &[Annotation]) -> Result<(), AnnotationError> {
    for annotation in annotations {
        let span = annotation.span;
        if span.start > span.end || span.end > code.len() {
            return Err(AnnotationError::OffsetOutOfBounds {
                offset: span.end.max(span.start),
                len: code.len(),
            });
        }
        if span_text(code, span).is_none() {
            let offset = if code.is_char_boundary(span.start) {
                span.end
            } else {
                span.start
            };
            return Err(AnnotationError::MisalignedOffset { offset });
        }
    }
    Ok(())
}

/// Highlights, splits, nests and renders one code block.
pub fn highlight_code_block(
    document: &CodeBlockDocument,
    highlighter: &dyn Highlighter,
    config: &RenderConfig,
) -> Result<RenderedCode, AnnotationError> {
    let code = document.code.as_str();
    let annotations = document.annotations.as_slice();
    validate_annotations(code, annotations)?;

    let tokens = highlighter.highlight(code, document.lang());
    let boundaries = BoundarySet::from_annotations(annotations, code.len())?;
    let tokens = split_tokens_by_boundaries(&tokens, &boundaries, code)?;
    let forest = build_annotation_tree(tokens, annotations, &mark_indices(annotations), code.len())?;
    let lines = split_tree_by_lines(forest, code);

    let mut rendered = render_annotated_lines(lines, code, annotations, config);
    rendered.lang = document.lang().map(str::to_string);
    Ok(rendered)
}

/// Unhighlighted, unannotated rendering of the block's code.
pub fn plain_render(document: &CodeBlockDocument, config: &RenderConfig) -> RenderedCode {
    let forest = plain_tokens(&document.code)
        .into_iter()
        .map(TreeNode::Leaf)
        .collect();
    let lines = split_tree_by_lines(forest, &document.code);
    let mut rendered = render_annotated_lines(lines, &document.code, &[], config);
    rendered.lang = document.lang().map(str::to_string);
    rendered
}

fn error_string<S: Serializer>(error: &AnnotationError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum BlockOutcome {
    Rendered {
        code: RenderedCode,
    },
    /// The block could not be annotated and is shown as plain code.
    Fallback {
        code: RenderedCode,
        #[serde(serialize_with = "error_string")]
        error: AnnotationError,
    },
}

impl BlockOutcome {
    pub fn code(&self) -> &RenderedCode {
        match self {
            BlockOutcome::Rendered { code } | BlockOutcome::Fallback { code, .. } => code,
        }
    }

    pub fn error(&self) -> Option<&AnnotationError> {
        match self {
            BlockOutcome::Rendered { .. } => None,
            BlockOutcome::Fallback { error, .. } => Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PageNode {
    Text {
        text: String,
    },
    Block {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        outcome: BlockOutcome,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedPage {
    pub nodes: Vec<PageNode>,
}

impl RenderedPage {
    pub fn blocks(&self) -> impl Iterator<Item = &BlockOutcome> {
        self.nodes.iter().filter_map(|node| match node {
            PageNode::Block { outcome, .. } => Some(outcome),
            PageNode::Text { .. } => None,
        })
    }

    pub fn fallback_count(&self) -> usize {
        self.blocks().filter(|b| b.error().is_some()).count()
    }

    /// The page source with every code fence replaced by its HTML.
    pub fn to_html(&self, config: &RenderConfig) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                PageNode::Text { text } => out.push_str(text),
                PageNode::Block { outcome, .. } => out.push_str(&to_html(outcome.code(), config)),
            }
        }
        out
    }
}

/// Renders every fenced code block of an MDX source independently.
///
/// A block that fails is rendered as plain code and its error recorded;
/// the other blocks are unaffected.
pub fn render_mdx(
    source: &str,
    rules: &AnnotationRules,
    config: &RenderConfig,
    highlighter: &dyn Highlighter,
) -> RenderedPage {
    let document = parse_mdx(source);
    let nodes = document
        .nodes
        .iter()
        .map(|node| match node {
            ContentNode::Text(text) => PageNode::Text { text: text.clone() },
            ContentNode::Fence(fence) => {
                let block = from_code_fence_to_code_block_document(fence, rules);
                let outcome = match highlight_code_block(&block, highlighter, config) {
                    Ok(code) => BlockOutcome::Rendered { code },
                    Err(error) => {
                        log::warn!(
                            "Rendering {} block as plain code: {error}",
                            block.lang().unwrap_or("untagged")
                        );
                        BlockOutcome::Fallback {
                            code: plain_render(&block, config),
                            error,
                        }
                    }
                };
                PageNode::Block {
                    id: fence.info.attr(BLOCK_ID_ATTR).map(str::to_string),
                    title: block.title(),
                    outcome,
                }
            }
        })
        .collect();
    RenderedPage { nodes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::AnnotationKind;
    use crate::highlight::{LexicalHighlighter, PlainHighlighter};
    use crate::parsing::rope::Span;
    use crate::tree::forest_text;
    use pretty_assertions::assert_eq;

    #[test]
    fn tooltip_block_renders_inline_wrap() {
        let page = render_mdx(
            "```js\n// !tooltip[/a/] the variable\nconst a = 1\n```\n",
            &AnnotationRules::default(),
            &RenderConfig::default(),
            &PlainHighlighter,
        );
        let code = page.blocks().next().unwrap().code();
        assert_eq!(code.lang.as_deref(), Some("js"));
        assert_eq!(code.lines.len(), 1);
        let nodes = &code.lines[0].nodes;
        assert_eq!(forest_text(nodes), "const a = 1");
        assert!(matches!(
            &nodes[1],
            TreeNode::Inline(wrap) if wrap.span == Span::new(6, 7)
        ));
    }

    #[test]
    fn failing_block_falls_back_without_affecting_siblings() {
        let source = "```\n// !mark{1-4}\n// !bold{3-6}\nabcdef\n```\n\n```\n// !mark\nok\n```\n";
        let page = render_mdx(
            source,
            &AnnotationRules::default(),
            &RenderConfig::default(),
            &PlainHighlighter,
        );
        let blocks: Vec<&BlockOutcome> = page.blocks().collect();
        assert_eq!(blocks.len(), 2);
        assert!(matches!(
            blocks[0].error(),
            Some(AnnotationError::MalformedNesting { .. })
        ));
        assert_eq!(forest_text(&blocks[0].code().lines[0].nodes), "abcdef");
        assert!(blocks[1].error().is_none());
        assert_eq!(page.fallback_count(), 1);
    }

    #[test]
    fn oversized_line_range_does_not_stop_the_page() {
        let source =
            "```\na\n// !mark(1:18446744073709551615)\nb\n```\n\n```\n// !mark\nok\n```\n";
        let page = render_mdx(
            source,
            &AnnotationRules::default(),
            &RenderConfig::default(),
            &PlainHighlighter,
        );
        let blocks: Vec<&BlockOutcome> = page.blocks().collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| b.error().is_none()));
        assert!(matches!(
            &blocks[0].code().lines[1].nodes[0],
            TreeNode::Mark(wrap) if wrap.span == Span::new(2, 3)
        ));
    }

    #[test]
    fn out_of_bounds_annotation_is_rejected() {
        let document = CodeBlockDocument::new(None, "", "abc")
            .with_annotation(Annotation::new("mark", AnnotationKind::Mark, Span::new(1, 9)));
        assert_eq!(
            highlight_code_block(&document, &PlainHighlighter, &RenderConfig::default()),
            Err(AnnotationError::OffsetOutOfBounds { offset: 9, len: 3 })
        );
    }

    #[test]
    fn split_character_is_rejected() {
        let document = CodeBlockDocument::new(None, "", "é")
            .with_annotation(Annotation::new("mark", AnnotationKind::Mark, Span::new(0, 1)));
        assert_eq!(
            validate_annotations(&document.code, &document.annotations),
            Err(AnnotationError::MisalignedOffset { offset: 1 })
        );
    }

    #[test]
    fn lexical_highlighter_scopes_survive_marks() {
        let document = CodeBlockDocument::new(Some("rust"), "", "let x = 1;")
            .with_annotation(Annotation::new("mark", AnnotationKind::Mark, Span::new(1, 6)));
        let code =
            highlight_code_block(&document, &LexicalHighlighter, &RenderConfig::default()).unwrap();
        let nodes = &code.lines[0].nodes;
        assert_eq!(forest_text(nodes), "let x = 1;");
        let TreeNode::Leaf(first) = &nodes[0] else {
            panic!("expected a leaf before the mark");
        };
        assert_eq!(first.text, "l");
        assert_eq!(first.scope.as_deref(), Some("keyword"));
        assert!(matches!(&nodes[1], TreeNode::Mark(wrap) if wrap.span == Span::new(1, 6)));
    }

    #[test]
    fn page_html_replaces_fences() {
        let page = render_mdx(
            "Intro\n\n```\nx\n```",
            &AnnotationRules::default(),
            &RenderConfig::default(),
            &PlainHighlighter,
        );
        insta::assert_snapshot!(page.to_html(&RenderConfig::default()), @r#"
        Intro

        <pre class="fm-code"><code><span class="fm-line" data-line="1">x</span></code></pre>
        "#);
    }

    #[test]
    fn fallback_serializes_error_message() {
        let outcome = BlockOutcome::Fallback {
            code: plain_render(&CodeBlockDocument::default(), &RenderConfig::default()),
            error: AnnotationError::MisalignedOffset { offset: 3 },
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "fallback");
        assert_eq!(value["error"], "Offset 3 is not on a character boundary");
    }
}
