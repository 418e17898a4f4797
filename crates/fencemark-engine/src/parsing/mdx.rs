//! Finds the fenced code blocks of an MDX/Markdown source.
//!
//! Only fences are structured; everything else stays as opaque text so that
//! [`MdxDocument::to_markdown`] reproduces the source exactly.

use std::ops::Range;
use std::sync::Arc;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use super::fence::FenceNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentNode {
    Text(String),
    Fence(Arc<FenceNode>),
}

/// A content file split into text runs and fenced code blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MdxDocument {
    pub nodes: Vec<ContentNode>,
}

impl MdxDocument {
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                ContentNode::Text(text) => out.push_str(text),
                ContentNode::Fence(fence) => out.push_str(&fence.to_markdown()),
            }
        }
        out
    }

    pub fn fences(&self) -> impl Iterator<Item = &Arc<FenceNode>> {
        self.nodes.iter().filter_map(|node| match node {
            ContentNode::Fence(fence) => Some(fence),
            ContentNode::Text(_) => None,
        })
    }

    /// Returns a new document with every fence passed through `f`.
    /// Text runs are shared unchanged; the first error aborts.
    pub fn map_fences<F, E>(&self, mut f: F) -> Result<MdxDocument, E>
    where
        F: FnMut(&Arc<FenceNode>) -> Result<Arc<FenceNode>, E>,
    {
        let nodes = self
            .nodes
            .iter()
            .map(|node| match node {
                ContentNode::Text(text) => Ok(ContentNode::Text(text.clone())),
                ContentNode::Fence(fence) => f(fence).map(ContentNode::Fence),
            })
            .collect::<Result<Vec<_>, E>>()?;
        Ok(MdxDocument { nodes })
    }
}

/// Splits `source` into text and top-level fenced code blocks.
///
/// Fences inside block quotes or lists, and indented fences, are left in the
/// surrounding text.
pub fn parse_mdx(source: &str) -> MdxDocument {
    let mut nodes = Vec::new();
    let mut cursor = 0usize;
    let mut containers: Vec<Range<usize>> = Vec::new();

    for (event, range) in Parser::new_ext(source, Options::empty()).into_offset_iter() {
        match event {
            Event::Start(Tag::BlockQuote(_) | Tag::List(_) | Tag::FootnoteDefinition(_)) => {
                containers.push(range);
            }
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))) => {
                containers.retain(|c| c.end > range.start);
                if !containers.is_empty() || range.start < cursor {
                    continue;
                }
                let range = trim_line_ending(source, range);
                let Some(fence) = FenceNode::parse(&source[range.clone()]) else {
                    continue;
                };
                if cursor < range.start {
                    nodes.push(ContentNode::Text(source[cursor..range.start].to_string()));
                }
                nodes.push(ContentNode::Fence(Arc::new(fence)));
                cursor = range.end;
            }
            _ => {}
        }
    }

    if cursor < source.len() {
        nodes.push(ContentNode::Text(source[cursor..].to_string()));
    }
    log::trace!("parsed mdx: {} nodes", nodes.len());
    MdxDocument { nodes }
}

/// The range pulldown-cmark reports for a fence includes the line ending of
/// its closing line; that newline belongs to the following text.
fn trim_line_ending(source: &str, range: Range<usize>) -> Range<usize> {
    let slice = &source[range.clone()];
    if slice.ends_with('\n') {
        range.start..range.end - 1
    } else {
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn splits_text_and_fences() {
        let source = "# Title\n\n```js\nconst a = 1\n```\n\nAfter.\n";
        let doc = parse_mdx(source);
        assert_eq!(doc.nodes.len(), 3);
        assert_eq!(
            doc.nodes[0],
            ContentNode::Text("# Title\n\n".to_string())
        );
        let fence = doc.fences().next().unwrap();
        assert_eq!(fence.info.lang(), Some("js"));
        assert_eq!(fence.lines, vec!["const a = 1".to_string()]);
        assert_eq!(doc.nodes[2], ContentNode::Text("\n\nAfter.\n".to_string()));
    }

    #[test]
    fn fences_in_containers_stay_text() {
        let source = "> ```js\n> quoted\n> ```\n\n- item\n\n  ```\n  listed\n  ```\n";
        let doc = parse_mdx(source);
        assert_eq!(doc.fences().count(), 0);
    }

    #[test]
    fn indented_fence_stays_text() {
        let doc = parse_mdx("  ```\n  x\n  ```\n");
        assert_eq!(doc.fences().count(), 0);
    }

    #[rstest]
    #[case("")]
    #[case("no fences here\n")]
    #[case("```\n```")]
    #[case("```js\nopen to the end")]
    #[case("a\n\n~~~~ py title=x\n```\nnot closed by backticks\n~~~~\n")]
    #[case("<Tabs>\n\n```ts\nlet x\n```\n\n</Tabs>\n")]
    #[case("x\r\n\r\n```\r\ncrlf\r\n```\r\n")]
    #[case("> ```\n> q\n> ```\n\n```\nplain\n```\n")]
    fn to_markdown_reproduces_source(#[case] source: &str) {
        assert_eq!(parse_mdx(source).to_markdown(), source);
    }

    #[test]
    fn map_fences_rebuilds_document() {
        let doc = parse_mdx("```\na\n```\n");
        let mapped = doc
            .map_fences(|fence| {
                let mut fence = (**fence).clone();
                fence.lines.push("b".to_string());
                Ok::<_, ()>(Arc::new(fence))
            })
            .unwrap();
        assert_eq!(mapped.to_markdown(), "```\na\nb\n```\n");
    }
}
