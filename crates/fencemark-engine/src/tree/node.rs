use serde::Serialize;

use crate::highlight::Token;
use crate::parsing::rope::Span;

/// A node of the annotation tree.
///
/// The tree builder produces `Leaf` and `Mark`; `Inline` wraps are added
/// when lines are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TreeNode {
    Leaf(Token),
    Mark(Wrap),
    Inline(Wrap),
}

/// An annotation wrapped around contiguous children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wrap {
    /// Index of the annotation in the block's annotation list.
    pub annotation: usize,
    pub span: Span,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn span(&self) -> Span {
        match self {
            TreeNode::Leaf(token) => token.span,
            TreeNode::Mark(wrap) | TreeNode::Inline(wrap) => wrap.span,
        }
    }
}

fn collect_leaves<'a>(node: &'a TreeNode, out: &mut Vec<&'a Token>) {
    match node {
        TreeNode::Leaf(token) => out.push(token),
        TreeNode::Mark(wrap) | TreeNode::Inline(wrap) => {
            for child in &wrap.children {
                collect_leaves(child, out);
            }
        }
    }
}

/// Leaves of a forest in document order.
pub fn forest_leaves(nodes: &[TreeNode]) -> Vec<&Token> {
    let mut out = Vec::new();
    for node in nodes {
        collect_leaves(node, &mut out);
    }
    out
}

/// Concatenated leaf text of a forest.
pub fn forest_text(nodes: &[TreeNode]) -> String {
    forest_leaves(nodes)
        .into_iter()
        .map(|t| t.text.as_str())
        .collect()
}
