//! Cutting a forest at offsets while keeping every wrap on both sides.

use crate::parsing::rope::Span;

use super::node::{TreeNode, Wrap};

/// Splits a forest at `at`, re-wrapping every wrap that straddles the cut.
///
/// A node starting at or after `at` goes right, so a zero-width wrap at the
/// cut position lands on the right side.
pub fn cut_forest(nodes: Vec<TreeNode>, at: usize) -> (Vec<TreeNode>, Vec<TreeNode>) {
    let mut parts = split_forest(nodes, &[at]).into_iter();
    (
        parts.next().unwrap_or_default(),
        parts.next().unwrap_or_default(),
    )
}

/// Splits a forest at each of the ascending `cuts`, returning
/// `cuts.len() + 1` segments. Segment `k` holds everything in
/// `[cuts[k - 1], cuts[k])`.
///
/// Cuts must lie on character boundaries of the leaves they fall in.
pub fn split_forest(nodes: Vec<TreeNode>, cuts: &[usize]) -> Vec<Vec<TreeNode>> {
    let mut segments: Vec<Vec<TreeNode>> = (0..=cuts.len()).map(|_| Vec::new()).collect();
    for node in nodes {
        distribute(node, cuts, &mut segments);
    }
    segments
}

fn segment_of(cuts: &[usize], offset: usize) -> usize {
    cuts.partition_point(|&cut| cut <= offset)
}

fn segment_range(cuts: &[usize], k: usize) -> Span {
    let start = if k == 0 { 0 } else { cuts[k - 1] };
    let end = cuts.get(k).copied().unwrap_or(usize::MAX);
    Span::new(start, end)
}

fn distribute(node: TreeNode, cuts: &[usize], segments: &mut [Vec<TreeNode>]) {
    let span = node.span();
    let first = segment_of(cuts, span.start);
    let last = if span.is_empty() {
        first
    } else {
        segment_of(cuts, span.end - 1)
    };
    if first == last {
        segments[first].push(node);
        return;
    }

    let inline = matches!(node, TreeNode::Inline(_));
    match node {
        TreeNode::Leaf(token) => {
            for (k, segment) in segments.iter_mut().enumerate().take(last + 1).skip(first) {
                if let Some(piece) = span.intersect(segment_range(cuts, k))
                    && !piece.is_empty()
                {
                    segment.push(TreeNode::Leaf(token.slice(piece)));
                }
            }
        }
        TreeNode::Mark(wrap) | TreeNode::Inline(wrap) => {
            let inner = &cuts[first..last];
            let parts = split_forest(wrap.children, inner);
            for (k, children) in parts.into_iter().enumerate() {
                let Some(piece) = span.intersect(segment_range(inner, k)) else {
                    continue;
                };
                if piece.is_empty() {
                    continue;
                }
                let piece = Wrap {
                    annotation: wrap.annotation,
                    span: piece,
                    children,
                };
                segments[first + k].push(wrap_node(inline, piece));
            }
        }
    }
}

fn wrap_node(inline: bool, wrap: Wrap) -> TreeNode {
    if inline {
        TreeNode::Inline(wrap)
    } else {
        TreeNode::Mark(wrap)
    }
}

/// Drops everything at or after `end`, keeping zero-width nodes at `end`.
pub fn truncate_forest(nodes: Vec<TreeNode>, end: usize) -> Vec<TreeNode> {
    nodes
        .into_iter()
        .filter_map(|node| {
            let span = node.span();
            if span.start > end || (span.start == end && !span.is_empty()) {
                return None;
            }
            if span.end <= end {
                return Some(node);
            }
            let piece = Span::new(span.start, end);
            let inline = matches!(node, TreeNode::Inline(_));
            Some(match node {
                TreeNode::Leaf(token) => TreeNode::Leaf(token.slice(piece)),
                TreeNode::Mark(wrap) | TreeNode::Inline(wrap) => wrap_node(
                    inline,
                    Wrap {
                        annotation: wrap.annotation,
                        span: piece,
                        children: truncate_forest(wrap.children, end),
                    },
                ),
            })
        })
        .collect()
}

/// Wraps the part of a forest inside `span` in a new inline node.
pub fn wrap_inline(nodes: Vec<TreeNode>, span: Span, annotation: usize) -> Vec<TreeNode> {
    let mut parts = split_forest(nodes, &[span.start, span.end]).into_iter();
    let mut out = parts.next().unwrap_or_default();
    out.push(TreeNode::Inline(Wrap {
        annotation,
        span,
        children: parts.next().unwrap_or_default(),
    }));
    out.extend(parts.next().unwrap_or_default());
    out
}
