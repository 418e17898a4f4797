use crate::parsing::rope::Span;
use crate::render::{Line, RenderedCode};
use crate::tree::TreeNode;

/// Leaves tile `span` in order and each wrap's children exactly cover it.
fn check_nodes(code: &str, nodes: &[TreeNode], span: Span) {
    let mut at = span.start;
    for node in nodes {
        let node_span = node.span();
        assert_eq!(
            node_span.start, at,
            "node does not start where its sibling ended: {node_span:?}, expected start {at}"
        );
        assert!(
            node_span.end <= span.end,
            "node {node_span:?} exceeds its parent {span:?}"
        );
        match node {
            TreeNode::Leaf(token) => {
                assert_eq!(
                    token.text,
                    &code[token.span.start..token.span.end],
                    "leaf text does not match the code at {:?}",
                    token.span
                );
            }
            TreeNode::Mark(wrap) | TreeNode::Inline(wrap) => {
                check_nodes(code, &wrap.children, wrap.span);
            }
        }
        at = node_span.end;
    }
    assert_eq!(at, span.end, "children of {span:?} stop at {at}");
}

/// The forest tiles the whole code and every wrap covers its children.
pub fn check_tree(code: &str, forest: &[TreeNode]) {
    check_nodes(code, forest, Span::new(0, code.len()));
}

/// Every offset of the code belongs to exactly one line.
pub fn check_lines(code: &str, lines: &[Line]) {
    assert_eq!(
        lines.len(),
        code.split('\n').count(),
        "line count does not match the code"
    );
    let mut at = 0;
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(line.index, i, "line index out of order");
        assert_eq!(line.span.start, at, "line {i} does not start where line {} ended", i.saturating_sub(1));
        let is_last = i + 1 == lines.len();
        assert_eq!(
            code[line.span.start..line.span.end].ends_with('\n'),
            !is_last,
            "line {i} must end with a newline unless it is the last"
        );
        check_nodes(code, &line.nodes, line.span);
        at = line.span.end;
    }
    assert_eq!(at, code.len(), "lines stop at {at} of {}", code.len());
}

/// Rendered lines cover the code's line contents and reference valid
/// annotations and groups.
pub fn check_rendered(code: &str, rendered: &RenderedCode) {
    for line in &rendered.lines {
        assert!(
            !code[line.span.start..line.span.end].contains('\n'),
            "rendered line {} still holds a newline",
            line.index
        );
        check_nodes(code, &line.nodes, line.span);
        for &d in &line.decorations {
            assert!(d < rendered.annotations.len(), "decoration {d} out of range");
        }
        for &g in &line.groups {
            let group = &rendered.groups[g];
            assert!(
                group.first <= line.index && line.index <= group.last,
                "line {} is not inside group {g}",
                line.index
            );
        }
    }
    for (i, a) in rendered.groups.iter().enumerate() {
        for b in rendered.groups.iter().skip(i + 1).filter(|b| b.name == a.name) {
            assert!(
                a.last + 1 < b.first || b.last + 1 < a.first,
                "groups {a:?} and {b:?} should have been merged"
            );
        }
    }
}
