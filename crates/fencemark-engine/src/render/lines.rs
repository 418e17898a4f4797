use serde::Serialize;

use crate::parsing::rope::Span;
use crate::tree::{TreeNode, split_forest};

/// The annotation tree restricted to one source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub index: usize,
    /// Includes the line's trailing newline, if any.
    pub span: Span,
    pub nodes: Vec<TreeNode>,
}

/// Cuts the forest after every `\n` of `code`.
///
/// The newline belongs to the line it ends. A mark spanning several lines
/// is re-wrapped on every line it touches. `code.split('\n').count()` lines
/// are returned, so empty code yields a single empty line.
pub fn split_tree_by_lines(forest: Vec<TreeNode>, code: &str) -> Vec<Line> {
    let cuts: Vec<usize> = code.match_indices('\n').map(|(i, _)| i + 1).collect();
    let segments = split_forest(forest, &cuts);

    segments
        .into_iter()
        .enumerate()
        .map(|(index, nodes)| {
            let start = if index == 0 { 0 } else { cuts[index - 1] };
            let end = cuts.get(index).copied().unwrap_or(code.len());
            Line {
                index,
                span: Span::new(start, end),
                nodes,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::Token;
    use crate::tree::{Wrap, forest_text};
    use pretty_assertions::assert_eq;

    #[test]
    fn mark_spanning_lines_reappears() {
        let code = "ab\ncd\nef";
        let forest = vec![
            TreeNode::Leaf(Token::new(Span::new(0, 1), "a", None)),
            TreeNode::Mark(Wrap {
                annotation: 0,
                span: Span::new(1, 7),
                children: vec![TreeNode::Leaf(Token::new(Span::new(1, 7), "b\ncd\ne", None))],
            }),
            TreeNode::Leaf(Token::new(Span::new(7, 8), "f", None)),
        ];
        let lines = split_tree_by_lines(forest, code);
        assert_eq!(lines.len(), 3);
        let texts: Vec<String> = lines.iter().map(|l| forest_text(&l.nodes)).collect();
        assert_eq!(texts, vec!["ab\n", "cd\n", "ef"]);
        for line in &lines {
            assert!(line.nodes.iter().any(|n| matches!(n, TreeNode::Mark(_))));
        }
        assert_eq!(lines[1].span, Span::new(3, 6));
    }

    #[test]
    fn every_offset_in_exactly_one_line() {
        let code = "x\n\ny\n";
        let forest = vec![TreeNode::Leaf(Token::new(Span::new(0, code.len()), code, None))];
        let lines = split_tree_by_lines(forest, code);
        assert_eq!(lines.len(), 4);
        for offset in 0..code.len() {
            let owners = lines.iter().filter(|l| l.span.contains_offset(offset)).count();
            assert_eq!(owners, 1, "offset {offset}");
        }
        assert_eq!(lines[3].span, Span::new(5, 5));
        assert!(lines[3].nodes.is_empty());
    }

    #[test]
    fn empty_code_is_one_empty_line() {
        let lines = split_tree_by_lines(vec![], "");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].span, Span::new(0, 0));
    }
}
