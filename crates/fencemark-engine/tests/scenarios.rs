//! End-to-end behaviour of the annotation pipeline.

use fencemark_engine::annotations::{Annotation, AnnotationKind, AnnotationRules, parse_annotations};
use fencemark_engine::bridge::{CodeBlockDocument, from_code_fence_to_code_block_document};
use fencemark_engine::error::{AnnotationError, NamedSpan};
use fencemark_engine::highlight::{BoundarySet, Highlighter, Token, split_tokens_by_boundaries};
use fencemark_engine::parsing::FenceNode;
use fencemark_engine::parsing::rope::Span;
use fencemark_engine::render::{RenderConfig, split_tree_by_lines};
use fencemark_engine::snapshot::{check_lines, check_rendered, check_tree, outline};
use fencemark_engine::tree::{TreeNode, build_annotation_tree, forest_text};
use fencemark_engine::{LexicalHighlighter, PlainHighlighter, highlight_code_block};
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn document(raw_fence: &str) -> CodeBlockDocument {
    let fence = FenceNode::parse(raw_fence).unwrap();
    from_code_fence_to_code_block_document(&fence, &AnnotationRules::default())
}

fn mark(name: &str, start: usize, end: usize) -> Annotation {
    Annotation::new(name, AnnotationKind::Mark, Span::new(start, end))
}

fn tree(code: &str, annotations: &[Annotation]) -> Result<Vec<TreeNode>, AnnotationError> {
    let tokens = LexicalHighlighter.highlight(code, Some("js"));
    let boundaries = BoundarySet::from_annotations(annotations, code.len())?;
    let tokens = split_tokens_by_boundaries(&tokens, &boundaries, code)?;
    let marks: Vec<usize> = (0..annotations.len()).collect();
    build_annotation_tree(tokens, annotations, &marks, code.len())
}

#[test]
fn tooltip_on_regex_match() {
    let parsed = parse_annotations(
        "// !tooltip[/a/] the variable\nconst a = 1",
        Some("js"),
        &AnnotationRules::default(),
    );
    assert_eq!(parsed.code, "const a = 1");
    assert_eq!(parsed.annotations.len(), 1);
    let tooltip = &parsed.annotations[0];
    assert_eq!(tooltip.name, "tooltip");
    assert_eq!(tooltip.kind, AnnotationKind::Inline);
    assert_eq!(tooltip.span, Span::new(6, 7));
    assert_eq!(tooltip.query.as_deref(), Some("the variable"));
}

#[test]
fn nested_marks_form_one_root() {
    let annotations = vec![mark("strong", 0, 5), mark("emphasis", 1, 3)];
    let forest = tree("hello", &annotations).unwrap();
    assert_eq!(forest.len(), 1);
    let TreeNode::Mark(strong) = &forest[0] else {
        panic!("expected the strong mark at the root");
    };
    assert_eq!(strong.annotation, 0);
    assert_eq!(strong.children.len(), 3);
    assert!(matches!(&strong.children[1], TreeNode::Mark(inner) if inner.annotation == 1));
    check_tree("hello", &forest);
}

#[test]
fn touching_wrappers_merge_into_one_group() {
    let document = document(
        "```\nl1\n// !collapse(3)\nl2\nl3\n// !collapse(3)\nl4\nl5\nl6\nl7\n```",
    );
    let rendered =
        highlight_code_block(&document, &PlainHighlighter, &RenderConfig::default()).unwrap();
    assert_eq!(rendered.groups.len(), 1);
    let group = &rendered.groups[0];
    assert_eq!((group.first + 1, group.last + 1), (2, 6));
    assert_eq!(group.annotations, vec![0, 1]);
    let grouped: Vec<usize> = rendered
        .lines
        .iter()
        .filter(|line| line.groups == vec![0])
        .map(|line| line.number)
        .collect();
    assert_eq!(grouped, vec![2, 3, 4, 5, 6]);
}

#[test]
fn separated_wrappers_stay_independent() {
    let document = document("```\n// !fold\na\nb\n// !fold\nc\n```");
    let rendered =
        highlight_code_block(&document, &PlainHighlighter, &RenderConfig::default()).unwrap();
    assert_eq!(rendered.groups.len(), 2);
    check_rendered(&document.code, &rendered);
}

#[test]
fn regex_without_match_is_omitted() {
    let document = document("```js\n// !mark[/zzz/]\nconst a = 1\n```");
    assert!(document.annotations.is_empty());
    assert_eq!(document.unresolved.len(), 1);
    let rendered =
        highlight_code_block(&document, &PlainHighlighter, &RenderConfig::default()).unwrap();
    assert_eq!(forest_text(&rendered.lines[0].nodes), "const a = 1");
}

#[test]
fn partial_overlap_names_both_ranges() {
    let annotations = vec![mark("mark", 0, 4), mark("strong", 2, 6)];
    assert_eq!(
        tree("abcdef", &annotations),
        Err(AnnotationError::MalformedNesting {
            first: NamedSpan {
                name: "mark".into(),
                span: Span::new(0, 4),
            },
            second: NamedSpan {
                name: "strong".into(),
                span: Span::new(2, 6),
            },
        })
    );
}

#[rstest]
#[case::plain("const a = 1", vec![])]
#[case::one_mark("let x = compute(1, 2);", vec![mark("mark", 4, 15)])]
#[case::nested("let x = compute(1, 2);", vec![mark("strong", 0, 22), mark("mark", 8, 15), mark("emphasis", 8, 10)])]
#[case::multi_line("a = 1\nb = 2\nc = 3", vec![mark("mark", 2, 13)])]
#[case::multibyte("let s = \"héllo\";", vec![mark("mark", 9, 15)])]
#[case::zero_width("abc", vec![mark("mark", 1, 1)])]
#[case::trailing_newline("x\n", vec![mark("mark", 0, 2)])]
fn leaves_tile_the_code(#[case] code: &str, #[case] annotations: Vec<Annotation>) {
    let forest = tree(code, &annotations).unwrap();
    assert_eq!(forest_text(&forest), code);
    check_tree(code, &forest);
    let lines = split_tree_by_lines(forest, code);
    check_lines(code, &lines);
}

#[test]
fn split_tokens_only_cut_at_boundaries() {
    let code = "const value = compute(42);";
    let input: Vec<Token> = LexicalHighlighter.highlight(code, Some("js"));
    let annotations = vec![mark("mark", 2, 9), mark("tooltip", 14, 25)];
    let boundaries = BoundarySet::from_annotations(&annotations, code.len()).unwrap();
    let output = split_tokens_by_boundaries(&input, &boundaries, code).unwrap();

    let input_edges: Vec<usize> = input
        .iter()
        .flat_map(|t| [t.span.start, t.span.end])
        .collect();
    for token in &output {
        for edge in [token.span.start, token.span.end] {
            assert!(
                boundaries.contains(edge) || input_edges.contains(&edge),
                "edge {edge} is neither a boundary nor an input edge"
            );
        }
        for cut in boundaries.iter() {
            assert!(
                !(token.span.start < cut && cut < token.span.end),
                "token {:?} straddles boundary {cut}",
                token.span
            );
        }
    }
}

#[test]
fn identical_ranges_nest_in_input_order() {
    let annotations = vec![mark("strong", 0, 3), mark("emphasis", 0, 3)];
    for _ in 0..3 {
        let forest = tree("abc", &annotations).unwrap();
        let TreeNode::Mark(outer) = &forest[0] else {
            panic!("expected a mark");
        };
        assert_eq!(outer.annotation, 0);
        assert!(matches!(&outer.children[0], TreeNode::Mark(inner) if inner.annotation == 1));
    }
}

#[test]
fn outline_of_annotated_block() {
    let document = document(
        "```js\n// !highlight\n// !tooltip[/a/] the variable\nconst a = 1\n// !fold(2)\n// !mark[/b/]\nlet b = a\nb++\n```",
    );
    let rendered =
        highlight_code_block(&document, &PlainHighlighter, &RenderConfig::default()).unwrap();
    check_rendered(&document.code, &rendered);
    assert_snapshot!(outline(&rendered), @r"
    1 #highlight | const <tooltip|a> = 1
    2 @0 | let [mark|b] = a
    3 @0 | b++
    ");
}
