use crate::render::RenderedCode;
use crate::tree::TreeNode;

/// A compact text picture of a rendered block for snapshot tests.
///
/// One row per line: the line number, block decorations as `#name`, wrapper
/// groups as `@index`, then the code with marks shown as `[name|...]` and
/// inline wraps as `<name|...>`.
pub fn outline(rendered: &RenderedCode) -> String {
    let mut out = String::new();
    for (i, line) in rendered.lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&line.number.to_string());
        for &d in &line.decorations {
            out.push_str(&format!(" #{}", rendered.annotations[d].name));
        }
        for &g in &line.groups {
            out.push_str(&format!(" @{g}"));
        }
        out.push_str(" | ");
        write_nodes(&mut out, rendered, &line.nodes);
    }
    out
}

fn write_nodes(out: &mut String, rendered: &RenderedCode, nodes: &[TreeNode]) {
    for node in nodes {
        match node {
            TreeNode::Leaf(token) => out.push_str(&token.text),
            TreeNode::Mark(wrap) => {
                out.push_str(&format!("[{}|", rendered.annotations[wrap.annotation].name));
                write_nodes(out, rendered, &wrap.children);
                out.push(']');
            }
            TreeNode::Inline(wrap) => {
                out.push_str(&format!("<{}|", rendered.annotations[wrap.annotation].name));
                write_nodes(out, rendered, &wrap.children);
                out.push('>');
            }
        }
    }
}
