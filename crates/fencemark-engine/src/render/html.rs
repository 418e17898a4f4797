//! HTML output for rendered code.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::tree::TreeNode;

use super::config::RenderConfig;
use super::render::{RenderedCode, RenderedLine};

/// Renders a code block as `<pre><code>` with one `<span>` per line.
pub fn to_html(rendered: &RenderedCode, config: &RenderConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("<pre class=\"{}\"", config.class_for("code")));
    if let Some(lang) = &rendered.lang {
        out.push_str(&format!(
            " data-lang=\"{}\"",
            encode_double_quoted_attribute(lang)
        ));
    }
    out.push_str("><code>");
    for (i, line) in rendered.lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_line(&mut out, rendered, line, config);
    }
    out.push_str("</code></pre>");
    out
}

fn write_line(out: &mut String, rendered: &RenderedCode, line: &RenderedLine, config: &RenderConfig) {
    let mut classes = vec![config.class_for("line")];
    let mut data = String::new();
    for &d in &line.decorations {
        let annotation = &rendered.annotations[d];
        let class = config.class_for(&annotation.name);
        if !classes.contains(&class) {
            classes.push(class);
        }
        if let Some(query) = &annotation.query {
            data.push_str(&format!(
                " data-{}=\"{}\"",
                annotation.name,
                encode_double_quoted_attribute(query)
            ));
        }
    }
    for &g in &line.groups {
        let class = config.class_for(&rendered.groups[g].name);
        if !classes.contains(&class) {
            classes.push(class);
        }
    }
    if !line.groups.is_empty() {
        let ids: Vec<String> = line.groups.iter().map(usize::to_string).collect();
        data.push_str(&format!(" data-groups=\"{}\"", ids.join(" ")));
    }

    out.push_str(&format!(
        "<span class=\"{}\" data-line=\"{}\"{data}>",
        classes.join(" "),
        line.number
    ));
    if config.line_numbers {
        out.push_str(&format!(
            "<span class=\"{}\">{}</span>",
            config.class_for("line-number"),
            line.number
        ));
    }
    write_nodes(out, rendered, &line.nodes, config);
    out.push_str("</span>");
}

fn write_nodes(out: &mut String, rendered: &RenderedCode, nodes: &[TreeNode], config: &RenderConfig) {
    for node in nodes {
        match node {
            TreeNode::Leaf(token) => match &token.scope {
                Some(scope) => {
                    out.push_str(&format!(
                        "<span class=\"{}\">{}</span>",
                        config.class_for(scope),
                        encode_text(&token.text)
                    ));
                }
                None => out.push_str(&encode_text(&token.text)),
            },
            TreeNode::Mark(wrap) => {
                let name = &rendered.annotations[wrap.annotation].name;
                out.push_str(&format!("<mark class=\"{}\">", config.class_for(name)));
                write_nodes(out, rendered, &wrap.children, config);
                out.push_str("</mark>");
            }
            TreeNode::Inline(wrap) => {
                let annotation = &rendered.annotations[wrap.annotation];
                out.push_str(&format!("<span class=\"{}\"", config.class_for(&annotation.name)));
                if let Some(query) = &annotation.query {
                    out.push_str(&format!(
                        " data-query=\"{}\"",
                        encode_double_quoted_attribute(query)
                    ));
                }
                out.push('>');
                write_nodes(out, rendered, &wrap.children, config);
                out.push_str("</span>");
            }
        }
    }
}
