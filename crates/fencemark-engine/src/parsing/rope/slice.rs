use super::span::Span;

/// The text of `span`, or `None` if it is out of range or cuts a character.
pub fn span_text(code: &str, span: Span) -> Option<&str> {
    code.get(span.start..span.end)
}

/// Truncates `text` to at most `max` bytes with a "..." suffix if needed.
///
/// Used for human-readable diagnostics. Never cuts inside a character.
pub fn preview(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut cut = max;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &text[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_short_text_unchanged() {
        assert_eq!(preview("// !mark", 20), "// !mark");
    }

    #[test]
    fn preview_truncates_long_comment() {
        assert_eq!(preview("// !tooltip[/a/] the variable", 16), "// !tooltip[/a/]...");
    }

    #[test]
    fn preview_respects_char_boundaries() {
        assert_eq!(preview("héllo", 2), "h...");
    }

    #[test]
    fn span_text_checks_bounds_and_boundaries() {
        assert_eq!(span_text("const a", Span::new(6, 7)), Some("a"));
        assert_eq!(span_text("abc", Span::new(1, 9)), None);
        assert_eq!(span_text("é", Span::new(0, 1)), None);
    }
}
