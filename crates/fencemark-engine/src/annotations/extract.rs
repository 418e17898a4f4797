use super::directive::{Directive, parse_directive};
use super::rules::AnnotationRules;

/// An annotation comment lifted out of the code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComment {
    /// Position among the annotation comments of the block.
    pub ordinal: usize,
    /// Index (in the extracted code) of the line the comment preceded.
    pub anchor: usize,
    /// The comment line as written, line ending removed.
    pub text: String,
    pub directive: Directive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Normalized code with the annotation comments removed.
    pub code: String,
    pub comments: Vec<RawComment>,
}

/// Removes annotation comment lines from `raw`.
///
/// Line endings are normalized to `\n`. Only comments whose name matches a
/// rule are removed; anything else, including `!words` the rules do not know,
/// stays in the code.
pub fn extract_comments(raw: &str, lang: Option<&str>, rules: &AnnotationRules) -> Extraction {
    let style = rules.comment_style(lang);
    let mut kept: Vec<&str> = Vec::new();
    let mut comments = Vec::new();

    for line in raw.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        match parse_directive(line, style) {
            Some(directive) if rules.find(&directive.name).is_some() => {
                comments.push(RawComment {
                    ordinal: comments.len(),
                    anchor: kept.len(),
                    text: line.to_string(),
                    directive,
                });
            }
            _ => kept.push(line),
        }
    }

    Extraction {
        code: kept.join("\n"),
        comments,
    }
}
