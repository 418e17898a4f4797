//! Resolves annotation comments to ranges of the normalized code.

use regex::RegexBuilder;

use crate::parsing::rope::{LineIndex, Span, preview};

use super::directive::{Directive, Selector};
use super::extract::{RawComment, extract_comments};
use super::rules::{AnnotationRule, AnnotationRules, TargetRule};
use super::types::{Annotation, Origin, Unresolved};

/// Why a directive's target could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Unresolvable {
    #[error("no rule named {0:?}")]
    UnknownName(String),
    #[error("no code line to attach to")]
    NoLine,
    #[error("range starts outside the code")]
    OutOfRange,
    #[error("invalid pattern: {0}")]
    InvalidRegex(String),
    #[error("pattern has no match")]
    NoMatch,
    #[error("target is empty")]
    Empty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    pub annotations: Vec<Annotation>,
    pub unresolved: Vec<Unresolved>,
}

/// Code of one block together with its annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCode {
    pub code: String,
    pub annotations: Vec<Annotation>,
    pub unresolved: Vec<Unresolved>,
}

enum Target {
    Lines(usize, usize),
    Chars(Vec<Span>),
}

/// Number of lines a code string holds; empty code holds none.
pub fn code_line_count(code: &str, index: &LineIndex) -> usize {
    if code.is_empty() {
        0
    } else {
        index.line_count()
    }
}

/// Resolves one directive against `code` as if it preceded line `anchor`.
pub fn resolve(
    directive: &Directive,
    rule: &AnnotationRule,
    anchor: usize,
    code: &str,
    index: &LineIndex,
) -> Result<Vec<Span>, Unresolvable> {
    let lines = code_line_count(code, index);
    let base = match rule.target {
        TargetRule::NextLine if anchor < lines => anchor,
        TargetRule::Block if lines > 0 => 0,
        _ => return Err(Unresolvable::NoLine),
    };
    let scope = match rule.target {
        TargetRule::NextLine => index.content_span(anchor),
        TargetRule::Block => Span::new(0, code.len()),
    };

    let target = match &directive.selector {
        Selector::Default => match rule.target {
            TargetRule::NextLine => Target::Lines(anchor, anchor),
            TargetRule::Block => Target::Lines(0, lines - 1),
        },
        Selector::Lines { first, last } => {
            if *first == 0 || first > last {
                return Err(Unresolvable::OutOfRange);
            }
            let start = base
                .checked_add(first - 1)
                .filter(|&line| line < lines)
                .ok_or(Unresolvable::OutOfRange)?;
            Target::Lines(start, base.saturating_add(last - 1).min(lines - 1))
        }
        Selector::Columns { first, last } => {
            let span = columns(&code[scope.start..scope.end], *first, *last)?;
            Target::Chars(vec![span.shift(scope.start)])
        }
        Selector::Regex {
            pattern,
            global,
            case_insensitive,
        } => Target::Chars(matches(
            &code[scope.start..scope.end],
            pattern,
            *global,
            *case_insensitive,
        )?
        .into_iter()
        .map(|span| span.shift(scope.start))
        .collect()),
    };

    let spans = match (target, rule.kind.is_character_level()) {
        (Target::Lines(first, last), true) => {
            let content = index.line_text(code, first);
            let indent = content.len() - content.trim_start().len();
            let span = Span::new(index.line_start(first) + indent, index.line_end(last));
            if span.is_empty() {
                return Err(Unresolvable::Empty);
            }
            vec![span]
        }
        (Target::Lines(first, last), false) => vec![index.lines_span(first, last)],
        (Target::Chars(spans), true) => spans,
        (Target::Chars(spans), false) => {
            let mut out: Vec<Span> = Vec::new();
            for span in spans {
                let (first, last) = index.lines_of(span);
                let lines = index.lines_span(first, last);
                if out.last() != Some(&lines) {
                    out.push(lines);
                }
            }
            out
        }
    };
    Ok(spans)
}

/// Byte span of 1-based inclusive character columns `first..=last`.
fn columns(text: &str, first: usize, last: usize) -> Result<Span, Unresolvable> {
    if first == 0 || first > last {
        return Err(Unresolvable::OutOfRange);
    }
    let offset_of = |n: usize| {
        text.char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .nth(n)
    };
    let start = offset_of(first - 1)
        .filter(|&s| s < text.len())
        .ok_or(Unresolvable::OutOfRange)?;
    let end = offset_of(last).unwrap_or(text.len());
    Ok(Span::new(start, end))
}

fn matches(
    text: &str,
    pattern: &str,
    global: bool,
    case_insensitive: bool,
) -> Result<Vec<Span>, Unresolvable> {
    let re = RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| Unresolvable::InvalidRegex(e.to_string()))?;

    let mut spans = Vec::new();
    for caps in re.captures_iter(text) {
        let Some(m) = caps.get(1).or_else(|| caps.get(0)) else {
            continue;
        };
        if m.is_empty() {
            continue;
        }
        spans.push(Span::new(m.start(), m.end()));
        if !global {
            break;
        }
    }
    if spans.is_empty() {
        return Err(Unresolvable::NoMatch);
    }
    Ok(spans)
}

/// Resolves extracted comments into annotations.
///
/// Comments whose target cannot be resolved are not errors: they are left out
/// of the annotations, logged, and returned as [`Unresolved`].
pub fn normalize_annotations(
    comments: &[RawComment],
    code: &str,
    rules: &AnnotationRules,
) -> Normalized {
    let index = LineIndex::new(code);
    let mut normalized = Normalized::default();

    for comment in comments {
        let resolved = match rules.find(&comment.directive.name) {
            Some(rule) => resolve(&comment.directive, rule, comment.anchor, code, &index)
                .map(|spans| (rule, spans)),
            None => Err(Unresolvable::UnknownName(comment.directive.name.clone())),
        };
        match resolved {
            Ok((rule, spans)) => {
                for span in spans {
                    normalized.annotations.push(Annotation {
                        name: rule.name.clone(),
                        kind: rule.kind,
                        span,
                        query: comment.directive.query.clone(),
                        origin: Some(Origin {
                            comment: comment.ordinal,
                            anchor: comment.anchor,
                            text: comment.text.clone(),
                        }),
                    });
                }
            }
            Err(reason) => {
                log::debug!("Dropping annotation {:?}: {reason}", preview(&comment.text, 60));
                normalized.unresolved.push(Unresolved {
                    comment: comment.ordinal,
                    anchor: comment.anchor,
                    text: comment.text.clone(),
                });
            }
        }
    }
    normalized
}

/// Extracts and resolves the annotations of one raw code block.
pub fn parse_annotations(raw: &str, lang: Option<&str>, rules: &AnnotationRules) -> ParsedCode {
    let extraction = extract_comments(raw, lang, rules);
    let normalized = normalize_annotations(&extraction.comments, &extraction.code, rules);
    ParsedCode {
        code: extraction.code,
        annotations: normalized.annotations,
        unresolved: normalized.unresolved,
    }
}
