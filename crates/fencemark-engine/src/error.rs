use crate::parsing::rope::Span;

/// One side of a nesting conflict: the annotation's name and its range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSpan {
    pub name: String,
    pub span: Span,
}

impl std::fmt::Display for NamedSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}, {})", self.name, self.span.start, self.span.end)
    }
}

/// Errors raised while aligning tokens and annotations of one code block.
///
/// Unresolvable annotation targets are not errors; they are dropped by the
/// parser and kept aside as unresolved comments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnotationError {
    #[error("Malformed nesting: {first} partially overlaps {second}")]
    MalformedNesting { first: NamedSpan, second: NamedSpan },
    #[error("Offset {offset} is outside the code (length {len})")]
    OffsetOutOfBounds { offset: usize, len: usize },
    #[error("Offset {offset} is not on a character boundary")]
    MisalignedOffset { offset: usize },
    #[error("Tokens do not tile the code: expected offset {expected}, found {found}")]
    BrokenTiling { expected: usize, found: usize },
}

/// Serializing a code block did not reproduce its source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Round trip changed the fence at line {line}: expected {expected:?}, got {actual:?}")]
pub struct RoundTripMismatch {
    /// 1-based line within the fence where the texts first differ.
    pub line: usize,
    pub expected: String,
    pub actual: String,
}

impl RoundTripMismatch {
    /// Compares two fence texts, returning the first differing line.
    pub fn compare(expected: &str, actual: &str) -> Result<(), RoundTripMismatch> {
        if expected == actual {
            return Ok(());
        }
        let mut left = expected.split('\n');
        let mut right = actual.split('\n');
        let mut line = 1;
        loop {
            match (left.next(), right.next()) {
                (Some(a), Some(b)) if a == b => line += 1,
                (a, b) => {
                    return Err(RoundTripMismatch {
                        line,
                        expected: a.unwrap_or_default().to_string(),
                        actual: b.unwrap_or_default().to_string(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_nesting_names_both_ranges() {
        let err = AnnotationError::MalformedNesting {
            first: NamedSpan {
                name: "strong".into(),
                span: Span::new(0, 4),
            },
            second: NamedSpan {
                name: "emphasis".into(),
                span: Span::new(2, 6),
            },
        };
        assert_eq!(
            err.to_string(),
            "Malformed nesting: strong [0, 4) partially overlaps emphasis [2, 6)"
        );
    }

    #[test]
    fn compare_reports_first_difference() {
        assert!(RoundTripMismatch::compare("a\nb", "a\nb").is_ok());
        let err = RoundTripMismatch::compare("a\nb\nc", "a\nx\nc").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.expected, "b");
        assert_eq!(err.actual, "x");
        let err = RoundTripMismatch::compare("a", "a\nextra").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.expected, "");
        assert_eq!(err.actual, "extra");
    }
}
