use serde::{Deserialize, Serialize};

/// A byte range `[start, end)` into a text buffer.
///
/// Every annotation, token and tree node stores spans into the normalized
/// code string rather than copied offsets of its own, so the three coordinate
/// systems of the pipeline (source, tokens, annotation tree) share one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Whether `other` lies entirely inside this span.
    #[must_use]
    pub fn contains(self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether `offset` is inside `[start, end)`.
    #[must_use]
    pub fn contains_offset(self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Overlapping part of two spans, if they share at least one position.
    ///
    /// Empty spans intersect a span that contains their position.
    #[must_use]
    pub fn intersect(self, other: Span) -> Option<Span> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(Span { start, end })
    }

    /// Moves the span right by `delta` bytes.
    #[must_use]
    pub fn shift(self, delta: usize) -> Span {
        Span {
            start: self.start + delta,
            end: self.end + delta,
        }
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span {
            start: range.start,
            end: range.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_and_empty() {
        assert_eq!(Span::new(2, 5).len(), 3);
        assert!(Span::new(4, 4).is_empty());
        assert!(Span::new(5, 4).is_empty());
    }

    #[test]
    fn containment() {
        let outer = Span::new(0, 10);
        assert!(outer.contains(Span::new(0, 10)));
        assert!(outer.contains(Span::new(3, 3)));
        assert!(!outer.contains(Span::new(5, 11)));
        assert!(outer.contains_offset(9));
        assert!(!outer.contains_offset(10));
    }

    #[test]
    fn intersection() {
        assert_eq!(
            Span::new(0, 5).intersect(Span::new(3, 8)),
            Some(Span::new(3, 5))
        );
        assert_eq!(Span::new(0, 5).intersect(Span::new(5, 8)), Some(Span::new(5, 5)));
        assert_eq!(Span::new(0, 5).intersect(Span::new(6, 8)), None);
    }
}
