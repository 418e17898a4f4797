//! Groups wrapper annotations into contiguous runs of lines.

use serde::Serialize;

use crate::annotations::{Annotation, AnnotationKind};
use crate::parsing::rope::LineIndex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrapperGroup {
    pub name: String,
    /// First line of the group, 0-based.
    pub first: usize,
    /// Last line of the group, inclusive.
    pub last: usize,
    /// Indices of the annotations merged into this group.
    pub annotations: Vec<usize>,
}

impl WrapperGroup {
    pub fn contains_line(&self, line: usize) -> bool {
        self.first <= line && line <= self.last
    }
}

/// Merges wrapper annotations of the same name whose line ranges overlap or
/// touch. Separated usages stay independent groups. Groups are ordered by
/// first line, then name.
pub fn group_wrappers(annotations: &[Annotation], index: &LineIndex) -> Vec<WrapperGroup> {
    let mut ranges: Vec<(&str, usize, usize, usize)> = annotations
        .iter()
        .enumerate()
        .filter(|(_, a)| a.kind == AnnotationKind::Wrapper)
        .map(|(i, a)| {
            let (first, last) = index.lines_of(a.span);
            (a.name.as_str(), first, last, i)
        })
        .collect();
    ranges.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

    let mut groups: Vec<WrapperGroup> = Vec::new();
    for (name, first, last, i) in ranges {
        match groups.last_mut() {
            Some(group) if group.name == name && first <= group.last + 1 => {
                group.last = group.last.max(last);
                group.annotations.push(i);
            }
            _ => groups.push(WrapperGroup {
                name: name.to_string(),
                first,
                last,
                annotations: vec![i],
            }),
        }
    }
    groups.sort_by(|a, b| (a.first, &a.name).cmp(&(b.first, &b.name)));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::rope::Span;
    use pretty_assertions::assert_eq;

    fn code() -> String {
        (1..=10).map(|n| format!("line {n}")).collect::<Vec<_>>().join("\n")
    }

    /// A wrapper over 1-based lines `first..=last`.
    fn wrapper(index: &LineIndex, name: &str, first: usize, last: usize) -> Annotation {
        Annotation::new(
            name,
            AnnotationKind::Wrapper,
            index.lines_span(first - 1, last - 1),
        )
    }

    fn lines(groups: &[WrapperGroup]) -> Vec<(usize, usize)> {
        groups.iter().map(|g| (g.first + 1, g.last + 1)).collect()
    }

    #[test]
    fn touching_ranges_merge() {
        let index = LineIndex::new(&code());
        let annotations = [wrapper(&index, "collapse", 2, 4), wrapper(&index, "collapse", 4, 6)];
        let groups = group_wrappers(&annotations, &index);
        assert_eq!(lines(&groups), vec![(2, 6)]);
        assert_eq!(groups[0].annotations, vec![0, 1]);
    }

    #[test]
    fn adjacent_ranges_merge() {
        let index = LineIndex::new(&code());
        let annotations = [wrapper(&index, "fold", 5, 7), wrapper(&index, "fold", 2, 4)];
        assert_eq!(lines(&group_wrappers(&annotations, &index)), vec![(2, 7)]);
    }

    #[test]
    fn gaps_make_independent_groups() {
        let index = LineIndex::new(&code());
        let annotations = [wrapper(&index, "fold", 1, 2), wrapper(&index, "fold", 4, 5)];
        assert_eq!(lines(&group_wrappers(&annotations, &index)), vec![(1, 2), (4, 5)]);
    }

    #[test]
    fn names_do_not_merge() {
        let index = LineIndex::new(&code());
        let annotations = [
            wrapper(&index, "fold", 1, 3),
            wrapper(&index, "collapse", 2, 4),
            Annotation::new("highlight", AnnotationKind::Block, Span::new(0, 5)),
        ];
        let groups = group_wrappers(&annotations, &index);
        assert_eq!(lines(&groups), vec![(1, 3), (2, 4)]);
        assert_eq!(groups[0].name, "fold");
    }

    #[test]
    fn contained_range_merges() {
        let index = LineIndex::new(&code());
        let annotations = [wrapper(&index, "fold", 1, 8), wrapper(&index, "fold", 3, 4)];
        assert_eq!(lines(&group_wrappers(&annotations, &index)), vec![(1, 8)]);
    }
}
