use xi_rope::Rope;

use super::span::Span;

/// A reference to a single line in the rope with its byte span.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// Byte span of this line in the rope (includes newline if present).
    pub span: Span,
    /// The line text as a string.
    pub text: String,
}

/// Returns an iterator over lines with their byte spans.
///
/// Uses `lines_raw` to preserve newline characters, which is important for
/// accurate span tracking.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).map(move |line| {
        let start = offset;
        let len = line.len();
        offset += len;
        LineRef {
            span: Span { start, end: offset },
            text: line.into_owned(),
        }
    })
}

/// Line table over a normalized code string.
///
/// Lines are separated by `\n`; a code string with `n` newlines has `n + 1`
/// lines, so an empty string has one empty line and a trailing newline opens
/// a final empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(code: &str) -> Self {
        let rope = Rope::from(code);
        let mut starts = vec![0];
        for line in lines_with_spans(&rope) {
            if line.text.ends_with('\n') {
                starts.push(line.span.end);
            }
        }
        Self {
            starts,
            len: code.len(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Total length of the indexed code in bytes.
    pub fn code_len(&self) -> usize {
        self.len
    }

    pub fn line_start(&self, line: usize) -> usize {
        self.starts[line]
    }

    /// End of the line's content, excluding its newline.
    pub fn line_end(&self, line: usize) -> usize {
        match self.starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.len,
        }
    }

    /// End of the line including its newline (start of the next line).
    pub fn line_end_with_newline(&self, line: usize) -> usize {
        self.starts.get(line + 1).copied().unwrap_or(self.len)
    }

    /// Content span of a line, without the newline.
    pub fn content_span(&self, line: usize) -> Span {
        Span::new(self.line_start(line), self.line_end(line))
    }

    /// Full span of a line, including the newline when there is one.
    pub fn full_span(&self, line: usize) -> Span {
        Span::new(self.line_start(line), self.line_end_with_newline(line))
    }

    /// Span covering whole lines `first..=last`, newline of `last` included.
    pub fn lines_span(&self, first: usize, last: usize) -> Span {
        Span::new(self.line_start(first), self.line_end_with_newline(last))
    }

    /// Index of the line containing `offset`. Offsets at the end of the code
    /// belong to the last line.
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset) - 1
    }

    /// First and last line touched by a span.
    ///
    /// An empty span touches only the line of its start.
    pub fn lines_of(&self, span: Span) -> (usize, usize) {
        let first = self.line_of(span.start);
        let last = if span.end > span.start {
            self.line_of(span.end - 1)
        } else {
            first
        };
        (first, last)
    }

    /// The text of a line without its newline.
    pub fn line_text<'a>(&self, code: &'a str, line: usize) -> &'a str {
        &code[self.line_start(line)..self.line_end(line)]
    }
}
