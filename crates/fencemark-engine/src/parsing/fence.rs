//! The textual fenced-code-block form used by stored content.
//!
//! A [`FenceNode`] keeps every byte of the fence it was parsed from: marker
//! run, raw info string, body lines and the exact closing line. Parsing and
//! [`FenceNode::to_markdown`] are exact inverses.

use serde::{Deserialize, Serialize};

use super::info::FenceInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceSig {
    Backticks,
    Tildes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FenceKind {
    Backticks,
    Tildes,
}

impl FenceKind {
    pub fn marker_char(self) -> char {
        match self {
            FenceKind::Backticks => '`',
            FenceKind::Tildes => '~',
        }
    }
}

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";

    pub fn sig(remainder: &str) -> Option<FenceSig> {
        let t = remainder.trim_end_matches(['\r', '\n']);
        if t.starts_with(Self::BACKTICKS) {
            Some(FenceSig::Backticks)
        } else if t.starts_with(Self::TILDES) {
            Some(FenceSig::Tildes)
        } else {
            None
        }
    }

    pub fn kind(sig: FenceSig) -> FenceKind {
        match sig {
            FenceSig::Backticks => FenceKind::Backticks,
            FenceSig::Tildes => FenceKind::Tildes,
        }
    }

    /// Whether `line` closes a fence opened with `len` markers of `kind`.
    ///
    /// A closing line has up to three spaces of indentation, at least as many
    /// markers as the opener and nothing but whitespace after them.
    pub fn closes(kind: FenceKind, len: usize, line: &str) -> bool {
        let line = line.trim_end_matches(['\r', '\n', ' ', '\t']);
        let trimmed = line.trim_start_matches(' ');
        if line.len() - trimmed.len() > 3 {
            return false;
        }
        let marker = kind.marker_char();
        trimmed.len() >= len && trimmed.chars().all(|c| c == marker)
    }
}

/// Marker style of a fence plus its exact closing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FenceStyle {
    pub kind: FenceKind,
    /// Number of marker characters on the opening line.
    pub len: usize,
    /// Closing line as written; `None` for a fence left open at end of file.
    pub closing: Option<String>,
}

impl FenceStyle {
    pub fn backticks() -> Self {
        Self {
            kind: FenceKind::Backticks,
            len: 3,
            closing: Some(CodeFence::BACKTICKS.to_string()),
        }
    }

    /// The opening marker run, e.g. "````".
    pub fn marker(&self) -> String {
        std::iter::repeat_n(self.kind.marker_char(), self.len).collect()
    }
}

impl Default for FenceStyle {
    fn default() -> Self {
        Self::backticks()
    }
}

/// A fenced code block exactly as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FenceNode {
    pub style: FenceStyle,
    pub info: FenceInfo,
    /// Body lines without their `\n` (a `\r` of CRLF input stays in place).
    pub lines: Vec<String>,
}

impl FenceNode {
    /// Builds a fence around `body`. An empty body produces no body lines.
    pub fn new(style: FenceStyle, info: FenceInfo, body: &str) -> Self {
        let lines = if body.is_empty() {
            vec![]
        } else {
            body.split('\n').map(str::to_string).collect()
        };
        Self { style, info, lines }
    }

    /// Parses the exact text of a fence (without the line ending after the
    /// closing line). Returns `None` when `raw` does not open with a fence
    /// marker at column zero.
    pub fn parse(raw: &str) -> Option<Self> {
        let (first, rest) = match raw.split_once('\n') {
            Some((first, rest)) => (first, Some(rest)),
            None => (raw, None),
        };
        let kind = CodeFence::kind(CodeFence::sig(first)?);
        let marker = kind.marker_char();
        let len = first.chars().take_while(|&c| c == marker).count();
        let info = FenceInfo::parse(&first[len..]);

        let mut lines: Vec<String> = rest
            .map(|rest| rest.split('\n').map(str::to_string).collect())
            .unwrap_or_default();
        let closing = match lines.last() {
            Some(last) if CodeFence::closes(kind, len, last) => lines.pop(),
            _ => None,
        };

        Some(Self {
            style: FenceStyle { kind, len, closing },
            info,
            lines,
        })
    }

    /// Body text: lines joined with `\n`.
    pub fn body(&self) -> String {
        self.lines.join("\n")
    }

    /// Serializes the fence back to text. Inverse of [`FenceNode::parse`].
    pub fn to_markdown(&self) -> String {
        let mut out = self.style.marker();
        out.push_str(self.info.raw());
        for line in &self.lines {
            out.push('\n');
            out.push_str(line);
        }
        if let Some(closing) = &self.style.closing {
            out.push('\n');
            out.push_str(closing);
        }
        out
    }
}
