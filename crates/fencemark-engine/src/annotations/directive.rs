//! Syntax of annotation comments.
//!
//! ```text
//! <prefix> !<name><selector>? <query>?<suffix>?
//!
//! selector := "(" n ")" | "(" a ":" b ")"      line range, 1-based inclusive
//!           | "{" a "}" | "{" a "-" b "}"      character columns, 1-based inclusive
//!           | "[/" pattern "/" flags "]"       regex, flags `g` and `i`
//! ```

use crate::parsing::cursor::Cursor;

use super::rules::CommentStyle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// No selector: the anchor line, or the whole block.
    Default,
    Lines { first: usize, last: usize },
    Columns { first: usize, last: usize },
    Regex {
        pattern: String,
        global: bool,
        case_insensitive: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Name as written; may be an alias.
    pub name: String,
    pub selector: Selector,
    pub query: Option<String>,
}

/// Parses one line as an annotation comment. Syntax only: whether the name
/// belongs to a rule is decided by the caller.
pub fn parse_directive(line: &str, style: &CommentStyle) -> Option<Directive> {
    let mut line = line.trim();
    if let Some(suffix) = &style.suffix {
        line = line.strip_suffix(suffix.as_str())?.trim_end();
    }

    let mut cur = Cursor::new(line);
    if !cur.eat_str(&style.prefix) {
        return None;
    }
    cur.skip_blanks();
    if !cur.eat(b'!') {
        return None;
    }
    let name = cur.take_while(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if name.is_empty() {
        return None;
    }

    let selector = match cur.peek() {
        Some(b'(') => parse_lines(&mut cur)?,
        Some(b'{') => parse_columns(&mut cur)?,
        Some(b'[') => parse_regex(&mut cur)?,
        _ => Selector::Default,
    };

    if !cur.eof() && !matches!(cur.peek(), Some(b' ' | b'\t')) {
        return None;
    }
    let query = cur.rest().trim();

    Some(Directive {
        name: name.to_string(),
        selector,
        query: (!query.is_empty()).then(|| query.to_string()),
    })
}

fn number(cur: &mut Cursor<'_>) -> Option<usize> {
    cur.skip_blanks();
    let digits = cur.take_while(|b| b.is_ascii_digit());
    let n = digits.parse().ok()?;
    cur.skip_blanks();
    Some(n)
}

fn parse_lines(cur: &mut Cursor<'_>) -> Option<Selector> {
    cur.eat(b'(');
    let a = number(cur)?;
    let selector = if cur.eat(b':') {
        Selector::Lines {
            first: a,
            last: number(cur)?,
        }
    } else {
        Selector::Lines { first: 1, last: a }
    };
    cur.eat(b')').then_some(selector)
}

fn parse_columns(cur: &mut Cursor<'_>) -> Option<Selector> {
    cur.eat(b'{');
    let a = number(cur)?;
    let last = if cur.eat(b'-') { number(cur)? } else { a };
    cur.eat(b'}')
        .then_some(Selector::Columns { first: a, last })
}

fn parse_regex(cur: &mut Cursor<'_>) -> Option<Selector> {
    if !cur.eat_str("[/") {
        return None;
    }
    let start = cur.i;
    loop {
        match cur.bump()? {
            b'\\' => {
                cur.bump()?;
            }
            b'/' => break,
            _ => {}
        }
    }
    let pattern = &cur.s[start..cur.i - 1];
    let flags = cur.take_while(|b| b.is_ascii_alphabetic());
    if !cur.eat(b']') || flags.bytes().any(|f| f != b'g' && f != b'i') {
        return None;
    }
    Some(Selector::Regex {
        pattern: pattern.to_string(),
        global: flags.contains('g'),
        case_insensitive: flags.contains('i'),
    })
}

impl Selector {
    /// Prints the selector the way [`parse_directive`] reads it.
    pub fn render(&self) -> String {
        match self {
            Selector::Default => String::new(),
            Selector::Lines { first, last } => format!("({first}:{last})"),
            Selector::Columns { first, last } if first == last => format!("{{{first}}}"),
            Selector::Columns { first, last } => format!("{{{first}-{last}}}"),
            Selector::Regex {
                pattern,
                global,
                case_insensitive,
            } => {
                let mut flags = String::new();
                if *global {
                    flags.push('g');
                }
                if *case_insensitive {
                    flags.push('i');
                }
                format!("[/{pattern}/{flags}]")
            }
        }
    }
}

impl Directive {
    /// Writes the directive as a comment line indented by `indent`.
    pub fn to_comment(&self, style: &CommentStyle, indent: &str) -> String {
        let mut out = format!(
            "{indent}{} !{}{}",
            style.prefix,
            self.name,
            self.selector.render()
        );
        if let Some(query) = &self.query {
            out.push(' ');
            out.push_str(query);
        }
        if let Some(suffix) = &style.suffix {
            out.push(' ');
            out.push_str(suffix);
        }
        out
    }
}
