//! The info string of a fence: language, title and `key=value` attributes.

use serde::{Deserialize, Serialize};

/// One whitespace-separated word of the meta text, with its byte range in
/// the raw info string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaWord<'a> {
    pub key: Option<&'a str>,
    pub value: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Raw info string after a fence's opening marker.
///
/// The raw text is the only stored field so that the fence prints back
/// byte-for-byte; every accessor is computed from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FenceInfo {
    raw: String,
}

impl FenceInfo {
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
        }
    }

    /// Builds an info string from a language and meta text.
    pub fn from_parts(lang: Option<&str>, meta: &str) -> Self {
        let raw = match (lang, meta.is_empty()) {
            (Some(lang), true) => lang.to_string(),
            (Some(lang), false) => format!("{lang} {meta}"),
            (None, true) => String::new(),
            (None, false) => format!(" {meta}"),
        };
        Self { raw }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The language tag: the first word, unless it is a `key=value` pair.
    pub fn lang(&self) -> Option<&str> {
        let first = self.raw.split_whitespace().next()?;
        (!first.contains('=')).then_some(first)
    }

    /// Everything after the language tag, trimmed.
    pub fn meta(&self) -> &str {
        let trimmed = self.raw.trim();
        match self.lang() {
            Some(lang) => trimmed[lang.len()..].trim(),
            None => trimmed,
        }
    }

    /// Splits the meta text into words. Quoted values may contain spaces.
    pub fn words(&self) -> Vec<MetaWord<'_>> {
        let raw = self.raw.as_str();
        let meta = self.meta();
        if meta.is_empty() {
            return vec![];
        }
        // `meta` is a subslice of `raw`, so its offset is recoverable.
        let base = meta.as_ptr() as usize - raw.as_ptr() as usize;
        let bytes = meta.as_bytes();
        let mut words = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i >= bytes.len() {
                break;
            }
            let start = i;
            let mut key_end = None;
            let mut quoted = false;
            while i < bytes.len() {
                let b = bytes[i];
                if b == b'"' {
                    quoted = !quoted;
                } else if !quoted && b.is_ascii_whitespace() {
                    break;
                } else if !quoted && b == b'=' && key_end.is_none() {
                    key_end = Some(i);
                }
                i += 1;
            }
            let word = match key_end {
                Some(eq) => {
                    let value = &meta[eq + 1..i];
                    let value = value
                        .strip_prefix('"')
                        .and_then(|v| v.strip_suffix('"'))
                        .unwrap_or(value);
                    MetaWord {
                        key: Some(&meta[start..eq]),
                        value,
                        start: base + start,
                        end: base + i,
                    }
                }
                None => MetaWord {
                    key: None,
                    value: &meta[start..i],
                    start: base + start,
                    end: base + i,
                },
            };
            words.push(word);
        }
        words
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.words()
            .into_iter()
            .find(|w| w.key == Some(key))
            .map(|w| w.value)
    }

    /// The title: a `title=` attribute, or else the bare words joined.
    pub fn title(&self) -> Option<String> {
        if let Some(title) = self.attr("title") {
            return Some(title.to_string());
        }
        let bare: Vec<&str> = self
            .words()
            .into_iter()
            .filter(|w| w.key.is_none())
            .map(|w| w.value)
            .collect();
        (!bare.is_empty()).then(|| bare.join(" "))
    }

    /// Returns a copy with `key` set to `value`. An existing attribute is
    /// replaced in place; a new one is appended before trailing whitespace.
    pub fn with_attr(&self, key: &str, value: &str) -> Self {
        let rendered = if value.chars().any(char::is_whitespace) || value.is_empty() {
            format!("{key}=\"{value}\"")
        } else {
            format!("{key}={value}")
        };
        if let Some(word) = self.words().into_iter().find(|w| w.key == Some(key)) {
            let mut raw = self.raw.clone();
            raw.replace_range(word.start..word.end, &rendered);
            return Self { raw };
        }
        let content_end = self.raw.trim_end().len();
        let (content, tail) = self.raw.split_at(content_end);
        let raw = if content.trim().is_empty() {
            format!(" {rendered}{tail}")
        } else {
            format!("{content} {rendered}{tail}")
        };
        Self { raw }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("rust", Some("rust"), "")]
    #[case(" js  index.js ", Some("js"), "index.js")]
    #[case("", None, "")]
    #[case(" id=abc", None, "id=abc")]
    #[case("ts title=\"a b.ts\" id=1\r", Some("ts"), "title=\"a b.ts\" id=1")]
    fn lang_and_meta(#[case] raw: &str, #[case] lang: Option<&str>, #[case] meta: &str) {
        let info = FenceInfo::parse(raw);
        assert_eq!(info.lang(), lang);
        assert_eq!(info.meta(), meta);
    }

    #[test]
    fn attributes_and_title() {
        let info = FenceInfo::parse("ts title=\"a b.ts\" id=42 showLineNumbers");
        assert_eq!(info.attr("id"), Some("42"));
        assert_eq!(info.attr("title"), Some("a b.ts"));
        assert_eq!(info.attr("missing"), None);
        assert_eq!(info.title().as_deref(), Some("a b.ts"));
    }

    #[test]
    fn bare_words_form_the_title() {
        let info = FenceInfo::parse("js src/index.js id=1");
        assert_eq!(info.title().as_deref(), Some("src/index.js"));
        assert_eq!(FenceInfo::parse("js").title(), None);
    }

    #[test]
    fn with_attr_appends() {
        let info = FenceInfo::parse("js index.js\r").with_attr("id", "x1");
        assert_eq!(info.raw(), "js index.js id=x1\r");
        assert_eq!(info.lang(), Some("js"));
    }

    #[test]
    fn with_attr_on_empty_info_keeps_lang_empty() {
        let info = FenceInfo::parse("").with_attr("id", "x1");
        assert_eq!(info.raw(), " id=x1");
        assert_eq!(info.lang(), None);
        assert_eq!(info.attr("id"), Some("x1"));
    }

    #[test]
    fn with_attr_replaces_in_place() {
        let info = FenceInfo::parse("js id=old title=t").with_attr("id", "new");
        assert_eq!(info.raw(), "js id=new title=t");
    }

    #[test]
    fn from_parts() {
        assert_eq!(FenceInfo::from_parts(Some("py"), "").raw(), "py");
        assert_eq!(FenceInfo::from_parts(Some("py"), "a.py").raw(), "py a.py");
        assert_eq!(FenceInfo::from_parts(None, "").raw(), "");
    }
}
