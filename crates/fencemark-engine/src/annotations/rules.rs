//! The annotation configuration contract.
//!
//! Rules are data, not code: a new decoration is added by appending an
//! [`AnnotationRule`], never by touching the pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::AnnotationKind;

/// Which editor-native representation a rule maps to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleSource {
    /// A native markdown mark node (strong, emphasis, delete).
    Mdast,
    /// An MDX JSX text element named after the rule.
    #[default]
    MdxText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MdastMark {
    Strong,
    Emphasis,
    Delete,
}

/// How a directive's selector is scoped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetRule {
    /// Relative to the code line following the comment.
    #[default]
    NextLine,
    /// Relative to the whole code block.
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRule {
    pub name: String,
    pub kind: AnnotationKind,
    #[serde(default)]
    pub source: RuleSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<MdastMark>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub target: TargetRule,
}

impl AnnotationRule {
    pub fn new(name: &str, kind: AnnotationKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            source: RuleSource::MdxText,
            node: None,
            aliases: vec![],
            target: TargetRule::NextLine,
        }
    }

    /// A mark rule stored as a native markdown node.
    pub fn mdast(name: &str, node: MdastMark, alias: &str) -> Self {
        Self {
            source: RuleSource::Mdast,
            node: Some(node),
            aliases: vec![alias.to_string()],
            ..Self::new(name, AnnotationKind::Mark)
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|alias| alias == name)
    }
}

/// Comment delimiters used to write annotations in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentStyle {
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl CommentStyle {
    pub fn line(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            suffix: None,
        }
    }

    pub fn wrapped(prefix: &str, suffix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            suffix: Some(suffix.to_string()),
        }
    }
}

impl Default for CommentStyle {
    fn default() -> Self {
        Self::line("//")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationRules {
    pub rules: Vec<AnnotationRule>,
    /// Comment style per language tag.
    pub comments: BTreeMap<String, CommentStyle>,
    pub default_comment: CommentStyle,
}

impl AnnotationRules {
    /// The first rule whose name or alias matches.
    pub fn find(&self, name: &str) -> Option<&AnnotationRule> {
        self.rules.iter().find(|rule| rule.matches(name))
    }

    pub fn comment_style(&self, lang: Option<&str>) -> &CommentStyle {
        lang.and_then(|lang| self.comments.get(&lang.to_ascii_lowercase()))
            .unwrap_or(&self.default_comment)
    }
}

impl Default for AnnotationRules {
    fn default() -> Self {
        use AnnotationKind::*;

        let rules = vec![
            AnnotationRule::new("mark", Mark),
            AnnotationRule::mdast("strong", MdastMark::Strong, "bold"),
            AnnotationRule::mdast("emphasis", MdastMark::Emphasis, "italic"),
            AnnotationRule::mdast("delete", MdastMark::Delete, "strike"),
            AnnotationRule::new("tooltip", Inline),
            AnnotationRule::new("link", Inline),
            AnnotationRule::new("callout", Inline),
            AnnotationRule::new("highlight", Block),
            AnnotationRule::new("focus", Block),
            AnnotationRule::new("diff", Block),
            AnnotationRule::new("collapse", Wrapper),
            AnnotationRule::new("fold", Wrapper),
        ];

        let mut comments = BTreeMap::new();
        for lang in [
            "python", "py", "sh", "bash", "shell", "zsh", "yaml", "yml", "toml", "ruby", "rb",
            "r", "perl", "dockerfile", "makefile",
        ] {
            comments.insert(lang.to_string(), CommentStyle::line("#"));
        }
        for lang in ["sql", "lua", "haskell", "hs", "elm"] {
            comments.insert(lang.to_string(), CommentStyle::line("--"));
        }
        for lang in ["html", "xml", "svg", "md", "mdx", "markdown"] {
            comments.insert(lang.to_string(), CommentStyle::wrapped("<!--", "-->"));
        }
        for lang in ["css", "scss", "less"] {
            comments.insert(lang.to_string(), CommentStyle::wrapped("/*", "*/"));
        }

        Self {
            rules,
            comments,
            default_comment: CommentStyle::default(),
        }
    }
}
