//! Language flavors: which comment markers and keywords a fence language uses.
//!
//! The lexer itself is language-agnostic. A flavor only decides how comment
//! runs are merged and which identifiers are promoted to keywords.

/// Comment syntax family of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// `//` and `/* */` comments (JavaScript, TypeScript, Rust, Go, C, Java...).
    CLike,
    /// `#` comments (Python, shell, Ruby, YAML, TOML...).
    Hash,
    /// `--` comments (SQL, Lua, Haskell).
    Dash,
    /// `<!-- -->` comments (HTML, XML, Markdown).
    Markup,
    /// `/* */` comments only (CSS and friends).
    Css,
}

const CLIKE_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "case", "catch", "class", "const", "continue", "crate",
    "default", "defer", "do", "dyn", "else", "enum", "export", "extends", "false", "fn", "for",
    "from", "func", "function", "go", "if", "impl", "implements", "import", "in", "interface",
    "let", "loop", "match", "mod", "move", "mut", "new", "null", "package", "pub", "return",
    "self", "Self", "static", "struct", "super", "switch", "this", "throw", "trait", "true", "try",
    "type", "typeof", "undefined", "unsafe", "use", "var", "void", "where", "while", "yield",
];

const HASH_KEYWORDS: &[&str] = &[
    "and", "as", "begin", "class", "def", "del", "do", "done", "elif", "else", "end", "esac",
    "except", "export", "False", "fi", "finally", "for", "from", "function", "if", "import", "in",
    "lambda", "local", "module", "None", "not", "or", "pass", "raise", "return", "then", "True",
    "try", "unless", "while", "with", "yield",
];

const DASH_KEYWORDS: &[&str] = &[
    "and", "as", "by", "create", "delete", "do", "else", "end", "from", "function", "group",
    "having", "if", "in", "insert", "into", "join", "left", "local", "not", "null", "on", "or",
    "order", "return", "select", "set", "table", "then", "update", "values", "where", "while",
];

impl Flavor {
    /// Picks the flavor for a fence language tag. Unknown tags are C-like.
    pub fn for_language(lang: &str) -> Self {
        match lang.to_ascii_lowercase().as_str() {
            "py" | "python" | "sh" | "bash" | "zsh" | "shell" | "console" | "rb" | "ruby"
            | "yaml" | "yml" | "toml" | "r" | "perl" | "dockerfile" | "make" | "makefile"
            | "nix" | "ini" => Flavor::Hash,
            "sql" | "lua" | "hs" | "haskell" | "elm" => Flavor::Dash,
            "html" | "xml" | "svg" | "md" | "mdx" | "markdown" | "vue" => Flavor::Markup,
            "css" | "scss" | "less" => Flavor::Css,
            _ => Flavor::CLike,
        }
    }

    /// Prefix that starts a comment running to the end of the line.
    pub fn line_comment(self) -> Option<&'static str> {
        match self {
            Flavor::CLike => Some("//"),
            Flavor::Hash => Some("#"),
            Flavor::Dash => Some("--"),
            Flavor::Markup | Flavor::Css => None,
        }
    }

    /// Open/close delimiters of a block comment.
    pub fn block_comment(self) -> Option<(&'static str, &'static str)> {
        match self {
            Flavor::CLike | Flavor::Css => Some(("/*", "*/")),
            Flavor::Markup => Some(("<!--", "-->")),
            Flavor::Hash | Flavor::Dash => None,
        }
    }

    /// Whether `word` is a reserved word in this flavor.
    pub fn is_keyword(self, word: &str) -> bool {
        match self {
            Flavor::CLike => CLIKE_KEYWORDS.contains(&word),
            Flavor::Hash => HASH_KEYWORDS.contains(&word),
            // SQL keywords are case-insensitive.
            Flavor::Dash => DASH_KEYWORDS.contains(&word.to_ascii_lowercase().as_str()),
            Flavor::Markup | Flavor::Css => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("rust", Flavor::CLike)]
    #[case("TypeScript", Flavor::CLike)]
    #[case("python", Flavor::Hash)]
    #[case("Bash", Flavor::Hash)]
    #[case("sql", Flavor::Dash)]
    #[case("html", Flavor::Markup)]
    #[case("css", Flavor::Css)]
    #[case("", Flavor::CLike)]
    fn language_to_flavor(#[case] lang: &str, #[case] expected: Flavor) {
        assert_eq!(Flavor::for_language(lang), expected);
    }

    #[test]
    fn sql_keywords_ignore_case() {
        assert!(Flavor::Dash.is_keyword("SELECT"));
        assert!(Flavor::Dash.is_keyword("select"));
        assert!(!Flavor::CLike.is_keyword("SELECT"));
    }

    #[test]
    fn markup_has_only_block_comments() {
        assert_eq!(Flavor::Markup.line_comment(), None);
        assert_eq!(Flavor::Markup.block_comment(), Some(("<!--", "-->")));
    }
}
