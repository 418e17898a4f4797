//! # fencemark-syntax
//!
//! A small, lossless lexical highlighter for fenced code blocks, built on
//! [Logos].
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## Why Not a Real Grammar?
//!
//! The annotation pipeline only needs *some* highlighter whose tokens tile the
//! code exactly; any highlighter can be plugged in through the engine's
//! `Highlighter` trait. This crate is the built-in one: fast, dependency-light
//! and good enough for blog snippets. It knows nothing about nesting or
//! semantics, only lexical classes.
//!
//! ## Module Structure
//!
//! ```text
//! fencemark-syntax/
//! ├── lib.rs             # This file - public API and integration tests
//! ├── highlight_kind.rs  # HighlightKind enum and its scope names
//! ├── flavor.rs          # Comment markers and keywords per language family
//! └── lexer.rs           # Logos tokenizer and comment merging
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use fencemark_syntax::{Flavor, HighlightKind, lex};
//!
//! let tokens = lex("# hi\nx = 1\n", Flavor::for_language("python"));
//! assert_eq!(tokens[0].kind, HighlightKind::COMMENT);
//! assert_eq!(tokens[0].text, "# hi");
//! ```

pub mod flavor;
pub mod highlight_kind;
pub mod lexer;

pub use flavor::Flavor;
pub use highlight_kind::HighlightKind;
pub use lexer::{Token, lex, lex_with_spans};
