//! Tokens from a highlighter, refined at annotation boundaries.

pub mod boundaries;
pub mod lexical;
pub mod token;

pub use boundaries::{BoundarySet, check_tiling, split_tokens_by_boundaries};
pub use lexical::{Highlighter, LexicalHighlighter, PlainHighlighter};
pub use token::{Token, plain_tokens};
