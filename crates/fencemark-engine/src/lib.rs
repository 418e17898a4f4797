pub mod annotations;
pub mod bridge;
pub mod error;
pub mod highlight;
pub mod io;
pub mod parsing;
pub mod pipeline;
pub mod registry;
pub mod render;
pub mod snapshot;
pub mod tree;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use annotations::{Annotation, AnnotationKind, AnnotationRule, AnnotationRules, parse_annotations};
pub use bridge::*;
pub use error::{AnnotationError, RoundTripMismatch};
pub use highlight::{Highlighter, LexicalHighlighter, PlainHighlighter, Token};
pub use io::*;
pub use parsing::rope::Span;
pub use parsing::{FenceInfo, FenceNode, MdxDocument, parse_mdx};
pub use pipeline::*;
pub use registry::{LiveNodeRegistry, MicrotaskQueue, RegistrySnapshot, assign_block_ids};
pub use render::{RenderConfig, RenderedCode, to_html};
