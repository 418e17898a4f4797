//! Annotation comments: syntax, rules and target resolution.
//!
//! An annotation is written as a comment on its own line before the code it
//! decorates:
//!
//! ```text
//! // !tooltip[/a/] the variable
//! const a = 1
//! ```
//!
//! [`parse_annotations`] removes such comments from the code and resolves
//! each one to byte ranges of what remains.

pub mod directive;
pub mod extract;
pub mod normalize;
pub mod rules;
pub mod types;

pub use directive::{Directive, Selector, parse_directive};
pub use extract::{Extraction, RawComment, extract_comments};
pub use normalize::{Normalized, ParsedCode, Unresolvable, normalize_annotations, parse_annotations};
pub use rules::{AnnotationRule, AnnotationRules, CommentStyle, MdastMark, RuleSource, TargetRule};
pub use types::{Annotation, AnnotationKind, Origin, Unresolved, mark_indices};
