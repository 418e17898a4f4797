//! The annotation tree: marks nested over highlighted tokens.

pub mod build;
pub mod cut;
pub mod node;

pub use build::{build_annotation_tree, nesting_order};
pub use cut::{cut_forest, split_forest, truncate_forest, wrap_inline};
pub use node::{TreeNode, Wrap, forest_leaves, forest_text};
