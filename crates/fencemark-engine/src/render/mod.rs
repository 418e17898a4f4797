//! Per-line rendering of the annotation tree.

pub mod config;
pub mod html;
pub mod lines;
pub mod render;
pub mod wrappers;

pub use config::RenderConfig;
pub use html::to_html;
pub use lines::{Line, split_tree_by_lines};
pub use render::{RenderedCode, RenderedLine, render_annotated_lines};
pub use wrappers::{WrapperGroup, group_wrappers};
