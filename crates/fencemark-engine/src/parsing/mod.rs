pub mod cursor;
pub mod fence;
pub mod info;
pub mod mdx;
pub mod rope;

pub use fence::{CodeFence, FenceKind, FenceNode, FenceStyle};
pub use info::{FenceInfo, MetaWord};
pub use mdx::{ContentNode, MdxDocument, parse_mdx};
