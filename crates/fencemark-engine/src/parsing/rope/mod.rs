pub mod lines;
pub mod slice;
pub mod span;

pub use lines::{LineIndex, LineRef, lines_with_spans};
pub use slice::{preview, span_text};
pub use span::Span;
