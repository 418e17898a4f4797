//! Conversions between the stored fence text, the structured document and
//! the editor's node form.

pub mod document;
pub mod fence;
pub mod mdast;
pub mod roundtrip;

pub use document::CodeBlockDocument;
pub use fence::{from_code_block_document_to_code_fence, from_code_fence_to_code_block_document};
pub use mdast::{
    EditorAttrs, EditorCodeBlock, EditorNode, MarkNode, from_code_block_document_to_mdast,
    from_mdast_to_code_block_document,
};
pub use roundtrip::{check_round_trip, normalized_fence};
