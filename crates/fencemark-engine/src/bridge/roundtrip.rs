use crate::annotations::{AnnotationRules, extract_comments};
use crate::error::RoundTripMismatch;
use crate::parsing::fence::FenceNode;

use super::fence::{from_code_block_document_to_code_fence, from_code_fence_to_code_block_document};

/// The fence as serialization writes it back: CRLF body lines become LF, and
/// when the code left after removing annotation comments is empty, its one
/// blank line is dropped.
pub fn normalized_fence(fence: &FenceNode, rules: &AnnotationRules) -> FenceNode {
    let mut lines: Vec<String> = fence
        .lines
        .iter()
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect();
    if extract_comments(&lines.join("\n"), fence.info.lang(), rules)
        .code
        .is_empty()
    {
        // Comment lines are never blank, so this drops only the code line.
        lines.retain(|line| !line.is_empty());
    }
    FenceNode {
        style: fence.style.clone(),
        info: fence.info.clone(),
        lines,
    }
}

/// Parses a fence into a document and serializes it back, reporting the
/// first line where the result differs from the normalized source.
pub fn check_round_trip(fence: &FenceNode, rules: &AnnotationRules) -> Result<(), RoundTripMismatch> {
    let document = from_code_fence_to_code_block_document(fence, rules);
    let written = from_code_block_document_to_code_fence(&document, rules);
    RoundTripMismatch::compare(
        &normalized_fence(fence, rules).to_markdown(),
        &written.to_markdown(),
    )
}
