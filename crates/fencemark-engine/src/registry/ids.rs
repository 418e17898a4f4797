use std::sync::Arc;

use uuid::Uuid;

use crate::parsing::mdx::{ContentNode, MdxDocument};

/// Meta attribute holding a block's stable identity.
pub const BLOCK_ID_ATTR: &str = "id";

/// Gives every fence without an `id=` attribute a fresh UUID v4, written into
/// its info string. Returns the number of fences changed.
pub fn assign_block_ids(document: &mut MdxDocument) -> usize {
    let mut assigned = 0;
    for node in &mut document.nodes {
        let ContentNode::Fence(fence) = node else {
            continue;
        };
        if fence.info.attr(BLOCK_ID_ATTR).is_some() {
            continue;
        }
        let id = Uuid::new_v4().to_string();
        let fence = Arc::make_mut(fence);
        fence.info = fence.info.with_attr(BLOCK_ID_ATTR, &id);
        log::debug!("Assigned block id {id}");
        assigned += 1;
    }
    assigned
}
