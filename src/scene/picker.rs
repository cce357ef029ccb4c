//! Viewport picking
//!
//! Maps a 2D viewport coordinate to the topmost scene node under it. The
//! renderer's hit test returns renderables along the pick ray, nearest
//! first, with the camera/view frame as the first entry; resolution walks
//! the rest of the list through the manager's back-reference table.

use std::collections::HashMap;

use crate::render::RenderableId;
use super::node::NodeId;

/// Resolve a hit list to the first scene node along the pick ray.
///
/// The first entry is skipped (it is the view frame itself, never a scene
/// node). Returns None for an empty list or when no entry resolves.
pub fn resolve(
    backrefs: &HashMap<RenderableId, NodeId>,
    hits: &[RenderableId],
) -> Option<NodeId> {
    hits.iter()
        .skip(1)
        .find_map(|renderable| backrefs.get(renderable).copied())
}
