//! Scene node types
//!
//! Core types for the visibility tree: node IDs, transforms, LOD entries,
//! detail state, and the composite/leaf content variants.

use crate::core::types::{Vec3, Mat4, Quat};
use crate::math::{Aabb, Sphere};
use crate::render::RenderableId;

/// Unique identifier for a scene node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Local transform relative to the parent node.
#[derive(Clone, Debug)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl LocalTransform {
    /// Identity transform (no translation, rotation, or scaling).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a translation-only transform.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Convert to a 4x4 matrix.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation,
            self.position,
        )
    }
}

/// One level-of-detail representation of a leaf node.
///
/// Placeholder levels carry no renderable; selecting one hides the node for
/// the frame instead of submitting anything.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LodEntry {
    /// Renderer handle for this level, if the level has geometry.
    pub renderable: Option<RenderableId>,
    /// Detail floor marker. When the first entry of a list sets this, level
    /// selection starts at 1 instead of 0 for the node (or for its parent
    /// composite, via a single-level peek).
    pub detail_floor: bool,
}

impl LodEntry {
    /// A level with geometry.
    pub fn renderable(id: RenderableId) -> Self {
        Self {
            renderable: Some(id),
            detail_floor: false,
        }
    }

    /// A level without geometry.
    pub fn placeholder() -> Self {
        Self {
            renderable: None,
            detail_floor: false,
        }
    }

    /// Mark this entry as a detail floor.
    pub fn with_detail_floor(mut self) -> Self {
        self.detail_floor = true;
        self
    }
}

/// Renderer-submission state of a leaf node. Exactly one at any time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DetailState {
    /// Never visited, or reset after unregistration.
    #[default]
    Unattached,
    /// Forced hidden: nothing submitted to the renderer.
    Hidden,
    /// LOD `n` is attached. Invariant: `n < lods.len()` and the renderable
    /// at `n` has been submitted exactly once.
    Active(usize),
}

/// What a scene node contains.
#[derive(Clone, Debug)]
pub(crate) enum NodeContent {
    /// A grouping node whose detail decision recurses into children.
    Composite { children: Vec<NodeId> },

    /// A renderable object with an ordered list of detail levels.
    Leaf {
        /// Bounds in node-local space.
        bounds: Aabb,
        lods: Vec<LodEntry>,
        detail: DetailState,
    },
}

/// A single node in the visibility tree.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub local_transform: LocalTransform,
    /// Externally controlled visibility toggle. A false flag forces the
    /// whole subtree hidden on the next update.
    pub visible: bool,
    /// Cached world transform (recomputed during propagation).
    pub world_transform: Mat4,
    /// Cached world-space bounds, valid only while attached to a scene root.
    pub world_bounds: Aabb,
    /// Cached world-space bounding sphere, valid only while attached.
    pub world_sphere: Sphere,
    pub(crate) content: NodeContent,
}

impl SceneNode {
    fn new(name: impl Into<String>, content: NodeContent) -> Self {
        Self {
            name: name.into(),
            parent: None,
            local_transform: LocalTransform::identity(),
            visible: true,
            world_transform: Mat4::IDENTITY,
            world_bounds: Aabb::default(),
            world_sphere: Sphere::default(),
            content,
        }
    }

    /// Create a grouping node.
    pub fn composite(name: impl Into<String>) -> Self {
        Self::new(name, NodeContent::Composite { children: Vec::new() })
    }

    /// Create a renderable node with local bounds and an ordered LOD list
    /// (coarsest first).
    pub fn leaf(name: impl Into<String>, bounds: Aabb, lods: Vec<LodEntry>) -> Self {
        Self::new(
            name,
            NodeContent::Leaf {
                bounds,
                lods,
                detail: DetailState::Unattached,
            },
        )
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.content, NodeContent::Composite { .. })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.content, NodeContent::Leaf { .. })
    }

    /// Child ids (empty for leaves).
    pub fn children(&self) -> &[NodeId] {
        match &self.content {
            NodeContent::Composite { children } => children.as_slice(),
            NodeContent::Leaf { .. } => &[],
        }
    }

    /// LOD list (None for composites).
    pub fn lods(&self) -> Option<&[LodEntry]> {
        match &self.content {
            NodeContent::Leaf { lods, .. } => Some(lods),
            NodeContent::Composite { .. } => None,
        }
    }

    /// Bounds in node-local space (None for composites).
    pub fn local_bounds(&self) -> Option<Aabb> {
        match &self.content {
            NodeContent::Leaf { bounds, .. } => Some(*bounds),
            NodeContent::Composite { .. } => None,
        }
    }

    /// Current detail state (None for composites).
    pub fn detail_state(&self) -> Option<DetailState> {
        match &self.content {
            NodeContent::Leaf { detail, .. } => Some(*detail),
            NodeContent::Composite { .. } => None,
        }
    }

    pub(crate) fn set_detail_state(&mut self, state: DetailState) {
        if let NodeContent::Leaf { detail, .. } = &mut self.content {
            *detail = state;
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match &mut self.content {
            NodeContent::Composite { children } => Some(children),
            NodeContent::Leaf { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_equality() {
        let a = NodeId(1);
        let b = NodeId(1);
        let c = NodeId(2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_local_transform_identity() {
        let t = LocalTransform::identity();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.to_mat4(), Mat4::IDENTITY);
    }

    #[test]
    fn test_local_transform_to_mat4_with_scale() {
        let t = LocalTransform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::IDENTITY,
            scale: 2.0,
        };
        let m = t.to_mat4();
        let (scale, _, translation) = m.to_scale_rotation_translation();
        assert!((scale - Vec3::splat(2.0)).length() < 1e-5);
        assert!((translation - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_composite_node() {
        let node = SceneNode::composite("group");
        assert!(node.is_composite());
        assert!(!node.is_leaf());
        assert!(node.children().is_empty());
        assert!(node.lods().is_none());
        assert!(node.detail_state().is_none());
        assert!(node.visible);
    }

    #[test]
    fn test_leaf_node_starts_unattached() {
        let bounds = Aabb::from_center_half_extent(Vec3::ZERO, Vec3::splat(0.5));
        let node = SceneNode::leaf(
            "rock",
            bounds,
            vec![LodEntry::renderable(RenderableId(1))],
        );
        assert!(node.is_leaf());
        assert_eq!(node.detail_state(), Some(DetailState::Unattached));
        assert_eq!(node.lods().unwrap().len(), 1);
        assert_eq!(node.local_bounds(), Some(bounds));
    }

    #[test]
    fn test_lod_entry_constructors() {
        let with_geometry = LodEntry::renderable(RenderableId(5));
        assert_eq!(with_geometry.renderable, Some(RenderableId(5)));
        assert!(!with_geometry.detail_floor);

        let placeholder = LodEntry::placeholder();
        assert!(placeholder.renderable.is_none());

        let floored = LodEntry::renderable(RenderableId(6)).with_detail_floor();
        assert!(floored.detail_floor);
    }

    #[test]
    fn test_set_detail_state_ignored_on_composite() {
        let mut node = SceneNode::composite("group");
        node.set_detail_state(DetailState::Active(2));
        assert!(node.detail_state().is_none());
    }
}
