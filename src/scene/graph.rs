//! Scene graph — the registry of visibility-tree nodes.
//!
//! The graph is an id-keyed arena with a flat root list. World/entity logic
//! owns its objects and holds `NodeId`s into the arena; looking up a removed
//! id simply yields nothing. Each update the manager asks the graph to
//! propagate world transforms and bounds before traversing.

use std::collections::HashMap;

use crate::core::types::{Mat4, Result};
use crate::core::error::Error;
use crate::math::{Aabb, Sphere};

use super::node::{LocalTransform, NodeId, SceneNode};

/// Registry of scene nodes with parent/child relationships.
pub struct SceneGraph {
    nodes: HashMap<NodeId, SceneNode>,
    roots: Vec<NodeId>,
    next_id: u64,
}

impl SceneGraph {
    /// Create an empty scene graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            roots: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a fresh node ID.
    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Insert a node at the root list. Returns the new node's ID.
    pub fn add_root(&mut self, node: SceneNode) -> NodeId {
        let id = self.alloc_id();
        self.nodes.insert(id, node);
        self.roots.push(id);
        id
    }

    /// Insert a node under `parent`. Returns the new node's ID.
    ///
    /// Fails if the parent is unknown or a leaf.
    pub fn add_child(&mut self, parent: NodeId, mut node: SceneNode) -> Result<NodeId> {
        let parent_node = self.nodes.get_mut(&parent).ok_or(Error::UnknownNode(parent))?;
        let children = parent_node
            .children_mut()
            .ok_or(Error::NotComposite(parent))?;

        let id = NodeId(self.next_id);
        self.next_id += 1;
        children.push(id);
        node.parent = Some(parent);
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Collect a subtree's ids, breadth-first, starting at `id`.
    pub(crate) fn collect_subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![id];
        let mut i = 0;
        while i < out.len() {
            if let Some(node) = self.nodes.get(&out[i]) {
                out.extend_from_slice(node.children());
            }
            i += 1;
        }
        out
    }

    /// Remove a node and its entire subtree from the arena.
    ///
    /// Renderer bookkeeping is the manager's job; it force-hides the subtree
    /// before calling this, which is why removal is crate-internal.
    pub(crate) fn remove(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };

        // Detach from parent or root list
        if let Some(parent_id) = node.parent {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                if let Some(children) = parent.children_mut() {
                    children.retain(|c| *c != id);
                }
            }
        } else {
            self.roots.retain(|r| *r != id);
        }

        for nid in self.collect_subtree(id) {
            self.nodes.remove(&nid);
        }
    }

    /// Remove every node.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }

    /// Get an immutable reference to a node.
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable reference to a node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// The root list, in registration order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Iterate over the children of a node.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .get(&id)
            .map(|n| n.children())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// Set the visibility flag of a node.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.visible = visible;
        }
    }

    /// Set the local transform of a node.
    pub fn set_transform(&mut self, id: NodeId, transform: LocalTransform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local_transform = transform;
        }
    }

    /// Total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Propagate world transforms and world bounds through every tree.
    ///
    /// Transforms compose parent-to-child; bounds roll up child-to-parent
    /// (a composite's bounds are the union of its children's).
    pub fn propagate(&mut self) {
        for root in self.roots.clone() {
            self.propagate_node(root, Mat4::IDENTITY);
        }
    }

    fn propagate_node(&mut self, id: NodeId, parent_world: Mat4) {
        let (local_mat, children, local_bounds) = {
            let node = match self.nodes.get(&id) {
                Some(n) => n,
                None => return,
            };
            (
                node.local_transform.to_mat4(),
                node.children().to_vec(),
                node.local_bounds(),
            )
        };

        let world = parent_world * local_mat;

        for &child in &children {
            self.propagate_node(child, world);
        }

        let (world_bounds, world_sphere) = match local_bounds {
            Some(bounds) => (
                bounds.transformed(&world),
                Sphere::enclosing(&bounds).transformed(&world),
            ),
            None => {
                let mut merged: Option<Aabb> = None;
                for child in &children {
                    if let Some(child_node) = self.nodes.get(child) {
                        merged = Some(match merged {
                            Some(m) => m.merged(&child_node.world_bounds),
                            None => child_node.world_bounds,
                        });
                    }
                }
                match merged {
                    Some(m) => (m, Sphere::enclosing(&m)),
                    None => {
                        // Empty composite: degenerate bounds at its origin
                        let origin = world.w_axis.truncate();
                        (Aabb { min: origin, max: origin }, Sphere::new(origin, 0.0))
                    }
                }
            }
        };

        if let Some(node) = self.nodes.get_mut(&id) {
            node.world_transform = world;
            node.world_bounds = world_bounds;
            node.world_sphere = world_sphere;
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;
    use crate::render::RenderableId;
    use crate::scene::node::LodEntry;

    fn unit_leaf(name: &str, renderable: u64) -> SceneNode {
        SceneNode::leaf(
            name,
            Aabb::from_center_half_extent(Vec3::ZERO, Vec3::splat(0.5)),
            vec![LodEntry::renderable(RenderableId(renderable))],
        )
    }

    #[test]
    fn test_new_graph_is_empty() {
        let graph = SceneGraph::new();
        assert_eq!(graph.node_count(), 0);
        assert!(graph.roots().is_empty());
    }

    #[test]
    fn test_add_root_and_child() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(SceneNode::composite("root"));
        let child = graph.add_child(root, unit_leaf("leaf", 1)).unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.roots(), &[root]);
        assert_eq!(graph.get(child).unwrap().parent, Some(root));
        assert!(graph.children(root).any(|c| c == child));
    }

    #[test]
    fn test_add_child_under_unknown_parent_fails() {
        let mut graph = SceneGraph::new();
        let err = graph.add_child(NodeId(42), SceneNode::composite("x"));
        assert!(matches!(err, Err(Error::UnknownNode(NodeId(42)))));
    }

    #[test]
    fn test_add_child_under_leaf_fails() {
        let mut graph = SceneGraph::new();
        let leaf = graph.add_root(unit_leaf("leaf", 1));
        let err = graph.add_child(leaf, SceneNode::composite("x"));
        assert!(matches!(err, Err(Error::NotComposite(_))));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_remove_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(SceneNode::composite("root"));
        let group = graph.add_child(root, SceneNode::composite("group")).unwrap();
        let a = graph.add_child(group, unit_leaf("a", 1)).unwrap();
        let b = graph.add_child(group, unit_leaf("b", 2)).unwrap();

        assert_eq!(graph.node_count(), 4);

        graph.remove(group);

        assert_eq!(graph.node_count(), 1);
        assert!(graph.get(group).is_none());
        assert!(graph.get(a).is_none());
        assert!(graph.get(b).is_none());
        assert_eq!(graph.children(root).count(), 0);
    }

    #[test]
    fn test_remove_root_updates_root_list() {
        let mut graph = SceneGraph::new();
        let a = graph.add_root(SceneNode::composite("a"));
        let b = graph.add_root(SceneNode::composite("b"));

        graph.remove(a);

        assert_eq!(graph.roots(), &[b]);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_collect_subtree_breadth_first() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(SceneNode::composite("root"));
        let a = graph.add_child(root, SceneNode::composite("a")).unwrap();
        let b = graph.add_child(root, SceneNode::composite("b")).unwrap();
        let c = graph.add_child(a, unit_leaf("c", 1)).unwrap();

        let subtree = graph.collect_subtree(root);
        assert_eq!(subtree, vec![root, a, b, c]);
    }

    #[test]
    fn test_set_visible() {
        let mut graph = SceneGraph::new();
        let id = graph.add_root(unit_leaf("leaf", 1));

        graph.set_visible(id, false);
        assert!(!graph.get(id).unwrap().visible);

        graph.set_visible(id, true);
        assert!(graph.get(id).unwrap().visible);
    }

    #[test]
    fn test_propagate_transform_composition() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(SceneNode::composite("root"));
        graph.set_transform(root, LocalTransform::from_position(Vec3::new(10.0, 0.0, 0.0)));

        let leaf = graph.add_child(root, unit_leaf("leaf", 1)).unwrap();
        graph.set_transform(leaf, LocalTransform::from_position(Vec3::new(5.0, 0.0, 0.0)));

        graph.propagate();

        let node = graph.get(leaf).unwrap();
        let world_pos = node.world_transform.transform_point3(Vec3::ZERO);
        assert!((world_pos - Vec3::new(15.0, 0.0, 0.0)).length() < 1e-4);
        assert!((node.world_sphere.center - Vec3::new(15.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_propagate_composite_bounds_union() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(SceneNode::composite("root"));

        let a = graph.add_child(root, unit_leaf("a", 1)).unwrap();
        graph.set_transform(a, LocalTransform::from_position(Vec3::new(-10.0, 0.0, 0.0)));
        let b = graph.add_child(root, unit_leaf("b", 2)).unwrap();
        graph.set_transform(b, LocalTransform::from_position(Vec3::new(10.0, 0.0, 0.0)));

        graph.propagate();

        let bounds = graph.get(root).unwrap().world_bounds;
        assert!((bounds.min - Vec3::new(-10.5, -0.5, -0.5)).length() < 1e-4);
        assert!((bounds.max - Vec3::new(10.5, 0.5, 0.5)).length() < 1e-4);

        // The union covers both leaves' bounds entirely
        for id in [a, b] {
            let leaf_bounds = graph.get(id).unwrap().world_bounds;
            assert_eq!(bounds.merged(&leaf_bounds), bounds);
        }
    }

    #[test]
    fn test_propagate_scale_grows_leaf_bounds() {
        let mut graph = SceneGraph::new();
        let leaf = graph.add_root(unit_leaf("leaf", 1));
        graph.set_transform(
            leaf,
            LocalTransform {
                scale: 4.0,
                ..Default::default()
            },
        );

        graph.propagate();

        let node = graph.get(leaf).unwrap();
        assert!((node.world_bounds.size() - Vec3::splat(4.0)).length() < 1e-4);
        assert!((node.world_sphere.radius - 4.0 * 0.75_f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_propagate_empty_composite_degenerate_bounds() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(SceneNode::composite("root"));
        graph.set_transform(root, LocalTransform::from_position(Vec3::new(3.0, 0.0, 0.0)));

        graph.propagate();

        let node = graph.get(root).unwrap();
        assert_eq!(node.world_sphere.radius, 0.0);
        assert!((node.world_sphere.center - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5);
    }
}
