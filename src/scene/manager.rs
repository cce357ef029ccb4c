//! Scene manager — per-frame visibility and detail driver.
//!
//! Once per rendered frame, `update` refreshes the frustum, propagates
//! world transforms and bounds, and walks every registered tree deciding
//! per node whether it is visible and at which detail level. Renderer
//! submissions are tracked per leaf through `DetailState`, so a frame with
//! no changes produces zero renderer traffic.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::time::{CostWindow, Stopwatch};
use crate::core::types::{Mat4, Result};
use crate::render::{RenderableId, Renderer};

use super::frustum::ViewFrustum;
use super::graph::SceneGraph;
use super::lod::{self, LodConfig};
use super::node::{DetailState, NodeId, SceneNode};
use super::picker;

/// World sphere radii at or below this are treated as degenerate bounds;
/// the node makes no cull/LOD decision of its own.
const MIN_SPHERE_RADIUS: f32 = 0.001;

/// Number of update-cost samples in the rolling average.
const COST_WINDOW_SIZE: usize = 64;

/// Counters from the most recent `update`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct UpdateStats {
    pub nodes_visited: u32,
    /// Leaves holding an active renderer submission after the update.
    pub leaves_active: u32,
    pub culled_by_frustum: u32,
    pub culled_by_size: u32,
    pub renderer_adds: u32,
    pub renderer_removes: u32,
    /// Cost of the update itself, in seconds.
    pub update_cost_secs: f32,
    /// Rolling average update cost, in seconds.
    pub avg_update_cost_secs: f32,
}

/// Per-node traversal decision.
///
/// Roots enter with `Undecided` so every tree computes its own cull and
/// level; a composite's computed level propagates to its descendants, and
/// `Hide` propagates unconditionally.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Decision {
    Undecided,
    Hide,
    Level(usize),
}

/// Per-frame visibility and level-of-detail driver.
pub struct SceneManager {
    graph: SceneGraph,
    frustum: ViewFrustum,
    config: LodConfig,
    /// Soft frame allowance scaling both the cull floor and the LOD budget.
    seconds_allowed: f32,
    /// Weak association renderable -> node, maintained on add/remove and
    /// queried by picking.
    backrefs: HashMap<RenderableId, NodeId>,
    stopwatch: Stopwatch,
    cost_window: CostWindow,
    stats: UpdateStats,
    prev_render_time: f32,
}

impl SceneManager {
    /// Create a manager with default tuning.
    pub fn new() -> Self {
        Self {
            graph: SceneGraph::new(),
            frustum: ViewFrustum::new(),
            config: LodConfig::default(),
            seconds_allowed: 1.0,
            backrefs: HashMap::new(),
            stopwatch: Stopwatch::new(),
            cost_window: CostWindow::new(COST_WINDOW_SIZE),
            stats: UpdateStats::default(),
            prev_render_time: 0.0,
        }
    }

    /// Create a manager with explicit tuning. Fails on an invalid config.
    pub fn with_config(config: LodConfig) -> Result<Self> {
        config.validate()?;
        let mut manager = Self::new();
        manager.config = config;
        Ok(manager)
    }

    // --- Registration ---

    /// Register a node at the manager's root list. Returns its id.
    ///
    /// Subtrees are built underneath via `graph_mut().add_child`.
    pub fn register(&mut self, node: SceneNode) -> NodeId {
        let id = self.graph.add_root(node);
        log::debug!("registered root node {:?}", id);
        id
    }

    /// Fully detach a node (and its entire subtree), or every root for
    /// `None`: renderer submissions and back-references are removed first,
    /// then the nodes leave the registry. No dangling submissions remain.
    pub fn unregister(&mut self, node: Option<NodeId>, renderer: &mut dyn Renderer) {
        match node {
            Some(id) => {
                self.hide_subtree(id, renderer);
                self.graph.remove(id);
                log::debug!("unregistered node {:?}", id);
            }
            None => {
                for root in self.graph.roots().to_vec() {
                    self.hide_subtree(root, renderer);
                }
                self.graph.clear();
                log::debug!("unregistered all roots");
            }
        }
        debug_assert!(
            node.is_some() || self.backrefs.is_empty(),
            "back-references survived full unregistration"
        );
    }

    /// Set a node's visibility flag, consulted on the next update.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.graph.set_visible(id, visible);
    }

    // --- Camera/viewport state ---

    /// Set the viewport resolution.
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.frustum.set_resolution(width, height);
    }

    /// Set field of view (degrees) and near/far distances.
    pub fn set_perspective(&mut self, fov_degrees: f32, near: f32, far: f32) {
        self.frustum.set_perspective(fov_degrees, near, far);
    }

    /// Set the point-of-view transform. Calling this is the invalidation
    /// notification for camera movement.
    pub fn set_point_of_view(&mut self, pov: Mat4) {
        self.frustum.set_point_of_view(pov);
    }

    // --- Quality budget ---

    /// The soft frame allowance (1.0 by default).
    pub fn seconds_allowed(&self) -> f32 {
        self.seconds_allowed
    }

    /// Adjust the soft frame allowance. Higher values spend more detail.
    pub fn set_seconds_allowed(&mut self, seconds: f32) {
        debug_assert!(seconds > 0.0 && seconds.is_finite());
        self.seconds_allowed = seconds;
    }

    pub fn config(&self) -> &LodConfig {
        &self.config
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Counters from the most recent update.
    pub fn stats(&self) -> UpdateStats {
        self.stats
    }

    /// The previous frame's render time, as passed to the last update.
    pub fn previous_render_time(&self) -> f32 {
        self.prev_render_time
    }

    // --- Per-frame driver ---

    /// Run one visibility/detail pass. `elapsed` is the previous frame's
    /// render time in seconds.
    ///
    /// Never creates or destroys nodes; only detail states and renderer
    /// submissions change. A pass with no change to visibility, transforms,
    /// camera, or budget produces zero renderer calls.
    pub fn update(&mut self, elapsed: f32, renderer: &mut dyn Renderer) {
        self.stopwatch.start();
        self.prev_render_time = elapsed;
        self.stats = UpdateStats {
            avg_update_cost_secs: self.stats.avg_update_cost_secs,
            ..UpdateStats::default()
        };

        self.frustum.refresh();
        if !self.frustum.is_ready() {
            log::debug!("update skipped: frustum not configured");
            return;
        }

        self.graph.propagate();

        for root in self.graph.roots().to_vec() {
            self.visit(root, Decision::Undecided, renderer);
        }

        self.stopwatch.stop();
        let cost = self.stopwatch.elapsed_secs();
        self.cost_window.push(cost);
        self.stats.update_cost_secs = cost;
        self.stats.avg_update_cost_secs = self.cost_window.average();

        log::trace!(
            "update: visited={} active={} frustum_culled={} size_culled={} adds={} removes={}",
            self.stats.nodes_visited,
            self.stats.leaves_active,
            self.stats.culled_by_frustum,
            self.stats.culled_by_size,
            self.stats.renderer_adds,
            self.stats.renderer_removes,
        );
    }

    /// Map a viewport coordinate to the topmost scene node under it.
    pub fn pick(&self, renderer: &dyn Renderer, x: u32, y: u32) -> Option<NodeId> {
        picker::resolve(&self.backrefs, &renderer.hit_test(x, y))
    }

    // --- Traversal ---

    fn visit(&mut self, id: NodeId, decision: Decision, renderer: &mut dyn Renderer) {
        let Some(node) = self.graph.get(id) else {
            return;
        };
        self.stats.nodes_visited += 1;

        let is_leaf = node.is_leaf();
        let children = node.children().to_vec();
        let world_sphere = node.world_sphere;
        let world_bounds = node.world_bounds;

        let mut decision = decision;
        if !node.visible {
            decision = Decision::Hide;
        }

        if decision == Decision::Undecided && world_sphere.radius > MIN_SPHERE_RADIUS {
            if !self.frustum.contains_box(&world_bounds) {
                self.stats.culled_by_frustum += 1;
                decision = Decision::Hide;
            } else {
                let size = self.frustum.projected_size(&world_sphere);
                if size < self.seconds_allowed * self.config.min_projected_size {
                    self.stats.culled_by_size += 1;
                    decision = Decision::Hide;
                } else {
                    let budget = self.seconds_allowed * self.config.lod_power();
                    let floor = self.detail_floor(id);
                    decision =
                        Decision::Level(lod::select_level(size, budget, floor, &self.config));
                }
            }
        }

        match decision {
            Decision::Hide => {
                self.detach_leaf(id, DetailState::Hidden, renderer);
                for child in children {
                    self.visit(child, Decision::Hide, renderer);
                }
            }
            Decision::Level(level) if is_leaf => {
                self.apply_detail(id, level, renderer);
            }
            Decision::Undecided if is_leaf => {
                // Degenerate bounds: no decision, previous state stands.
            }
            propagated => {
                for child in children {
                    self.visit(child, propagated, renderer);
                }
            }
        }
    }

    /// Single-level peek for the detail floor: the node's own first LOD, or
    /// the first LOD of its first child that has any.
    fn detail_floor(&self, id: NodeId) -> bool {
        let Some(node) = self.graph.get(id) else {
            return false;
        };

        if let Some(lods) = node.lods() {
            if let Some(first) = lods.first() {
                return first.detail_floor;
            }
        }

        for &child in node.children() {
            if let Some(lods) = self.graph.get(child).and_then(|n| n.lods()) {
                if let Some(first) = lods.first() {
                    return first.detail_floor;
                }
            }
        }

        false
    }

    /// Switch a leaf to detail level `level`, clamped to its LOD list.
    fn apply_detail(&mut self, id: NodeId, level: usize, renderer: &mut dyn Renderer) {
        let Some(node) = self.graph.get(id) else {
            return;
        };
        let Some(lods) = node.lods() else {
            return;
        };
        if lods.is_empty() {
            return;
        }

        let level = level.min(lods.len() - 1);
        let current = node.detail_state().unwrap_or_default();

        if current == DetailState::Active(level) {
            // Unchanged since last frame: the common case, zero traffic.
            self.stats.leaves_active += 1;
            return;
        }

        let previous = match current {
            DetailState::Active(prev) => lods[prev].renderable,
            _ => None,
        };
        let entry = lods[level];

        if let Some(renderable) = previous {
            renderer.remove_from_scene(renderable);
            self.backrefs.remove(&renderable);
            self.stats.renderer_removes += 1;
        }

        if let Some(renderable) = entry.renderable {
            renderer.add_to_scene(renderable);
            self.backrefs.insert(renderable, id);
            self.stats.renderer_adds += 1;
            self.stats.leaves_active += 1;
            if let Some(node) = self.graph.get_mut(id) {
                node.set_detail_state(DetailState::Active(level));
            }
            log::trace!("node {:?} now at detail level {}", id, level);
        } else {
            // Placeholder level: nothing to submit.
            if let Some(node) = self.graph.get_mut(id) {
                node.set_detail_state(DetailState::Hidden);
            }
        }
    }

    /// Remove a leaf's renderer submission, if any, and set `state`.
    /// No-op for composites and for leaves with nothing attached.
    fn detach_leaf(&mut self, id: NodeId, state: DetailState, renderer: &mut dyn Renderer) {
        let Some(node) = self.graph.get(id) else {
            return;
        };
        let Some(current) = node.detail_state() else {
            return;
        };

        if let DetailState::Active(level) = current {
            let lods = node.lods().unwrap_or(&[]);
            debug_assert!(level < lods.len(), "active level out of range");
            let renderable = lods.get(level).and_then(|entry| entry.renderable);
            debug_assert!(renderable.is_some(), "active level without renderable");
            if let Some(renderable) = renderable {
                renderer.remove_from_scene(renderable);
                self.backrefs.remove(&renderable);
                self.stats.renderer_removes += 1;
            }
        }

        if let Some(node) = self.graph.get_mut(id) {
            node.set_detail_state(state);
        }
    }

    /// Force a subtree fully hidden, clearing every renderer submission.
    fn hide_subtree(&mut self, id: NodeId, renderer: &mut dyn Renderer) {
        let children = match self.graph.get(id) {
            Some(node) => node.children().to_vec(),
            None => return,
        };

        self.detach_leaf(id, DetailState::Hidden, renderer);
        for child in children {
            self.hide_subtree(child, renderer);
        }
    }
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}
