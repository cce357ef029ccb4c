//! Renderer collaborator interface
//!
//! The scene manager does not render anything itself; it submits and retracts
//! renderables against an external renderer's scene graph and queries its
//! hit-testing primitive for picking. This module defines that boundary.

pub mod headless;

pub use headless::HeadlessRenderer;

/// Opaque handle to a renderable owned by the renderer
///
/// The scene manager never interprets the value; it only passes handles back
/// to the renderer and keys its back-reference table with them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderableId(pub u64);

/// The mutable renderer scene graph consumed by the scene manager
///
/// Implementations are expected to treat duplicate adds and removes of absent
/// renderables as no-ops, but the scene manager never relies on that: its
/// detail-state bookkeeping guarantees each renderable is attached at most
/// once and removed only while attached.
pub trait Renderer {
    /// Attach a renderable to the active render set
    fn add_to_scene(&mut self, renderable: RenderableId);

    /// Detach a renderable from the active render set
    fn remove_from_scene(&mut self, renderable: RenderableId);

    /// Hit-test a viewport coordinate
    ///
    /// Returns renderables along the pick ray, nearest first. The first
    /// entry is the camera/view frame itself and carries no scene node.
    fn hit_test(&self, x: u32, y: u32) -> Vec<RenderableId>;
}
