//! Recording renderer for tests, benches, and headless tools
//!
//! Tracks the attached set and counts traffic so callers can assert on the
//! scene manager's bookkeeping: adds/removes per span, and whether any
//! duplicate submission or removal of an absent renderable ever happened.

use std::collections::HashSet;

use super::{Renderer, RenderableId};

/// In-memory renderer double
#[derive(Default)]
pub struct HeadlessRenderer {
    attached: HashSet<RenderableId>,
    adds: u32,
    removes: u32,
    duplicate_adds: u32,
    missing_removes: u32,
    hits: Vec<RenderableId>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a renderable is currently attached
    pub fn is_attached(&self, renderable: RenderableId) -> bool {
        self.attached.contains(&renderable)
    }

    /// Number of currently attached renderables
    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    /// Adds since the last `reset_counts`
    pub fn adds(&self) -> u32 {
        self.adds
    }

    /// Removes since the last `reset_counts`
    pub fn removes(&self) -> u32 {
        self.removes
    }

    /// Adds of already-attached renderables (should always stay 0)
    pub fn duplicate_adds(&self) -> u32 {
        self.duplicate_adds
    }

    /// Removes of renderables that were not attached (should always stay 0)
    pub fn missing_removes(&self) -> u32 {
        self.missing_removes
    }

    /// Clear the traffic counters, keeping the attached set
    pub fn reset_counts(&mut self) {
        self.adds = 0;
        self.removes = 0;
    }

    /// Script the hit list returned by `hit_test`
    ///
    /// The first entry stands in for the camera/view frame.
    pub fn set_hit_result(&mut self, hits: Vec<RenderableId>) {
        self.hits = hits;
    }
}

impl Renderer for HeadlessRenderer {
    fn add_to_scene(&mut self, renderable: RenderableId) {
        if self.attached.insert(renderable) {
            self.adds += 1;
        } else {
            self.duplicate_adds += 1;
        }
    }

    fn remove_from_scene(&mut self, renderable: RenderableId) {
        if self.attached.remove(&renderable) {
            self.removes += 1;
        } else {
            self.missing_removes += 1;
        }
    }

    fn hit_test(&self, _x: u32, _y: u32) -> Vec<RenderableId> {
        self.hits.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove_tracking() {
        let mut renderer = HeadlessRenderer::new();
        let r = RenderableId(7);

        renderer.add_to_scene(r);
        assert!(renderer.is_attached(r));
        assert_eq!(renderer.adds(), 1);

        renderer.remove_from_scene(r);
        assert!(!renderer.is_attached(r));
        assert_eq!(renderer.removes(), 1);
        assert_eq!(renderer.duplicate_adds(), 0);
        assert_eq!(renderer.missing_removes(), 0);
    }

    #[test]
    fn test_duplicate_add_flagged() {
        let mut renderer = HeadlessRenderer::new();
        let r = RenderableId(1);
        renderer.add_to_scene(r);
        renderer.add_to_scene(r);
        assert_eq!(renderer.adds(), 1);
        assert_eq!(renderer.duplicate_adds(), 1);
    }

    #[test]
    fn test_missing_remove_flagged() {
        let mut renderer = HeadlessRenderer::new();
        renderer.remove_from_scene(RenderableId(9));
        assert_eq!(renderer.removes(), 0);
        assert_eq!(renderer.missing_removes(), 1);
    }

    #[test]
    fn test_reset_counts_keeps_attached() {
        let mut renderer = HeadlessRenderer::new();
        renderer.add_to_scene(RenderableId(3));
        renderer.reset_counts();
        assert_eq!(renderer.adds(), 0);
        assert!(renderer.is_attached(RenderableId(3)));
    }

    #[test]
    fn test_scripted_hits() {
        let mut renderer = HeadlessRenderer::new();
        renderer.set_hit_result(vec![RenderableId(0), RenderableId(4)]);
        assert_eq!(renderer.hit_test(10, 20), vec![RenderableId(0), RenderableId(4)]);
    }
}
