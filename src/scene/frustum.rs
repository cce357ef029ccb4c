//! View frustum calculator
//!
//! Derives the six clip planes and eight corner vertices from the camera's
//! field of view, near/far distances, viewport size, and point-of-view
//! transform. Recomputation is driven by two dirty flags: a geometry flag
//! (resolution or perspective parameters changed, full rebuild) and a pose
//! flag (only the point-of-view transform changed, cheaper world-space
//! path). `refresh` is an idempotent no-op while both flags are clear.
//!
//! The view direction is the +Z axis of the point-of-view transform; the
//! local corners sit at z = near and z = near + far.

use crate::core::types::{Vec3, Mat4};
use crate::math::{Aabb, Plane, Sphere};

/// For each of the 6 faces, the three corner indices used to derive its
/// plane. Fixed geometric convention paired with the corner ordering below
/// and with [`crate::math::aabb::CORNER_MAP`].
pub const PLANE_CORNER_MAP: [[usize; 3]; 6] = [
    [0, 1, 5],
    [6, 2, 3],
    [3, 0, 4],
    [1, 2, 6],
    [0, 3, 2],
    [4, 5, 6],
];

/// Frustum calculator with dirty-flag recomputation.
pub struct ViewFrustum {
    width: f32,
    height: f32,
    /// Field of view in radians.
    fov: f32,
    near: f32,
    far: f32,
    /// Point-of-view local-to-world transform.
    pov: Mat4,
    /// Corners in view-local space: 4 at the near plane, 4 at the far end.
    local_corners: [Vec3; 8],
    /// Corners transformed into world space.
    world_corners: [Vec3; 8],
    /// Clip planes with normals facing the frustum interior.
    planes: [Plane; 6],
    /// Cross-section area of the view volume at unit distance.
    view_area_at_one: f32,
    geometry_dirty: bool,
    pose_dirty: bool,
    ready: bool,
}

impl ViewFrustum {
    pub fn new() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            fov: 0.0,
            near: 0.0,
            far: 0.0,
            pov: Mat4::IDENTITY,
            local_corners: [Vec3::ZERO; 8],
            world_corners: [Vec3::ZERO; 8],
            planes: [Plane::default(); 6],
            view_area_at_one: 0.0,
            geometry_dirty: true,
            pose_dirty: true,
            ready: false,
        }
    }

    /// Set the viewport resolution. Marks the geometry dirty.
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.width = width as f32;
        self.height = height as f32;
        self.geometry_dirty = true;
    }

    /// Set the perspective parameters. Marks the geometry dirty.
    pub fn set_perspective(&mut self, fov_degrees: f32, near: f32, far: f32) {
        self.fov = fov_degrees.to_radians();
        self.near = near;
        self.far = far;
        self.geometry_dirty = true;
    }

    /// Set the point-of-view transform. Calling this is the invalidation
    /// notification for camera movement; only the cheaper world-space
    /// recomputation runs on the next refresh.
    pub fn set_point_of_view(&mut self, pov: Mat4) {
        self.pov = pov;
        self.pose_dirty = true;
    }

    /// Whether a refresh has produced usable planes.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether the next refresh will recompute anything.
    pub fn is_dirty(&self) -> bool {
        self.geometry_dirty || self.pose_dirty
    }

    /// World position of the point of view.
    pub fn position(&self) -> Vec3 {
        self.pov.w_axis.truncate()
    }

    /// Recompute whatever the dirty flags call for. No-op when clean.
    pub fn refresh(&mut self) {
        if self.geometry_dirty {
            self.rebuild_geometry();
        }
        if self.pose_dirty && self.ready {
            self.rebuild_world();
        }
    }

    /// Rebuild the local corner layout and the unit-distance view area.
    fn rebuild_geometry(&mut self) {
        self.geometry_dirty = false;

        if self.height == 0.0 || self.near == 0.0 {
            // Not configured yet; stay unusable until both setters ran.
            return;
        }

        let half_h = self.near * (self.fov * 0.5).tan();
        let half_w = (self.width / self.height) * half_h;
        let far_z = self.near + self.far;
        let ratio = far_z / self.near;
        let (far_w, far_h) = (half_w * ratio, half_h * ratio);

        self.local_corners = [
            Vec3::new(half_w, half_h, self.near),
            Vec3::new(half_w, -half_h, self.near),
            Vec3::new(-half_w, -half_h, self.near),
            Vec3::new(-half_w, half_h, self.near),
            Vec3::new(far_w, far_h, far_z),
            Vec3::new(far_w, -far_h, far_z),
            Vec3::new(-far_w, -far_h, far_z),
            Vec3::new(-far_w, far_h, far_z),
        ];

        self.view_area_at_one = 4.0 * self.fov * self.fov;
        self.ready = true;
        self.pose_dirty = true;

        log::trace!(
            "frustum geometry rebuilt: fov={:.3}rad viewport={}x{} near={} far={}",
            self.fov,
            self.width,
            self.height,
            self.near,
            self.far
        );
    }

    /// Transform the corners into world space and rederive the planes.
    fn rebuild_world(&mut self) {
        self.pose_dirty = false;

        for (world, local) in self.world_corners.iter_mut().zip(&self.local_corners) {
            *world = self.pov.transform_point3(*local);
        }

        for (plane, map) in self.planes.iter_mut().zip(&PLANE_CORNER_MAP) {
            let a = self.world_corners[map[0]];
            let b = self.world_corners[map[1]];
            let c = self.world_corners[map[2]];

            let normal = (c - b).cross(a - b);
            let length = normal.length();
            debug_assert!(length > 0.0, "degenerate point-of-view transform");
            *plane = Plane::from_point_normal(a, normal / length);
        }
    }

    /// Test whether any part of a world-space box is inside the frustum.
    ///
    /// A box is rejected once all 8 of its corners fall behind a single
    /// plane.
    pub fn contains_box(&self, aabb: &Aabb) -> bool {
        for plane in &self.planes {
            let all_outside =
                (0..8).all(|i| plane.distance_to_point(aabb.corner(i)) < 0.0);
            if all_outside {
                return false;
            }
        }
        true
    }

    /// Approximate fraction of the view's solid angle covered by a sphere.
    ///
    /// The sphere's disc is projected onto the plane one unit in front of
    /// the camera and divided by the view's cross-section area there.
    pub fn projected_size(&self, sphere: &Sphere) -> f32 {
        let disc_area = std::f32::consts::PI * sphere.radius * sphere.radius;
        let dist_sq = sphere.center.distance_squared(self.position());
        disc_area / self.view_area_at_one / dist_sq
    }

    /// The world-space corner vertices (valid after a refresh).
    pub fn world_corners(&self) -> &[Vec3; 8] {
        &self.world_corners
    }
}

impl Default for ViewFrustum {
    fn default() -> Self {
        Self::new()
    }
}
