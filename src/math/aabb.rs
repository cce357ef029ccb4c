//! Axis-aligned bounding box

use crate::core::types::{Vec3, Mat4};

/// Corner selection table: for corner `i`, whether to take min (0) or max (1)
/// per component. The ordering is a fixed geometric convention shared with
/// the frustum plane tables.
pub const CORNER_MAP: [[usize; 3]; 8] = [
    [0, 0, 0],
    [0, 0, 1],
    [0, 1, 0],
    [1, 0, 0],
    [0, 1, 1],
    [1, 0, 1],
    [1, 1, 0],
    [1, 1, 1],
];

/// Axis-aligned bounding box defined by min and max corners
///
/// Invariant: min <= max componentwise.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(
            min.x <= max.x && min.y <= max.y && min.z <= max.z,
            "inverted AABB corners"
        );
        Self { min, max }
    }

    /// Create AABB from center and half-extents
    pub fn from_center_half_extent(center: Vec3, half_extent: Vec3) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Get center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get size (max - min)
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Get half-extents
    pub fn half_extent(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// Get corner `index` (0-7) per [`CORNER_MAP`]
    pub fn corner(&self, index: usize) -> Vec3 {
        let ends = [self.min, self.max];
        let map = CORNER_MAP[index];
        Vec3::new(ends[map[0]].x, ends[map[1]].y, ends[map[2]].z)
    }

    /// Check if point is inside AABB
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y &&
        p.z >= self.min.z && p.z <= self.max.z
    }

    /// Expand AABB to include point
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Return merged AABB containing both
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Transform all 8 corners and return their world-space AABB
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        let first = matrix.transform_point3(self.corner(0));
        let mut out = Aabb { min: first, max: first };
        for i in 1..8 {
            out.expand(matrix.transform_point3(self.corner(i)));
        }
        out
    }
}
