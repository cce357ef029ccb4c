//! Bounding sphere

use crate::core::types::{Vec3, Mat4};
use super::aabb::Aabb;

/// Bounding sphere defined by center and radius
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Create a sphere (radius must be non-negative)
    pub fn new(center: Vec3, radius: f32) -> Self {
        debug_assert!(radius >= 0.0, "negative sphere radius");
        Self { center, radius }
    }

    /// Smallest sphere enclosing an AABB
    pub fn enclosing(aabb: &Aabb) -> Self {
        Self {
            center: aabb.center(),
            radius: aabb.half_extent().length(),
        }
    }

    /// Check if point is inside the sphere
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.center.distance_squared(p) <= self.radius * self.radius
    }

    /// Transform by a node-to-world matrix
    ///
    /// The radius is scaled by the largest axis scale, so non-uniform scale
    /// yields a conservative bound.
    pub fn transformed(&self, matrix: &Mat4) -> Sphere {
        let center = matrix.transform_point3(self.center);
        let scale = matrix.x_axis.truncate().length()
            .max(matrix.y_axis.truncate().length())
            .max(matrix.z_axis.truncate().length());
        Sphere {
            center,
            radius: self.radius * scale,
        }
    }
}
