//! Point-of-view source for the frustum calculator
//!
//! The scene manager consumes a plain local-to-world matrix; this type is a
//! convenience for building one from a position and rotation. The view
//! direction is the +Z axis of the transform, matching the frustum corner
//! layout in [`crate::scene::frustum`].

use crate::core::types::{Vec3, Mat3, Mat4, Quat};

/// Camera pose with position and rotation
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    /// World position
    pub position: Vec3,
    /// Rotation as quaternion
    pub rotation: Quat,
}

impl Camera {
    /// Create a camera at a position with identity rotation (looking down +Z)
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Create a camera looking at a target
    pub fn look_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - position).normalize();
        let right = up.cross(forward).normalize();
        let up = forward.cross(right);

        let rotation = Quat::from_mat3(&Mat3::from_cols(right, up, forward));

        Self { position, rotation }
    }

    /// Local-to-world transform, suitable for `set_point_of_view`
    pub fn world_transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    /// Get view direction (positive Z in camera space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Get right direction (positive X in camera space)
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get up direction (positive Y in camera space)
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
