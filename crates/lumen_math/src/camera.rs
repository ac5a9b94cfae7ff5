use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Viewpoint used to move the scene into camera space.
///
/// Camera space looks down +Z with +Y up, which is the frame the ray
/// generator shoots into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Camera {
    /// Create a new camera
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
        }
    }

    /// Get the view matrix (world → camera space, +Z forward)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_lh(self.position, self.target, self.up)
    }
}

impl Default for Camera {
    fn default() -> Self {
        // Identity view: eye at the origin looking down +Z.
        Self::new(Vec3::ZERO, Vec3::Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_view_is_identity() {
        let view = Camera::default().view_matrix();
        assert!(view.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_target_lands_on_positive_z() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let target = camera.view_matrix().transform_point3(Vec3::ZERO);

        assert!(target.x.abs() < 1e-5);
        assert!(target.y.abs() < 1e-5);
        assert!((target.z - 5.0).abs() < 1e-5);
    }
}
