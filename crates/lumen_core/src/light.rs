//! Point lights.

use lumen_math::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// A point light.
///
/// `position` is in world space until the render snapshot moves it into
/// camera space with [`Light::transformed`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
}

impl Light {
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self { position, color }
    }

    /// The same light expressed in the space of `matrix`.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            position: matrix.transform_point3(self.position),
            color: self.color,
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 5.0, 0.0), Vec3::ONE)
    }
}
