// Transform utilities for Mat4
//
// Extends glam::Mat4 with the normal matrix needed when moving shading
// normals into camera space. glam already provides transform_point3() and
// transform_vector3().

use glam::{Mat3, Mat4};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Matrix that maps surface normals: the inverse transpose of the
    /// upper 3x3 block.
    fn normal_matrix(&self) -> Mat3;
}

impl Mat4Ext for Mat4 {
    fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(*self).inverse().transpose()
    }
}
