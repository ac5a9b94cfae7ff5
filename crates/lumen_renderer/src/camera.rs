//! Camera ray generation.
//!
//! Rays are generated in camera space: the eye sits at the origin looking
//! down +Z, and pixel (0, 0) maps to the bottom-left of the image plane.

use lumen_core::{Projection, RenderParameters};
use lumen_math::{Ray, Vec3};

/// Maps pixel coordinates to primary rays.
#[derive(Debug, Clone, Copy)]
pub struct PixelCamera {
    pub image_width: u32,
    pub image_height: u32,
    /// Full field of view in radians
    fov: f32,
    projection: Projection,
}

impl PixelCamera {
    /// Create a perspective camera with a 60 degree field of view.
    pub fn new(image_width: u32, image_height: u32) -> Self {
        Self {
            image_width,
            image_height,
            fov: 60.0_f32.to_radians(),
            projection: Projection::Perspective,
        }
    }

    /// Camera matching the render parameters.
    pub fn from_params(image_width: u32, image_height: u32, params: &RenderParameters) -> Self {
        Self::new(image_width, image_height)
            .with_fov(params.fov)
            .with_projection(params.projection)
    }

    /// Set the field of view (radians).
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    /// Set the projection mode.
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Width over height.
    pub fn aspect(&self) -> f32 {
        self.image_width as f32 / self.image_height as f32
    }

    /// Generate the primary ray through pixel (x, y).
    pub fn ray(&self, x: u32, y: u32) -> Ray {
        let width = self.image_width as f32;
        let height = self.image_height as f32;
        let aspect = width / height;

        let ndc_x = (x as f32 / width - 0.5) * 2.0;
        let ndc_y = (y as f32 / height - 0.5) * 2.0;

        match self.projection {
            Projection::Perspective => {
                let tan_half_fov = (self.fov / 2.0).tan();
                let dir = Vec3::new(ndc_x * aspect * tan_half_fov, ndc_y * tan_half_fov, 1.0);
                Ray::primary(Vec3::ZERO, dir)
            }
            Projection::Orthographic => {
                // Stretch the shorter axis so square pixels stay square.
                let (px, py) = if aspect > 1.0 {
                    (ndc_x * aspect, ndc_y)
                } else if aspect < 1.0 {
                    (ndc_x, ndc_y / aspect)
                } else {
                    (ndc_x, ndc_y)
                };
                Ray::primary(Vec3::new(px, py, 0.0), Vec3::Z)
            }
        }
    }
}
