//! Lumen Renderer - CPU ray tracing.
//!
//! A Whitted-style ray tracer over a flat, camera-space triangle soup:
//! Blinn-Phong shading, hard shadows and recursive mirror reflections,
//! swept over the image in parallel by a restartable background render.

mod camera;
mod raytracer;
mod renderer;
mod scene;
mod shading;
mod tracer;
mod triangle;

pub use camera::PixelCamera;
pub use raytracer::{RenderError, RenderState, Raytracer};
pub use renderer::{
    clear_color, color_to_rgba, linear_from_srgb, linear_to_srgb, render_frame, render_rows,
    shade_pixel, FrameOutcome, ImageBuffer, Rgba,
};
pub use scene::{Collision, RaytraceScene, SurfaceHit};
pub use shading::{ambient_term, blinn_phong, blinn_phong_all, light_visible, shadowed_lighting, SHADOW_BIAS};
pub use tracer::{trace_and_shade, MIN_THROUGHPUT, REFLECTION_BIAS};
pub use triangle::{Triangle, INTERSECTION_EPSILON};

/// Linear RGB color.
pub type Color = lumen_math::Vec3;

/// Re-export common math types from lumen_math
pub use lumen_math::{Ray, RayKind, Vec3, Vec4};
