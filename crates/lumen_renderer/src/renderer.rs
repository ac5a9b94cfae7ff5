//! Pixel sweep and output image.
//!
//! Implements:
//! - Per-pixel dispatch between the debug, local and reflective shading modes
//! - sRGB encoding of linear colors
//! - Row-parallel rendering with rayon and cooperative cancellation

use std::sync::atomic::{AtomicBool, Ordering};

use lumen_core::RenderParameters;
use lumen_math::{Interval, Vec4};
use rayon::prelude::*;

use crate::camera::PixelCamera;
use crate::scene::RaytraceScene;
use crate::shading::{ambient_term, blinn_phong, clamp_color, shadowed_lighting};
use crate::tracer::trace_and_shade;

/// An 8-bit RGBA pixel.
pub type Rgba = [u8; 4];

/// How a frame ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Every pixel was shaded.
    Completed,
    /// Cancellation was requested; some rows may still hold the clear color.
    Cancelled,
}

/// Encode a linear value in [0, 1] as an 8-bit sRGB value.
#[inline]
pub fn linear_to_srgb(value: f32) -> u8 {
    let encoded = if value < 0.003_130_8 {
        255.0 * 12.92 * value
    } else {
        255.0 * (1.055 * value.powf(1.0 / 2.4) - 0.055)
    };
    (encoded + 0.5) as u8
}

/// Decode an 8-bit sRGB value to linear.
#[inline]
pub fn linear_from_srgb(value: u8) -> f32 {
    let f = value as f32 / 255.0;
    if f < 0.040_45 {
        f / 12.92
    } else {
        ((f + 0.055) / 1.055).powf(2.4)
    }
}

/// Clamp a linear RGBA color and encode it. Alpha is stored linearly.
pub fn color_to_rgba(color: Vec4) -> Rgba {
    let c = color.truncate();
    let alpha = Interval::UNIT.clamp(color.w);
    [
        linear_to_srgb(Interval::UNIT.clamp(c.x)),
        linear_to_srgb(Interval::UNIT.clamp(c.y)),
        linear_to_srgb(Interval::UNIT.clamp(c.z)),
        (alpha * 255.0 + 0.5) as u8,
    ]
}

/// Encoded background color for a render.
pub fn clear_color(params: &RenderParameters) -> Rgba {
    color_to_rgba(params.background)
}

/// Pixels in a `width` x `height` image, computed without u32 overflow.
fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// RGBA8 image written by the pixel sweep.
///
/// Row 0 is the bottom of the image, matching camera-space +Y up.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgba>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 4]; pixel_count(width, height)],
        }
    }

    /// Reallocate for a new size. Contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![[0; 4]; pixel_count(width, height)];
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Rgba {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Overwrite row `y`.
    pub fn set_row(&mut self, y: u32, row: &[Rgba]) {
        let start = self.index(0, y);
        self.pixels[start..start + self.width as usize].copy_from_slice(row);
    }

    /// Convert to an `image` buffer, top row first.
    pub fn to_image(&self) -> image::RgbaImage {
        let height = self.height;
        image::RgbaImage::from_fn(self.width, height, |x, y| {
            image::Rgba(self.get(x, height - 1 - y))
        })
    }
}

/// Shade one pixel. `None` means the primary ray hit nothing and the pixel
/// keeps the clear color.
pub fn shade_pixel(
    scene: &RaytraceScene,
    params: &RenderParameters,
    camera: &PixelCamera,
    x: u32,
    y: u32,
) -> Option<Rgba> {
    let ray = camera.ray(x, y);
    let collision = scene.closest_triangle(&ray)?;
    let hit = scene.resolve(&ray, collision);

    if params.interpolation_rendering {
        return Some(color_to_rgba(hit.normal.abs().extend(1.0)));
    }

    if params.reflection_enabled {
        return Some(color_to_rgba(trace_and_shade(scene, &ray, params.bounces, 1.0)));
    }

    let material = hit.material;
    let mut color = ambient_term(material, scene.lights());

    if params.phong_enabled {
        for light in scene.lights() {
            color += blinn_phong(material, hit.point, hit.normal, light);
        }
    }

    if params.shadows_enabled {
        color += shadowed_lighting(scene, &hit);
    }

    color += material.emissive;
    Some(color_to_rgba(clamp_color(color).extend(1.0)))
}

fn render_row(
    scene: &RaytraceScene,
    params: &RenderParameters,
    camera: &PixelCamera,
    y: u32,
    row: &mut [Rgba],
) {
    for (x, pixel) in row.iter_mut().enumerate() {
        if let Some(color) = shade_pixel(scene, params, camera, x as u32, y) {
            *pixel = color;
        }
    }
}

/// Render a whole frame into `image` on the current rayon pool.
///
/// The image is cleared first. Rows are claimed dynamically; `cancel` is
/// checked before each row.
pub fn render_frame(
    scene: &RaytraceScene,
    params: &RenderParameters,
    image: &mut ImageBuffer,
    cancel: &AtomicBool,
) -> FrameOutcome {
    image.clear(clear_color(params));
    if image.width == 0 || image.height == 0 {
        return FrameOutcome::Completed;
    }

    let camera = PixelCamera::from_params(image.width, image.height, params);
    let result = image
        .pixels
        .par_chunks_mut(image.width as usize)
        .enumerate()
        .try_for_each(|(y, row)| {
            if cancel.load(Ordering::Relaxed) {
                return Err(());
            }
            render_row(scene, params, &camera, y as u32, row);
            Ok(())
        });

    match result {
        Ok(()) => FrameOutcome::Completed,
        Err(()) => FrameOutcome::Cancelled,
    }
}

/// Render a `width` x `height` frame row by row, handing each finished row
/// to `publish`. Used when the image lives behind a lock.
pub fn render_rows<F>(
    scene: &RaytraceScene,
    params: &RenderParameters,
    width: u32,
    height: u32,
    cancel: &AtomicBool,
    publish: F,
) -> FrameOutcome
where
    F: Fn(u32, &[Rgba]) + Sync,
{
    if width == 0 || height == 0 {
        return FrameOutcome::Completed;
    }

    let camera = PixelCamera::from_params(width, height, params);
    let background = clear_color(params);
    let result = (0..height).into_par_iter().try_for_each(|y| {
        if cancel.load(Ordering::Relaxed) {
            return Err(());
        }
        let mut row = vec![background; width as usize];
        render_row(scene, params, &camera, y, &mut row);
        publish(y, &row);
        Ok(())
    });

    match result {
        Ok(()) => FrameOutcome::Completed,
        Err(()) => FrameOutcome::Cancelled,
    }
}
