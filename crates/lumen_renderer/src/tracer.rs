//! Recursive mirror-reflection tracing.

use lumen_math::{Ray, Vec4};

use crate::scene::RaytraceScene;
use crate::shading::{clamp_color, shadowed_lighting};

/// Offset along the normal for reflected ray origins.
pub const REFLECTION_BIAS: f32 = 1e-4;

/// Bounces whose accumulated weight falls below this are not traced.
///
/// Derived from the steepest part of the sRGB encoder (the 12.92 linear
/// segment): a whole pixel of this brightness still encodes to 0.
pub const MIN_THROUGHPUT: f32 = 0.25 / (255.0 * 12.92);

/// Color seen along `ray`, following mirror bounces up to `bounces` deep.
///
/// `throughput` is the product of reflectivities along the path so far;
/// pass 1.0 for a camera ray. Misses are opaque black. The result is
/// clamped to [0, 1] with alpha 1.
pub fn trace_and_shade(scene: &RaytraceScene, ray: &Ray, bounces: u32, throughput: f32) -> Vec4 {
    let Some(hit) = scene.trace(ray) else {
        return Vec4::W;
    };
    let material = hit.material;
    let reflectivity = material.reflectivity;

    let local = material.ambient + material.emissive + shadowed_lighting(scene, &hit);
    let mut color = local * (1.0 - reflectivity);

    let next_throughput = throughput * reflectivity;
    if bounces > 0 && reflectivity > 0.0 && next_throughput >= MIN_THROUGHPUT {
        let reflected = ray.reflect(hit.normal, hit.point, REFLECTION_BIAS);
        let bounce = trace_and_shade(scene, &reflected, bounces - 1, next_throughput);
        color += bounce.truncate() * reflectivity;
    }

    clamp_color(color).extend(1.0)
}
