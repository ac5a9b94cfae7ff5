//! Blinn-Phong shading and shadow rays.
//!
//! All shading happens in camera space, so the eye is at the origin.

use std::f32::consts::PI;

use lumen_core::{Light, Material};
use lumen_math::{Interval, Ray, Vec3};

use crate::scene::{RaytraceScene, SurfaceHit};
use crate::Color;

/// Offset along the normal for shadow ray origins.
pub const SHADOW_BIAS: f32 = 1e-3;

/// Diffuse plus specular light from one light at `point`.
///
/// Ambient and emissive terms are left to the caller. The result is
/// linear and unclamped.
pub fn blinn_phong(material: &Material, point: Vec3, normal: Vec3, light: &Light) -> Color {
    let to_light = (light.position - point).normalize_or_zero();
    let to_eye = (-point).normalize_or_zero();

    let diffuse_cos = to_light.dot(normal).max(0.0);
    let diffuse = diffuse_cos * light.color * material.diffuse;

    let half = (to_light + to_eye).normalize_or_zero();
    let specular_cos = normal.dot(half).max(0.0);

    // Schlick: blend the base reflectance toward white at grazing angles
    let fresnel = material.specular
        + (Vec3::ONE - material.specular) * (1.0 - half.dot(to_light)).max(0.0).powi(5);

    let normalization = (material.shininess + 2.0) / (2.0 * PI);
    let specular = normalization
        * diffuse_cos
        * specular_cos.powf(material.shininess)
        * light.color
        * fresnel;

    diffuse + specular
}

/// Full local model: emissive + ambient + every light, clamped to [0, 1].
pub fn blinn_phong_all(material: &Material, point: Vec3, normal: Vec3, lights: &[Light]) -> Color {
    let lit: Color = lights
        .iter()
        .map(|light| blinn_phong(material, point, normal, light))
        .sum();
    clamp_color(material.emissive + material.ambient + lit)
}

/// Ambient light reaching a material: each light's color times the
/// material's ambient reflectance.
pub fn ambient_term(material: &Material, lights: &[Light]) -> Color {
    lights.iter().map(|light| light.color * material.ambient).sum()
}

/// Whether `light` reaches `point` unobstructed.
///
/// Light-emitting geometry never blocks, and neither does anything farther
/// away than the light itself.
pub fn light_visible(scene: &RaytraceScene, point: Vec3, normal: Vec3, light: &Light) -> bool {
    let to_light = light.position - point;
    let distance = to_light.length();
    let shadow_ray = Ray::secondary(point + SHADOW_BIAS * normal, to_light);

    match scene.closest_triangle(&shadow_ray) {
        None => true,
        Some(hit) if hit.t >= distance => true,
        Some(hit) => scene.material(hit.triangle.material).is_light(),
    }
}

/// Blinn-Phong from every light that passes the shadow test.
pub fn shadowed_lighting(scene: &RaytraceScene, hit: &SurfaceHit) -> Color {
    scene
        .lights()
        .iter()
        .filter(|light| light_visible(scene, hit.point, hit.normal, light))
        .map(|light| blinn_phong(hit.material, hit.point, hit.normal, light))
        .sum()
}

/// Clamp each channel to the displayable range.
pub(crate) fn clamp_color(color: Color) -> Color {
    Color::new(
        Interval::UNIT.clamp(color.x),
        Interval::UNIT.clamp(color.y),
        Interval::UNIT.clamp(color.z),
    )
}
