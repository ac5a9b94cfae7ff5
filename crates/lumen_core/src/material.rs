//! Blinn-Phong surface description.

use lumen_math::Vec3;

/// Index of a material in a scene's material table.
///
/// Triangles carry this instead of owning or pointing at their material;
/// the scene owns every material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MaterialId(pub usize);

impl MaterialId {
    /// The scene's fallback material, always present at index 0.
    pub const DEFAULT: MaterialId = MaterialId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Blinn-Phong material with a mirror reflectivity.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Material name (from the MTL file or the scene builder)
    pub name: String,

    /// Ambient color (RGB, 0-1)
    pub ambient: Vec3,

    /// Diffuse/albedo color (RGB, 0-1)
    pub diffuse: Vec3,

    /// Specular reflectance at normal incidence (RGB, 0-1)
    pub specular: Vec3,

    /// Emitted color (RGB, for light-emitting surfaces)
    pub emissive: Vec3,

    /// Blinn-Phong exponent
    pub shininess: f32,

    /// Fraction of energy returned by the mirror bounce (0-1)
    pub reflectivity: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            ambient: Vec3::splat(0.1),
            diffuse: Vec3::splat(0.7),
            specular: Vec3::splat(0.04),
            emissive: Vec3::ZERO,
            shininess: 32.0,
            reflectivity: 0.0,
        }
    }
}

impl Material {
    /// Create a new material with just a name and diffuse color.
    pub fn new(name: impl Into<String>, diffuse: Vec3) -> Self {
        Self {
            name: name.into(),
            diffuse,
            ..Default::default()
        }
    }

    /// A pure mirror: no local shading, everything comes from the bounce.
    pub fn mirror(name: impl Into<String>, reflectivity: f32) -> Self {
        Self {
            name: name.into(),
            ambient: Vec3::ZERO,
            diffuse: Vec3::ZERO,
            specular: Vec3::ZERO,
            ..Default::default()
        }
        .with_reflectivity(reflectivity)
    }

    /// Set the mirror reflectivity, clamped to [0, 1].
    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity.clamp(0.0, 1.0);
        self
    }

    /// Set the emitted color.
    pub fn with_emissive(mut self, emissive: Vec3) -> Self {
        self.emissive = emissive;
        self
    }

    /// Light geometry does not block shadow rays.
    pub fn is_light(&self) -> bool {
        self.emissive.max_element() > 0.0
    }
}
