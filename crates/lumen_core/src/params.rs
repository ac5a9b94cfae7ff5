//! Render parameters.
//!
//! Everything the host application lets the user toggle between renders.
//! Read-only for the duration of a frame.

use std::path::Path;

use lumen_math::{Camera, Vec4};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::light::Light;

/// Default reflection bounce budget.
pub const DEFAULT_BOUNCES: u32 = 10;

/// Errors that can occur while reading render parameters.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// How camera rays leave the image plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    /// Rays fan out from the eye.
    #[default]
    Perspective,
    /// Parallel rays along +Z.
    Orthographic,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParameters {
    /// Full field of view in radians
    pub fov: f32,
    /// Perspective or orthographic camera rays
    pub projection: Projection,
    /// Debug view: write the interpolated normal as color
    pub interpolation_rendering: bool,
    /// Add unshadowed Blinn-Phong lighting
    pub phong_enabled: bool,
    /// Add shadow-tested Blinn-Phong lighting
    pub shadows_enabled: bool,
    /// Replace local shading with the recursive mirror tracer
    pub reflection_enabled: bool,
    /// Point lights, in world space
    pub lights: Vec<Light>,
    /// Maximum mirror bounce depth
    pub bounces: u32,
    /// Worker threads for the pixel sweep (0 = one per core)
    pub threads: usize,
    /// Clear color (linear RGBA)
    pub background: Vec4,
    /// Viewpoint
    pub camera: Camera,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            fov: 60.0_f32.to_radians(),
            projection: Projection::Perspective,
            interpolation_rendering: false,
            phong_enabled: false,
            shadows_enabled: true,
            reflection_enabled: true,
            lights: vec![Light::default()],
            bounces: DEFAULT_BOUNCES,
            threads: 0,
            background: Vec4::new(0.0, 0.0, 0.0, 1.0),
            camera: Camera::default(),
        }
    }
}

impl RenderParameters {
    /// Parse parameters from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load parameters from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let params = Self::from_json_str(&text)?;
        log::debug!("Loaded render parameters from {:?}", path.as_ref());
        Ok(params)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
