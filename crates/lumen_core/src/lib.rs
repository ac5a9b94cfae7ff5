//! Lumen Core - scene description consumed by the ray tracer.
//!
//! This crate provides:
//!
//! - **Scene graph types**: `Scene`, `Model`, `Mesh`, `Material`, `Light`
//! - **Render parameters**: `RenderParameters`, loadable from JSON
//! - **OBJ support**: Wavefront OBJ/MTL loading via `tobj`
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{obj::load_obj, RenderParameters};
//!
//! let scene = load_obj("teapot.obj")?;
//! let params = RenderParameters::load("render.json")?;
//! println!("Loaded {} models, {} triangles",
//!     scene.model_count(),
//!     scene.total_triangle_count());
//! ```

pub mod light;
pub mod material;
pub mod mesh;
pub mod obj;
pub mod params;
pub mod scene;

// Re-export commonly used types
pub use light::Light;
pub use material::{Material, MaterialId};
pub use mesh::{Mesh, MeshError};
pub use params::{ConfigError, Projection, RenderParameters, DEFAULT_BOUNCES};
pub use scene::{Model, Scene, SceneError, Transform};
