//! Scene graph types for Lumen.
//!
//! A scene is a flat list of models, each an object-space mesh placed by a
//! transform, plus the material table every model indexes into.

use std::sync::Arc;

use lumen_math::{Mat4, Quat, Vec3};
use thiserror::Error;

use crate::material::{Material, MaterialId};
use crate::mesh::{Mesh, MeshError};

/// Errors raised while assembling a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("model '{model}' has invalid geometry: {source}")]
    Mesh {
        model: String,
        #[source]
        source: MeshError,
    },

    #[error("model '{model}' references unknown material {id}")]
    UnknownMaterial { model: String, id: usize },
}

/// Transform components that can be composed into a matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    /// Translation
    pub translation: Vec3,

    /// Rotation (as quaternion)
    pub rotation: Quat,

    /// Scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with only translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Convert to a 4x4 transformation matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// A mesh placed in the world with a material.
#[derive(Clone, Debug)]
pub struct Model {
    /// Model name (object name from the OBJ file or the scene builder)
    pub name: String,

    /// Shared mesh geometry
    pub mesh: Arc<Mesh>,

    /// Material (optional, falls back to the scene default)
    pub material: Option<MaterialId>,

    /// Object → world transform
    pub transform: Transform,
}

impl Model {
    /// Create a model with the default material and an identity transform.
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            mesh: Arc::new(mesh),
            material: None,
            transform: Transform::default(),
        }
    }

    /// Set the material for this model.
    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    /// Set the model transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Get the 4x4 model matrix.
    pub fn model_matrix(&self) -> Mat4 {
        self.transform.to_matrix()
    }

    /// Material used for shading, resolving `None` to the default.
    pub fn material_id(&self) -> MaterialId {
        self.material.unwrap_or(MaterialId::DEFAULT)
    }
}

/// A complete scene: models plus the material table they index.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Scene name (usually from filename)
    pub name: String,

    /// Models in the scene
    pub models: Vec<Model>,

    /// Material table. Index 0 is the default material.
    materials: Vec<Material>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("untitled")
    }
}

impl Scene {
    /// Create an empty scene holding only the default material.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            models: Vec::new(),
            materials: vec![Material::default()],
        }
    }

    /// Add a material to the scene and return its ID.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len());
        self.materials.push(material);
        id
    }

    /// Replace the fallback material.
    pub fn set_default_material(&mut self, material: Material) {
        self.materials[MaterialId::DEFAULT.index()] = material;
    }

    /// Add a model after validating its mesh and material reference.
    pub fn add_model(&mut self, model: Model) -> Result<usize, SceneError> {
        model.mesh.validate().map_err(|source| SceneError::Mesh {
            model: model.name.clone(),
            source,
        })?;

        let id = model.material_id();
        if id.index() >= self.materials.len() {
            return Err(SceneError::UnknownMaterial {
                model: model.name.clone(),
                id: id.index(),
            });
        }

        self.models.push(model);
        Ok(self.models.len() - 1)
    }

    /// Get a material by ID.
    pub fn get_material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.index())
    }

    /// The fallback material.
    pub fn default_material(&self) -> &Material {
        &self.materials[MaterialId::DEFAULT.index()]
    }

    /// All materials, indexable by `MaterialId`.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Get material count.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Get model count.
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Get total triangle count across all models.
    pub fn total_triangle_count(&self) -> usize {
        self.models.iter().map(|m| m.mesh.triangle_count()).sum()
    }
}
