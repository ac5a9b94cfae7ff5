//! Wavefront OBJ/MTL loading.
//!
//! Each OBJ object becomes a `Model`; MTL materials are mapped onto
//! Blinn-Phong materials. Objects without normals get smooth normals.

use std::io::BufRead;
use std::path::Path;

use lumen_math::{Vec2, Vec3, Vec4};
use thiserror::Error;

use crate::material::{Material, MaterialId};
use crate::mesh::Mesh;
use crate::scene::{Model, Scene, SceneError};

/// Errors that can occur during OBJ loading.
#[derive(Error, Debug)]
pub enum ObjError {
    #[error("OBJ load error: {0}")]
    Load(#[from] tobj::LoadError),

    #[error("No geometry found in OBJ file")]
    NoGeometry,

    #[error(transparent)]
    Scene(#[from] SceneError),
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    }
}

/// Load an OBJ file (and its MTL library, if any) into a new scene.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Scene, ObjError> {
    let path = path.as_ref();
    let (models, materials) = tobj::load_obj(path, &load_options())?;

    let materials = materials.unwrap_or_else(|err| {
        log::warn!("Failed to load materials for {:?}: {}", path, err);
        Vec::new()
    });

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "obj".to_string());

    build_scene(name, models, materials)
}

/// Parse OBJ text from a reader. Material libraries are ignored.
pub fn load_obj_from_reader<R: BufRead>(reader: &mut R, name: &str) -> Result<Scene, ObjError> {
    let (models, _) = tobj::load_obj_buf(reader, &load_options(), |_| {
        Ok((Vec::new(), Default::default()))
    })?;
    build_scene(name.to_string(), models, Vec::new())
}

fn build_scene(
    name: String,
    models: Vec<tobj::Model>,
    materials: Vec<tobj::Material>,
) -> Result<Scene, ObjError> {
    if models.iter().all(|m| m.mesh.indices.is_empty()) {
        return Err(ObjError::NoGeometry);
    }

    let mut scene = Scene::new(name);
    let material_ids: Vec<MaterialId> = materials
        .iter()
        .map(|m| scene.add_material(convert_material(m)))
        .collect();

    for model in models {
        if model.mesh.indices.is_empty() {
            continue;
        }

        let material = model
            .mesh
            .material_id
            .and_then(|i| material_ids.get(i).copied());
        let mut lumen_model = Model::new(model.name, convert_mesh(&model.mesh));
        lumen_model.material = material;
        scene.add_model(lumen_model)?;
    }

    log::info!(
        "Loaded {} models, {} triangles, {} materials",
        scene.model_count(),
        scene.total_triangle_count(),
        scene.material_count()
    );

    Ok(scene)
}

fn convert_mesh(mesh: &tobj::Mesh) -> Mesh {
    let positions: Vec<Vec3> = mesh.positions.chunks_exact(3).map(Vec3::from_slice).collect();
    let vertex_count = positions.len();

    let normals = (mesh.normals.len() == vertex_count * 3)
        .then(|| mesh.normals.chunks_exact(3).map(Vec3::from_slice).collect());

    let mut out = Mesh::new(positions, mesh.indices.clone(), normals);

    if mesh.texcoords.len() == vertex_count * 2 {
        out = out.with_uvs(mesh.texcoords.chunks_exact(2).map(Vec2::from_slice).collect());
    }
    if mesh.vertex_color.len() == vertex_count * 3 {
        out = out.with_colors(
            mesh.vertex_color
                .chunks_exact(3)
                .map(|c| Vec4::new(c[0], c[1], c[2], 1.0))
                .collect(),
        );
    }

    if out.normals.is_none() {
        log::warn!("Mesh has no normals, computing smooth normals");
    }
    out.ensure_normals();
    out
}

fn convert_material(material: &tobj::Material) -> Material {
    let fallback = Material::default();
    let rgb = |c: Option<[f32; 3]>, default: Vec3| c.map(Vec3::from).unwrap_or(default);

    let specular = rgb(material.specular, fallback.specular);
    let emissive = material
        .unknown_param
        .get("Ke")
        .and_then(|s| parse_rgb(s))
        .unwrap_or(Vec3::ZERO);

    // illum 3 and up enable ray-traced reflection in the MTL model.
    let reflectivity = match material.illumination_model {
        Some(illum) if illum >= 3 => specular.max_element(),
        _ => 0.0,
    };

    Material {
        name: material.name.clone(),
        ambient: rgb(material.ambient, fallback.ambient),
        diffuse: rgb(material.diffuse, fallback.diffuse),
        specular,
        emissive,
        shininess: material.shininess.unwrap_or(fallback.shininess),
        ..fallback
    }
    .with_reflectivity(reflectivity)
}

fn parse_rgb(s: &str) -> Option<Vec3> {
    let values: Vec<f32> = s
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    match values.as_slice() {
        [r, g, b] => Some(Vec3::new(*r, *g, *b)),
        _ => None,
    }
}
