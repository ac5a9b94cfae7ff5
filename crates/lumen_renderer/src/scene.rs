//! Camera-space triangle soup.
//!
//! Every render flattens the scene graph into one list of triangles in
//! camera space, then answers nearest-hit queries by a linear scan.

use lumen_core::{Light, Material, MaterialId, RenderParameters, Scene, SceneError};
use lumen_math::{Interval, Mat4, Mat4Ext, Ray, Vec3};

use crate::triangle::Triangle;

/// Nearest intersection along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub triangle: Triangle,
    pub t: f32,
}

/// A collision resolved into everything shading needs.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit<'a> {
    pub triangle: Triangle,
    pub material: &'a Material,
    /// Hit point in camera space
    pub point: Vec3,
    /// Interpolated unit shading normal
    pub normal: Vec3,
    pub t: f32,
}

/// Immutable per-frame snapshot of the scene in camera space.
#[derive(Debug, Clone)]
pub struct RaytraceScene {
    triangles: Vec<Triangle>,
    materials: Vec<Material>,
    lights: Vec<Light>,
    view: Mat4,
}

impl RaytraceScene {
    /// Flatten `scene` into camera space using the camera in `params`.
    pub fn build(scene: &Scene, params: &RenderParameters) -> Result<Self, SceneError> {
        let view = params.camera.view_matrix();
        let materials = scene.materials().to_vec();
        let mut triangles = Vec::with_capacity(scene.total_triangle_count());

        for model in &scene.models {
            let mesh = &model.mesh;
            mesh.validate().map_err(|source| SceneError::Mesh {
                model: model.name.clone(),
                source,
            })?;

            let mut material = model.material_id();
            if material.index() >= materials.len() {
                log::warn!(
                    "Model '{}' references unknown material {}, using default",
                    model.name,
                    material.index()
                );
                material = MaterialId::DEFAULT;
            }

            let model_view = view * model.model_matrix();
            let normal_matrix = model_view.normal_matrix();
            let normals = mesh
                .normals
                .as_ref()
                .filter(|n| n.len() == mesh.vertex_count());

            for [i0, i1, i2] in mesh.faces() {
                let verts = [
                    model_view.transform_point3(mesh.positions[i0]),
                    model_view.transform_point3(mesh.positions[i1]),
                    model_view.transform_point3(mesh.positions[i2]),
                ];

                let mut triangle = match normals {
                    Some(n) => Triangle::new(
                        verts,
                        [
                            (normal_matrix * n[i0]).normalize_or_zero(),
                            (normal_matrix * n[i1]).normalize_or_zero(),
                            (normal_matrix * n[i2]).normalize_or_zero(),
                        ],
                        material,
                    ),
                    None => Triangle::flat(verts, material),
                };

                if let Some(colors) = &mesh.colors {
                    triangle.colors = [colors[i0], colors[i1], colors[i2]];
                }
                if let Some(uvs) = &mesh.uvs {
                    triangle.uvs = [uvs[i0], uvs[i1], uvs[i2]];
                }

                triangle.validate(triangles.len());
                triangles.push(triangle);
            }
        }

        let lights = params.lights.iter().map(|l| l.transformed(&view)).collect();

        log::debug!(
            "Built render scene: {} triangles from {} models, {} materials",
            triangles.len(),
            scene.model_count(),
            materials.len()
        );

        Ok(Self {
            triangles,
            materials,
            lights,
            view,
        })
    }

    /// Snapshot from triangles and lights that are already in camera space.
    ///
    /// Triangles keep their validation state; unvalidated ones are never hit.
    /// An empty material table gets the default material.
    pub fn from_triangles(
        triangles: Vec<Triangle>,
        mut materials: Vec<Material>,
        lights: Vec<Light>,
    ) -> Self {
        if materials.is_empty() {
            materials.push(Material::default());
        }
        Self {
            triangles,
            materials,
            lights,
            view: Mat4::IDENTITY,
        }
    }

    /// Nearest validated triangle with a strictly positive hit distance.
    pub fn closest_triangle(&self, ray: &Ray) -> Option<Collision> {
        let mut closest: Option<Collision> = None;

        for triangle in self.triangles.iter().filter(|t| t.is_valid()) {
            let Some(t) = triangle.intersect(ray) else {
                continue;
            };
            if !Interval::FORWARD.surrounds(t) {
                continue;
            }
            if closest.map_or(true, |c| t < c.t) {
                closest = Some(Collision {
                    triangle: *triangle,
                    t,
                });
            }
        }

        closest
    }

    /// Nearest hit, resolved into point, normal and material.
    pub fn trace(&self, ray: &Ray) -> Option<SurfaceHit<'_>> {
        self.closest_triangle(ray).map(|c| self.resolve(ray, c))
    }

    /// Resolve a collision along `ray`.
    pub fn resolve(&self, ray: &Ray, collision: Collision) -> SurfaceHit<'_> {
        let point = ray.at(collision.t);
        SurfaceHit {
            triangle: collision.triangle,
            material: self.material(collision.triangle.material),
            point,
            normal: collision.triangle.normal_at(point),
            t: collision.t,
        }
    }

    /// Material by ID, falling back to the default material.
    pub fn material(&self, id: MaterialId) -> &Material {
        self.materials
            .get(id.index())
            .unwrap_or(&self.materials[MaterialId::DEFAULT.index()])
    }

    /// Lights in camera space.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// World → camera matrix the snapshot was built with.
    pub fn view(&self) -> Mat4 {
        self.view
    }
}
