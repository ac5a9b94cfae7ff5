//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection and
//! signed area ratios for barycentric interpolation.

use lumen_core::MaterialId;
use lumen_math::{Ray, Vec2, Vec3, Vec4};

/// Slack admitted on `t` and on each barycentric coefficient so rays that
/// graze a shared edge hit one of its triangles instead of slipping through.
pub const INTERSECTION_EPSILON: f32 = 1e-4;

/// A triangle in the render soup.
///
/// Cheap to copy: the material is referenced by index into the scene's
/// material table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Position in the soup; `None` until the scene validates it
    id: Option<usize>,
    /// Vertices
    pub verts: [Vec3; 3],
    /// Per-vertex shading normals (unit length)
    pub normals: [Vec3; 3],
    /// Per-vertex colors (carried, unused by shading)
    pub colors: [Vec4; 3],
    /// Per-vertex UVs (carried, unused by shading)
    pub uvs: [Vec2; 3],
    /// Material
    pub material: MaterialId,
}

impl Triangle {
    /// Create an unvalidated triangle with per-vertex normals.
    pub fn new(verts: [Vec3; 3], normals: [Vec3; 3], material: MaterialId) -> Self {
        Self {
            id: None,
            verts,
            normals,
            colors: [Vec4::ONE; 3],
            uvs: [Vec2::ZERO; 3],
            material,
        }
    }

    /// Create a flat-shaded triangle, all normals set to the face normal.
    pub fn flat(verts: [Vec3; 3], material: MaterialId) -> Self {
        let normal = (verts[1] - verts[0])
            .cross(verts[2] - verts[0])
            .normalize_or_zero();
        Self::new(verts, [normal; 3], material)
    }

    /// Admit the triangle into a scene under `id`.
    pub fn validate(&mut self, id: usize) {
        self.id = Some(id);
    }

    pub fn is_valid(&self) -> bool {
        self.id.is_some()
    }

    pub fn id(&self) -> Option<usize> {
        self.id
    }

    /// Average of the three vertices.
    pub fn centroid(&self) -> Vec3 {
        (self.verts[0] + self.verts[1] + self.verts[2]) / 3.0
    }

    /// Möller-Trumbore ray-triangle intersection.
    ///
    /// Returns the ray parameter of the hit. The hit may lie up to
    /// [`INTERSECTION_EPSILON`] outside the triangle or behind the origin;
    /// callers decide which `t` values they accept.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let [a, b, c] = self.verts;
        let ab = b - a;
        let ac = c - a;
        let ao = ray.origin - a;

        let p = ray.direction.cross(ac);
        let q = ao.cross(ab);

        // Ray parallel to the triangle plane
        let det = p.dot(ab);
        if det == 0.0 {
            return None;
        }
        let inv_det = 1.0 / det;

        let t = q.dot(ac) * inv_det;
        let b1 = p.dot(ao) * inv_det;
        let b2 = q.dot(ray.direction) * inv_det;

        if !t.is_finite() {
            return None;
        }

        let eps = INTERSECTION_EPSILON;
        if t + eps >= 0.0 && b1 + eps >= 0.0 && b2 + eps >= 0.0 && 1.0 - b1 - b2 + eps >= 0.0 {
            Some(t)
        } else {
            None
        }
    }

    /// Barycentric weights of a point in the triangle's plane.
    ///
    /// Weights are area ratios of the sub-triangles opposite each vertex,
    /// signed against the face normal: they sum to 1, and a point outside
    /// the triangle gets a negative weight for the vertex it lies beyond.
    pub fn barycentric(&self, point: Vec3) -> Vec3 {
        let [a, b, c] = self.verts;
        let n = (b - a).cross(c - a);
        let area2 = n.length_squared();
        if area2 == 0.0 {
            return Vec3::splat(1.0 / 3.0);
        }

        let alpha = n.dot((c - b).cross(point - b)) / area2;
        let beta = n.dot((a - c).cross(point - c)) / area2;
        Vec3::new(alpha, beta, 1.0 - alpha - beta)
    }

    /// Shading normal at the given barycentric weights.
    pub fn interpolated_normal(&self, weights: Vec3) -> Vec3 {
        (self.normals[0] * weights.x + self.normals[1] * weights.y + self.normals[2] * weights.z)
            .normalize_or_zero()
    }

    /// Shading normal at a point in the triangle's plane.
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        self.interpolated_normal(self.barycentric(point))
    }
}
