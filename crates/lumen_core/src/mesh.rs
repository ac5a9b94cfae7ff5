//! Mesh geometry representation for the Lumen scene graph.
//!
//! Meshes are indexed triangle lists in object space. The ray tracer flattens
//! them into a camera-space triangle soup once per render.

use lumen_math::{Vec2, Vec3, Vec4};
use thiserror::Error;

/// Reasons a mesh cannot be turned into triangles.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("index count {0} is not a multiple of 3")]
    IndexCount(usize),

    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("{attribute} count {found} does not match vertex count {expected}")]
    AttributeCount {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },
}

/// A mesh consisting of vertex positions, optional per-vertex attributes,
/// and triangle indices (counter-clockwise winding).
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (optional - computed by `ensure_normals` if missing)
    pub normals: Option<Vec<Vec3>>,

    /// Vertex colors (optional, RGBA)
    pub colors: Option<Vec<Vec4>>,

    /// UV coordinates (optional)
    pub uvs: Option<Vec<Vec2>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Self {
        Self {
            positions,
            normals,
            colors: None,
            uvs: None,
            indices,
        }
    }

    /// Attach per-vertex colors.
    pub fn with_colors(mut self, colors: Vec<Vec4>) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Attach per-vertex UV coordinates.
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    /// Compute smooth vertex normals by averaging face normals.
    ///
    /// Replaces existing normals. Degenerate vertices get +Y.
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for face in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let p0 = self.positions[i0];
            let face_normal = (self.positions[i1] - p0).cross(self.positions[i2] - p0);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            *normal = normal.try_normalize().unwrap_or(Vec3::Y);
        }

        self.normals = Some(normals);
    }

    /// Ensure the mesh has one normal per vertex, computing them if necessary.
    pub fn ensure_normals(&mut self) {
        let should_compute = match &self.normals {
            None => true,
            Some(normals) => normals.len() != self.positions.len(),
        };

        if should_compute {
            if let Some(normals) = &self.normals {
                log::warn!(
                    "Normals array length ({}) doesn't match vertex count ({}), computing smooth normals",
                    normals.len(),
                    self.positions.len()
                );
            }
            self.compute_normals();
        }
    }

    /// Check the index buffer and attribute arrays against the vertex count.
    pub fn validate(&self) -> Result<(), MeshError> {
        let vertex_count = self.positions.len();

        if self.indices.len() % 3 != 0 {
            return Err(MeshError::IndexCount(self.indices.len()));
        }

        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        let attributes = [
            ("normal", self.normals.as_ref().map(Vec::len)),
            ("color", self.colors.as_ref().map(Vec::len)),
            ("uv", self.uvs.as_ref().map(Vec::len)),
        ];
        for (attribute, found) in attributes {
            if let Some(found) = found {
                if found != vertex_count {
                    return Err(MeshError::AttributeCount {
                        attribute,
                        expected: vertex_count,
                        found,
                    });
                }
            }
        }

        Ok(())
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Iterate over the vertex indices of each triangle.
    pub fn faces(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|f| [f[0] as usize, f[1] as usize, f[2] as usize])
    }

    /// A two-triangle quad spanning `corner`, `corner + u` and `corner + v`,
    /// with normals along `u × v`.
    pub fn quad(corner: Vec3, u: Vec3, v: Vec3) -> Self {
        let normal = u.cross(v).normalize_or_zero();
        Self::new(
            vec![corner, corner + u, corner + u + v, corner + v],
            vec![0, 1, 2, 0, 2, 3],
            Some(vec![normal; 4]),
        )
    }
}
