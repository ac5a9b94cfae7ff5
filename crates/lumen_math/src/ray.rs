use crate::Vec3;

/// What produced a ray.
///
/// Carried for diagnostics; it never changes intersection behaviour.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RayKind {
    /// Generated by the camera for a pixel.
    Primary,
    /// Spawned at a surface (shadow or reflection).
    Secondary,
}

/// A ray in 3D space with origin, unit direction, and kind.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub kind: RayKind,
}

impl Ray {
    /// Create a new ray. The direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3, kind: RayKind) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            kind,
        }
    }

    /// Create a camera ray.
    pub fn primary(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, RayKind::Primary)
    }

    /// Create a ray leaving a surface.
    pub fn secondary(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, RayKind::Secondary)
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Mirror this ray about `normal` at `hit_point`, nudging the new origin
    /// off the surface by `bias` along the normal.
    pub fn reflect(&self, normal: Vec3, hit_point: Vec3, bias: f32) -> Ray {
        let d = self.direction;
        let dir = d - 2.0 * d.dot(normal) * normal;
        Ray::secondary(hit_point + bias * normal, dir)
    }
}
