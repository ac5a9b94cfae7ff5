// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod camera;
mod interval;
mod ray;
mod transform;

pub use camera::Camera;
pub use interval::Interval;
pub use ray::{Ray, RayKind};
pub use transform::Mat4Ext;
