use nalgebra::Vector3;

mod box3d;
pub use box3d::{Box3D, Box3Df};
mod sphere3d;
pub use sphere3d::Sphere3Df;

/// A closed volume that can tell whether a point is inside it.
pub trait Volume: Send + Sync {
    fn contains(&self, point: &Vector3<f32>) -> bool;
}
