use nalgebra::Vector3;

use super::Volume;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere3Df {
    pub center: Vector3<f32>,
    pub radius: f32,
}

impl Sphere3Df {
    pub fn new(center: Vector3<f32>, radius: f32) -> Self {
        Self { center, radius }
    }

    /// A sphere with negative radius is empty and contains nothing.
    pub fn is_empty(&self) -> bool {
        self.radius < 0.0
    }
}

impl Volume for Sphere3Df {
    fn contains(&self, point: &Vector3<f32>) -> bool {
        !self.is_empty() && (point - self.center).norm_squared() <= self.radius * self.radius
    }
}
