use nalgebra::ClosedAdd;
use nalgebra::Scalar;
use nalgebra::Vector3;
use num::Zero;

use super::Volume;

/// Axis aligned box.
#[derive(Clone, Debug, PartialEq)]
pub struct Box3D<T>
where
    T: Scalar + Zero + ClosedAdd,
{
    pub min: Vector3<T>,
    pub max: Vector3<T>,
}

impl<T> Box3D<T>
where
    T: Scalar + Zero + ClosedAdd + PartialOrd,
{
    ///
    /// # Arguments
    ///
    /// * `start_point`: The minimum point in the X, Y, and Z axis.
    /// * `size`: The size of in the X, Y, and Z axis.
    pub fn from_extents(start_point: Vector3<T>, size: Vector3<T>) -> Self {
        Box3D {
            min: start_point.clone(),
            max: start_point + &size,
        }
    }

    /// A box is empty when it has no extent along some axis.
    pub fn is_empty(&self) -> bool {
        self.min
            .iter()
            .zip(self.max.iter())
            .any(|(min, max)| min >= max)
    }

    /// Whether `point` lies inside the box, borders included.
    pub fn contains_point(&self, point: &Vector3<T>) -> bool {
        (0..3).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
    }
}

pub type Box3Df = Box3D<f32>;

impl Volume for Box3Df {
    fn contains(&self, point: &Vector3<f32>) -> bool {
        !self.is_empty() && self.contains_point(point)
    }
}
