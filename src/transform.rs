use nalgebra::{self, Rotation3};

use nalgebra::{Isometry3, Matrix4, Translation3, UnitQuaternion, Vector3};
use ndarray::Axis;
use ndarray::{self, Array2, ArrayView2};

use std::ops;

/// Rotation acting on `[N, 3]` point arrays.
#[derive(Clone, Debug, PartialEq)]
pub struct Rotation(pub Rotation3<f32>);

impl ops::Mul<&ArrayView2<'_, f32>> for &Rotation {
    type Output = Array2<f32>;

    fn mul(self, rhs: &ArrayView2<f32>) -> Self::Output {
        let mut result = Array2::<f32>::zeros((rhs.len_of(Axis(0)), 3));

        for (in_iter, mut out_iter) in rhs.axis_iter(Axis(0)).zip(result.axis_iter_mut(Axis(0))) {
            let v = self.0 * Vector3::new(in_iter[0], in_iter[1], in_iter[2]);
            out_iter[0] = v[0];
            out_iter[1] = v[1];
            out_iter[2] = v[2];
        }

        result
    }
}

/// Extracts `(roll, pitch, yaw)` from a rotation.
///
/// The convention is `R = Rz(yaw) * Ry(pitch) * Rx(roll)`, the inverse of [`rpy_to_rot`].
pub fn rot_to_rpy(rotation: &Rotation3<f32>) -> (f32, f32, f32) {
    rotation.euler_angles()
}

/// Builds `Rz(yaw) * Ry(pitch) * Rx(roll)`.
pub fn rpy_to_rot(roll: f32, pitch: f32, yaw: f32) -> Rotation3<f32> {
    Rotation3::from_euler_angles(roll, pitch, yaw)
}

/// Rigid transform, like the 4x4 poses handed by odometry or SLAM.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform(Isometry3<f32>);

impl Transform {
    pub fn eye() -> Self {
        Self(Isometry3::<f32>::from_parts(
            Translation3::new(0.0, 0.0, 0.0),
            UnitQuaternion::identity(),
        ))
    }

    pub fn from_matrix4(matrix: &Matrix4<f32>) -> Self {
        let translation = Translation3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);
        let so3 = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix(
            &matrix.fixed_slice::<3, 3>(0, 0).into_owned(),
        ));
        Self(Isometry3::<f32>::from_parts(translation, so3))
    }

    /// Creates the transform from a row-major 4x4 matrix.
    pub fn from_rows(rows: &[[f32; 4]; 4]) -> Self {
        Self::from_matrix4(&Matrix4::<f32>::from_fn(|r, c| rows[r][c]))
    }

    /// Creates the transform from a translation and roll, pitch and yaw angles in radians.
    /// See [`rpy_to_rot`] for the angle convention.
    pub fn from_xyz_rpy(xyz: &Vector3<f32>, roll: f32, pitch: f32, yaw: f32) -> Self {
        Self(Isometry3::<f32>::from_parts(
            Translation3::new(xyz[0], xyz[1], xyz[2]),
            UnitQuaternion::from_rotation_matrix(&rpy_to_rot(roll, pitch, yaw)),
        ))
    }

    pub fn rotation(&self) -> Rotation3<f32> {
        self.0.rotation.to_rotation_matrix()
    }

    pub fn transform_vector(&self, vector: &Vector3<f32>) -> Vector3<f32> {
        self.0.transform_point(&(*vector).into()).coords
    }
}

impl ops::Mul<&ArrayView2<'_, f32>> for &Transform {
    type Output = Array2<f32>;

    fn mul(self, rhs: &ArrayView2<f32>) -> Self::Output {
        let mut result = Array2::<f32>::zeros((rhs.len_of(Axis(0)), 3));

        for (in_iter, mut out_iter) in rhs.axis_iter(Axis(0)).zip(result.axis_iter_mut(Axis(0))) {
            let v = self.transform_vector(&Vector3::new(in_iter[0], in_iter[1], in_iter[2]));
            out_iter[0] = v[0];
            out_iter[1] = v[1];
            out_iter[2] = v[2];
        }

        result
    }
}
