use nalgebra::Rotation3;
use ndarray::{Array2, ArrayView2};

use crate::transform::{rot_to_rpy, rpy_to_rot, Rotation, Transform};

/// Returns the rotation that levels points seen from `map_pose`.
///
/// Only roll and pitch are kept, yaw is zeroed so the heading is preserved.
///
/// # Arguments
///
/// * `map_pose` - Pose of the map frame relative to the sensor or robot origin.
pub fn gravity_alignment(map_pose: &Transform) -> Rotation3<f32> {
    let (roll, pitch, _yaw) = rot_to_rpy(&map_pose.rotation());
    rpy_to_rot(roll, pitch, 0.0)
}

/// Returns a gravity-aligned copy of `[N, 3]` points. The input is left as is.
pub fn gravity_align_points(points: &ArrayView2<f32>, map_pose: &Transform) -> Array2<f32> {
    &Rotation(gravity_alignment(map_pose)) * points
}
