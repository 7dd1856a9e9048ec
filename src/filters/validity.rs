use nalgebra::Vector3;
use ndarray::{Array1, Zip};

use super::point_mask;
use crate::{bounds::Volume, error::Error, pointcloud::PointCloud, transform::Transform};

/// Marks the points that carry a real measurement.
///
/// A point is valid when its position is finite and not exactly `(0, 0, 0)`, the
/// sensor's "no return" value. With `discard`, points that fall inside the volume once
/// moved by the transform into its frame are invalid too, this removes robot body
/// self-returns.
///
/// # Arguments
///
/// * `cloud` - Input cloud.
/// * `discard` - Transform from the cloud frame into the volume frame, and the volume.
pub fn valid_point_mask(
    cloud: &PointCloud,
    discard: Option<(&Transform, &dyn Volume)>,
) -> Result<Array1<bool>, Error> {
    let positions = cloud.positions()?;
    let mut valid = point_mask(&positions, |point| {
        point.iter().all(|v| v.is_finite()) && point.iter().any(|v| *v != 0.0)
    });

    if let Some((transform, volume)) = discard {
        let moved = transform * &positions.view();
        Zip::from(&mut valid)
            .and(moved.rows())
            .par_for_each(|valid, point| {
                *valid = *valid && !volume.contains(&Vector3::new(point[0], point[1], point[2]));
            });
    }
    Ok(valid)
}
