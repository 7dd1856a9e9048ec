use ndarray::Array1;

use super::{count_true, kept_ratio, point_mask};
use crate::{error::Error, pointcloud::PointCloud};

fn check_range(min: f32, max: f32) -> Result<(), Error> {
    if !min.is_finite() || max.is_nan() || max == f32::NEG_INFINITY {
        return Err(Error::invalid_parameter(format!(
            "Range bounds must be finite (max may be +inf), got min {}, max {}.",
            min, max
        )));
    }
    if min > max {
        return Err(Error::invalid_parameter(format!(
            "Range min {} is greater than max {}.",
            min, max
        )));
    }
    Ok(())
}

/// Mask of the points whose distance from the origin lies in `[min, max]`.
///
/// # Arguments
///
/// * `cloud` - Input cloud.
/// * `min` - Minimum distance, finite.
/// * `max` - Maximum distance, finite or `f32::INFINITY`.
pub fn filter_range_mask(cloud: &PointCloud, min: f32, max: f32) -> Result<Array1<bool>, Error> {
    check_range(min, max)?;
    if min <= 0.0 && max == f32::INFINITY {
        return Ok(Array1::from_elem(cloud.len(), true));
    }

    let positions = cloud.positions()?;
    let mask = point_mask(&positions, |point| {
        let r = point.dot(&point).sqrt();
        min <= r && r <= max
    });

    log::debug!(
        "{:.3} = {} / {} points kept (range min {}, max {}).",
        kept_ratio(count_true(&mask), cloud.len()),
        count_true(&mask),
        cloud.len(),
        min,
        max
    );
    Ok(mask)
}

/// Keeps the points whose distance from the origin lies in `[min, max]`.
/// With `min <= 0` and an infinite `max` the cloud is returned as is.
pub fn filter_range(cloud: &PointCloud, min: f32, max: f32) -> Result<PointCloud, Error> {
    check_range(min, max)?;
    if min <= 0.0 && max == f32::INFINITY {
        return Ok(cloud.clone());
    }
    let mask = filter_range_mask(cloud, min, max)?;
    cloud.select_mask(&mask.view())
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use rstest::*;

    use super::{filter_range, filter_range_mask};
    use crate::pointcloud::PointCloud;

    #[fixture]
    fn line_cloud() -> PointCloud {
        PointCloud::from_array(array![
            [0.5, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 2.0],
            [3.0, 4.0, 0.0],
            [10.0, 0.0, 0.0]
        ])
        .unwrap()
    }

    #[rstest]
    fn test_range_mask(line_cloud: PointCloud) {
        let mask = filter_range_mask(&line_cloud, 1.0, 5.0).unwrap();
        assert_eq!(mask, array![false, true, true, true, false]);
    }

    #[rstest]
    fn test_range_is_idempotent(line_cloud: PointCloud) {
        let once = filter_range(&line_cloud, 0.0, 4.0).unwrap();
        let twice = filter_range(&once, 0.0, 4.0).unwrap();
        assert_eq!(once.len(), 3);
        assert_eq!(once, twice);
    }

    #[rstest]
    fn test_identity_fast_path(line_cloud: PointCloud) {
        let filtered = filter_range(&line_cloud, -1.0, f32::INFINITY).unwrap();
        assert_eq!(filtered, line_cloud);
        assert!(filter_range_mask(&line_cloud, 0.0, f32::INFINITY)
            .unwrap()
            .iter()
            .all(|keep| *keep));
    }

    #[rstest]
    fn test_rejects_inverted_bounds(line_cloud: PointCloud) {
        assert!(filter_range(&line_cloud, 2.0, 1.0).is_err());
        assert!(filter_range(&line_cloud, f32::NAN, 1.0).is_err());
        assert!(filter_range_mask(&line_cloud, 0.0, f32::NAN).is_err());
    }
}
