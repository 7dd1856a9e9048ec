use std::str::FromStr;

use ndarray::Array1;

use super::{count_true, kept_ratio, point_mask};
use crate::{error::Error, pointcloud::PointCloud};

/// Coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis3 {
    X,
    Y,
    Z,
}

impl Axis3 {
    pub fn index(&self) -> usize {
        match self {
            Axis3::X => 0,
            Axis3::Y => 1,
            Axis3::Z => 2,
        }
    }
}

impl FromStr for Axis3 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Axis3::X),
            "y" => Ok(Axis3::Y),
            "z" => Ok(Axis3::Z),
            _ => Err(Error::invalid_parameter(format!(
                "Unknown axis {}, expected one of x, y, z.",
                s
            ))),
        }
    }
}

/// Mask of the points with `|coordinate along axis| <= radius`.
///
/// Despite the name this is a slab of half-width `radius` across `axis`, not a
/// radial cylinder. Used to cut a robot-body-wide band out of a cloud.
pub fn filter_cylinder_mask(
    cloud: &PointCloud,
    radius: f32,
    axis: Axis3,
) -> Result<Array1<bool>, Error> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(Error::invalid_parameter(format!(
            "Cylinder radius must be positive, got {}.",
            radius
        )));
    }

    let positions = cloud.positions()?;
    let axis_index = axis.index();
    let mask = point_mask(&positions, |point| point[axis_index].abs() <= radius);

    log::debug!(
        "{:.3} = {} / {} points kept (radius {:.3} m).",
        kept_ratio(count_true(&mask), cloud.len()),
        count_true(&mask),
        cloud.len(),
        radius
    );
    Ok(mask)
}

/// Keeps the points with `|coordinate along axis| <= radius`, see [`filter_cylinder_mask`].
pub fn filter_cylinder(cloud: &PointCloud, radius: f32, axis: Axis3) -> Result<PointCloud, Error> {
    let mask = filter_cylinder_mask(cloud, radius, axis)?;
    cloud.select_mask(&mask.view())
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::{filter_cylinder, filter_cylinder_mask, Axis3};
    use crate::pointcloud::PointCloud;

    #[test]
    fn test_slab_along_axis() {
        let points = array![[0.5, 9.0, -9.0], [-1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        let cloud = PointCloud::from_array(points).unwrap();

        assert_eq!(
            filter_cylinder_mask(&cloud, 1.0, Axis3::X).unwrap(),
            array![true, true, false]
        );
        assert_eq!(
            filter_cylinder_mask(&cloud, 1.0, Axis3::Z).unwrap(),
            array![false, true, true]
        );
        assert_eq!(filter_cylinder(&cloud, 1.0, Axis3::Y).unwrap().len(), 2);
    }

    #[test]
    fn test_axis_from_str() {
        assert_eq!("y".parse::<Axis3>().unwrap(), Axis3::Y);
        assert!("w".parse::<Axis3>().is_err());
    }

    #[test]
    fn test_rejects_bad_radius() {
        let cloud = PointCloud::from_array(array![[0.0, 0.0, 0.0]]).unwrap();
        assert!(filter_cylinder(&cloud, 0.0, Axis3::Z).is_err());
    }
}
