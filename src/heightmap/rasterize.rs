use itertools::izip;
use ndarray::{Array2, Zip};

use super::{
    config::{HeightmapConfig, InterpMethod},
    grid::{meshgrid, GridAxis},
    interpolation::interpolate_grid,
    HeightMap,
};
use crate::{
    error::Error, gravity::gravity_align_points, pointcloud::PointCloud, transform::Transform,
};

/// Estimates terrain height maps from point clouds.
///
/// Points are filtered (ground clutter band, elevation ceiling, square footprint, robot
/// disk) and rasterized onto a `[n, n]` grid spanning `[-d_max, d_max]` on both axes.
#[derive(Clone, Debug)]
pub struct HeightmapEstimator {
    config: HeightmapConfig,
    x_axis: GridAxis,
    y_axis: GridAxis,
}

impl HeightmapEstimator {
    /// Creates the estimator, failing on an invalid configuration.
    pub fn new(config: HeightmapConfig) -> Result<Self, Error> {
        config.validate()?;
        let n = config.grid_size();
        Ok(Self {
            x_axis: GridAxis::new(config.d_max, n),
            y_axis: GridAxis::new(config.d_max, n),
            config,
        })
    }

    pub fn config(&self) -> &HeightmapConfig {
        &self.config
    }

    /// Estimates the height map.
    ///
    /// # Arguments
    ///
    /// * `cloud` - Points in the robot frame, must not be empty.
    /// * `map_pose` - Pose of the map frame, its roll and pitch level the points for the
    ///   elevation ceiling test.
    ///
    /// # Returns
    ///
    /// `None` when no point survives the filtering.
    pub fn estimate(
        &self,
        cloud: &PointCloud,
        map_pose: &Transform,
    ) -> Result<Option<HeightMap>, Error> {
        Ok(self
            .estimate_with_points(cloud, map_pose)?
            .map(|(heightmap, _)| heightmap))
    }

    /// Like [`Self::estimate`], also returning the `[N, 3]` points that made it to the grid.
    pub fn estimate_with_points(
        &self,
        cloud: &PointCloud,
        map_pose: &Transform,
    ) -> Result<Option<(HeightMap, Array2<f32>)>, Error> {
        if cloud.is_empty() {
            return Err(Error::invalid_parameter(
                "Can't estimate a height map from an empty point cloud.",
            ));
        }

        let points = self.filter_points(&cloud.positions()?, map_pose);
        if points.nrows() == 0 {
            log::debug!("No points left after filtering, the height map has no data.");
            return Ok(None);
        }

        let (z, mask) = match self.config.hm_interp_method {
            InterpMethod::None => self.bin_points(&points),
            method => {
                let z = interpolate_grid(
                    &points,
                    &self.x_axis,
                    &self.y_axis,
                    method,
                    self.config.fill_value,
                )?;
                let mask = Array2::<f32>::ones(z.raw_dim());
                (z, mask)
            }
        };

        let (x, y) = meshgrid(&self.x_axis, &self.y_axis);
        log::debug!(
            "Height map of {}x{} cells from {} points ({:?}).",
            x.nrows(),
            x.ncols(),
            points.nrows(),
            self.config.hm_interp_method
        );

        Ok(Some((
            HeightMap {
                x,
                y,
                z: transposed(z),
                mask: transposed(mask),
            },
            points,
        )))
    }

    /// Drops the non finite points and those rejected by the configured criteria.
    fn filter_points(&self, positions: &Array2<f32>, map_pose: &Transform) -> Array2<f32> {
        let finite = positions
            .rows()
            .into_iter()
            .enumerate()
            .filter_map(|(i, point)| {
                if point.iter().all(|v| v.is_finite()) {
                    Some(i)
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();
        let positions = positions.select(ndarray::Axis(0), &finite);
        let aligned = gravity_align_points(&positions.view(), map_pose);

        let config = &self.config;
        let robot_radius = config.robot_size.map(|size| size / 2.0);
        let keep = Zip::from(positions.rows())
            .and(aligned.rows())
            .par_map_collect(|point, aligned| {
                let (x, y, z) = (point[0], point[1], point[2]);
                let is_grass = config
                    .grass_range
                    .map_or(false, |[low, high]| low <= z && z <= high);
                let below_ceiling = aligned[2] <= config.h_max;
                let in_square = x.abs() <= config.d_max && y.abs() <= config.d_max;
                let on_robot = robot_radius.map_or(false, |radius| x.hypot(y) <= radius);

                !is_grass && below_ceiling && in_square && !on_robot
            });

        let kept = izip!(0..positions.nrows(), keep.iter())
            .filter_map(|(i, keep)| if *keep { Some(i) } else { None })
            .collect::<Vec<_>>();
        positions.select(ndarray::Axis(0), &kept)
    }

    /// Snaps each point to its nearest grid node, on each axis independently, keeping the
    /// highest elevation per node. The first point to reach a node always lands, later
    /// ones only when strictly higher.
    ///
    /// # Returns
    ///
    /// Elevation and measurement mask, indexed `[x index, y index]`.
    fn bin_points(&self, points: &Array2<f32>) -> (Array2<f32>, Array2<f32>) {
        let shape = (self.x_axis.len(), self.y_axis.len());
        let mut z_grid = Array2::<f32>::from_elem(shape, self.config.fill_value);
        let mut measured = Array2::<f32>::zeros(shape);

        for point in points.rows() {
            let cell = (
                self.x_axis.nearest_index(point[0]),
                self.y_axis.nearest_index(point[1]),
            );
            if measured[cell] == 0.0 || point[2] > z_grid[cell] {
                z_grid[cell] = point[2];
                measured[cell] = 1.0;
            }
        }

        (z_grid, measured)
    }
}

/// Swaps rows and columns, returning a standard layout array.
fn transposed(array: Array2<f32>) -> Array2<f32> {
    array.t().as_standard_layout().into_owned()
}

/// Shorthand for [`HeightmapEstimator::estimate`].
pub fn estimate_heightmap(
    cloud: &PointCloud,
    config: &HeightmapConfig,
    map_pose: &Transform,
) -> Result<Option<HeightMap>, Error> {
    HeightmapEstimator::new(config.clone())?.estimate(cloud, map_pose)
}
