//! Terrain height maps from point clouds, and back.

use ndarray::{Array2, Zip};
use ordered_float::OrderedFloat;

use crate::error::Error;

mod config;
pub use config::{HeightmapConfig, InterpMethod};
mod grid;
pub use grid::{meshgrid, GridAxis};
mod interpolation;
mod rasterize;
pub use rasterize::{estimate_heightmap, HeightmapEstimator};
mod reconstruct;
pub use reconstruct::heightmap_to_cloud;

/// Height map over a square bird's-eye-view footprint.
///
/// All arrays share the shape `[n, n]` and are indexed `[y index, x index]`.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightMap {
    /// X coordinate of each cell.
    pub x: Array2<f32>,
    /// Y coordinate of each cell.
    pub y: Array2<f32>,
    /// Elevation of each cell.
    pub z: Array2<f32>,
    /// 1 where the cell got a real measurement, 0 where it was filled. Interpolated maps
    /// are all ones.
    pub mask: Array2<f32>,
}

impl HeightMap {
    /// `(rows, cols)`, that is `(y cells, x cells)`.
    pub fn shape(&self) -> (usize, usize) {
        self.z.dim()
    }

    /// Measurement mask as booleans.
    pub fn measured(&self) -> Array2<bool> {
        self.mask.mapv(|v| v > 0.0)
    }

    /// Cells as an `[N, 3]` point set, optionally only the measured ones.
    pub fn to_cloud(&self, measured_only: bool) -> Array2<f32> {
        let mut points = Vec::with_capacity(self.z.len() * 3);
        Zip::from(&self.x)
            .and(&self.y)
            .and(&self.z)
            .and(&self.mask)
            .for_each(|x, y, z, mask| {
                if !measured_only || *mask > 0.0 {
                    points.extend_from_slice(&[*x, *y, *z]);
                }
            });

        let len = points.len() / 3;
        Array2::from_shape_vec((len, 3), points).unwrap_or_else(|_| Array2::zeros((0, 3)))
    }

    /// Elevations rescaled to `[0, 1]` between the `qlow` and `qhigh` quantiles.
    /// Non finite elevations are left out of the quantiles.
    ///
    /// # Arguments
    ///
    /// * `qlow` - Lower quantile, in `[0, 1)`.
    /// * `qhigh` - Upper quantile, in `(qlow, 1]`.
    /// * `eps` - Smallest quantile span used as divisor, positive.
    pub fn normalized(&self, qlow: f32, qhigh: f32, eps: f32) -> Result<Array2<f32>, Error> {
        if !(0.0 <= qlow && qlow < qhigh && qhigh <= 1.0) {
            return Err(Error::invalid_parameter(format!(
                "Quantiles must satisfy 0 <= qlow < qhigh <= 1, got {} and {}.",
                qlow, qhigh
            )));
        }
        if !(eps > 0.0) {
            return Err(Error::invalid_parameter(format!("eps must be positive, got {}.", eps)));
        }

        let mut sorted = self
            .z
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .collect::<Vec<f32>>();
        if sorted.is_empty() {
            return Err(Error::invalid_parameter(
                "Height map has no finite elevation to normalize.",
            ));
        }
        sorted.sort_by_key(|v| OrderedFloat(*v));

        let low = quantile(&sorted, qlow);
        let high = quantile(&sorted, qhigh);
        let span = (high - low).max(eps);
        Ok(self.z.mapv(|v| num::clamp((v - low) / span, 0.0, 1.0)))
    }
}

/// Linearly interpolated quantile of sorted, non empty values.
fn quantile(sorted: &[f32], q: f32) -> f32 {
    let position = q * (sorted.len() - 1) as f32;
    let below = position.floor() as usize;
    let above = (below + 1).min(sorted.len() - 1);
    let frac = position - below as f32;
    sorted[below] + (sorted[above] - sorted[below]) * frac
}
