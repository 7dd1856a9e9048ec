use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::RngCore;
use rayon::prelude::*;

use super::kept_ratio;
use crate::{error::Error, pointcloud::PointCloud};

/// Which point survives when several fall into the same grid cell.
pub enum Keep<'a> {
    /// The first one in input order. Output keeps the input order.
    First,
    /// A random one. The points are visited in an order shuffled with the given source.
    Random(&'a mut dyn RngCore),
    /// The last one in input order. Output is in reversed input order.
    Last,
}

impl std::fmt::Debug for Keep<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Keep::First => write!(f, "First"),
            Keep::Random(_) => write!(f, "Random"),
            Keep::Last => write!(f, "Last"),
        }
    }
}

/// Indices, into `cloud`, of a single point per occupied cell of side `grid_res`.
///
/// # Arguments
///
/// * `cloud` - Input cloud, must not be empty.
/// * `grid_res` - Cell side.
/// * `keep` - Survivor policy, see [`Keep`].
///
/// # Returns
///
/// Indices in visiting order, see [`Keep`].
pub fn filter_grid_indices(
    cloud: &PointCloud,
    grid_res: f32,
    keep: Keep,
) -> Result<Vec<usize>, Error> {
    if !(grid_res.is_finite() && grid_res > 0.0) {
        return Err(Error::invalid_parameter(format!(
            "Grid resolution must be positive, got {}.",
            grid_res
        )));
    }
    if cloud.is_empty() {
        return Err(Error::invalid_parameter("Can't decimate an empty point cloud."));
    }

    let positions = cloud.positions()?;
    let cells = (0..positions.nrows())
        .into_par_iter()
        .map(|index| {
            let point = positions.row(index);
            (
                (point[0] / grid_res).floor() as i64,
                (point[1] / grid_res).floor() as i64,
                (point[2] / grid_res).floor() as i64,
            )
        })
        .collect::<Vec<_>>();

    let mut order = (0..cloud.len()).collect::<Vec<usize>>();
    match keep {
        Keep::First => {}
        Keep::Random(rng) => order.shuffle(rng),
        Keep::Last => order.reverse(),
    }

    let mut occupied = HashSet::with_capacity(order.len());
    let indices = order
        .into_iter()
        .filter(|index| occupied.insert(cells[*index]))
        .collect::<Vec<usize>>();

    log::debug!(
        "{:.3} = {} / {} points kept (grid res. {:.3} m).",
        kept_ratio(indices.len(), cloud.len()),
        indices.len(),
        cloud.len(),
        grid_res
    );
    Ok(indices)
}

/// Keeps a single point per occupied cell of side `grid_res`.
/// See [`filter_grid_indices`].
pub fn filter_grid(cloud: &PointCloud, grid_res: f32, keep: Keep) -> Result<PointCloud, Error> {
    let indices = filter_grid_indices(cloud, grid_res, keep)?;
    Ok(cloud.select(&indices))
}
