//! Stateless point filters. Every filter has a cloud form, returning a new point cloud,
//! and a mask form, aligned 1:1 with the input, for composing with other masks.
//! Grid decimation selects representatives instead, so its second form returns indices.

use ndarray::{Array1, Array2, ArrayView1, Zip};

mod range;
pub use range::{filter_range, filter_range_mask};
mod grid;
pub use grid::{filter_grid, filter_grid_indices, Keep};
mod cylinder;
pub use cylinder::{filter_cylinder, filter_cylinder_mask, Axis3};
mod validity;
pub use validity::valid_point_mask;

/// Evaluates `predicate` on every `[N, 3]` position row, in parallel.
pub(crate) fn point_mask<F>(positions: &Array2<f32>, predicate: F) -> Array1<bool>
where
    F: Fn(ArrayView1<f32>) -> bool + Send + Sync,
{
    Zip::from(positions.rows()).par_map_collect(predicate)
}

pub(crate) fn kept_ratio(kept: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        kept as f32 / total as f32
    }
}

pub(crate) fn count_true(mask: &Array1<bool>) -> usize {
    mask.iter().filter(|keep| **keep).count()
}
