use ndarray::{Array2, ArrayView2};

use super::{
    config::HeightmapConfig,
    grid::{meshgrid, GridAxis},
};
use crate::error::Error;

/// Turns a height grid back into an unordered `[N, 3]` point set.
///
/// The grid coordinates are rebuilt from `config.d_max` and the grid shape exactly as
/// [`super::HeightmapEstimator`] builds them, rows along y and columns along x.
///
/// # Arguments
///
/// * `z` - Elevations, indexed `[y index, x index]`.
/// * `config` - Only `d_max` is used.
/// * `mask` - When given, only the cells where it is true are returned.
pub fn heightmap_to_cloud(
    z: &ArrayView2<f32>,
    config: &HeightmapConfig,
    mask: Option<&ArrayView2<bool>>,
) -> Result<Array2<f32>, Error> {
    if !(config.d_max.is_finite() && config.d_max >= 0.0) {
        return Err(Error::invalid_parameter(format!(
            "d_max must be finite and non-negative, got {}.",
            config.d_max
        )));
    }
    if let Some(mask) = mask {
        if mask.shape() != z.shape() {
            return Err(Error::invalid_parameter(format!(
                "Mask shape {:?} doesn't match the height shape {:?}.",
                mask.shape(),
                z.shape()
            )));
        }
    }

    let (rows, cols) = z.dim();
    let (x, y) = meshgrid(
        &GridAxis::new(config.d_max, cols),
        &GridAxis::new(config.d_max, rows),
    );

    let mut points = Vec::with_capacity(rows * cols * 3);
    for ((cell, height), (x, y)) in z.indexed_iter().zip(x.iter().zip(y.iter())) {
        if mask.map_or(true, |mask| mask[cell]) {
            points.extend_from_slice(&[*x, *y, *height]);
        }
    }

    let len = points.len() / 3;
    Array2::from_shape_vec((len, 3), points)
        .map_err(|err| Error::invalid_parameter(err.to_string()))
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Array2};

    use super::heightmap_to_cloud;
    use crate::heightmap::HeightmapConfig;

    #[test]
    fn test_flattens_grid() {
        let config = HeightmapConfig::default().d_max(1.0);
        let z = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let cloud = heightmap_to_cloud(&z.view(), &config, None).unwrap();

        assert_eq!(
            cloud,
            array![
                [-1.0, -1.0, 1.0],
                [0.0, -1.0, 2.0],
                [1.0, -1.0, 3.0],
                [-1.0, 1.0, 4.0],
                [0.0, 1.0, 5.0],
                [1.0, 1.0, 6.0]
            ]
        );
    }

    #[test]
    fn test_mask_selects_cells() {
        let config = HeightmapConfig::default().d_max(1.0);
        let z = array![[1.0, 2.0], [3.0, 4.0]];
        let mask = array![[false, true], [false, false]];
        let cloud = heightmap_to_cloud(&z.view(), &config, Some(&mask.view())).unwrap();

        assert_eq!(cloud, array![[1.0, -1.0, 2.0]]);

        let none = Array2::from_elem((2, 2), false);
        assert_eq!(
            heightmap_to_cloud(&z.view(), &config, Some(&none.view()))
                .unwrap()
                .nrows(),
            0
        );
    }

    #[test]
    fn test_rejects_mismatched_mask() {
        let config = HeightmapConfig::default();
        let z = Array2::<f32>::zeros((2, 2));
        let mask = Array2::from_elem((2, 3), true);
        assert!(heightmap_to_cloud(&z.view(), &config, Some(&mask.view())).is_err());
    }
}
