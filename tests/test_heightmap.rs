use approx::assert_abs_diff_eq;
use heightmap3d::{
    heightmap::{heightmap_to_cloud, HeightMap, HeightmapConfig, HeightmapEstimator, InterpMethod},
    pointcloud::PointCloud,
    transform::Transform,
};
use ndarray::{array, s, Array1, Array2};
use rstest::*;

/// Lattice of points covering `[-1.9, 1.9]^2` at constant elevation.
fn flat_cloud(elevation: f32) -> PointCloud {
    let mut points = Vec::new();
    for i in 0..39 {
        for j in 0..39 {
            points.extend_from_slice(&[-1.9 + 0.1 * i as f32, -1.9 + 0.1 * j as f32, elevation]);
        }
    }
    PointCloud::from_array(Array2::from_shape_vec((39 * 39, 3), points).unwrap()).unwrap()
}

fn flat(grid: &Array2<f32>) -> Array1<f32> {
    grid.iter().copied().collect()
}

#[fixture]
fn config() -> HeightmapConfig {
    HeightmapConfig::default()
        .d_max(2.0)
        .grid_res(0.5)
        .robot_size(None)
        .fill_value(-10.0)
}

fn estimate(cloud: &PointCloud, config: &HeightmapConfig) -> HeightMap {
    HeightmapEstimator::new(config.clone())
        .unwrap()
        .estimate(cloud, &Transform::eye())
        .unwrap()
        .unwrap()
}

#[rstest]
#[case(InterpMethod::None)]
#[case(InterpMethod::Nearest)]
#[case(InterpMethod::Linear)]
#[case(InterpMethod::Cubic)]
fn test_flat_terrain(config: HeightmapConfig, #[case] method: InterpMethod) {
    let heightmap = estimate(&flat_cloud(0.25), &config.hm_interp_method(method));
    assert_eq!(heightmap.shape(), (8, 8));

    match method {
        InterpMethod::None => {
            assert!(heightmap.mask.sum() > 0.0);
            for (z, measured) in heightmap.z.iter().zip(heightmap.measured().iter()) {
                assert_eq!(*z, if *measured { 0.25 } else { -10.0 });
            }
        }
        InterpMethod::Nearest => {
            assert!(heightmap.z.iter().all(|z| *z == 0.25));
        }
        _ => {
            // The outer ring of nodes lies outside the convex hull of the points.
            assert_abs_diff_eq!(
                heightmap.z.slice(s![1..7, 1..7]).to_owned(),
                Array2::from_elem((6, 6), 0.25),
                epsilon = 1e-4
            );
            assert_eq!(heightmap.z[[0, 0]], -10.0);
        }
    }
}

#[rstest]
fn test_cloud_round_trip(config: HeightmapConfig) {
    let config = config.hm_interp_method(InterpMethod::None);
    let points = array![[1.2, -0.3, 0.4], [-1.6, 1.1, 0.1], [0.2, 1.9, -0.2]];
    let cloud = PointCloud::from_array(points).unwrap();
    let heightmap = estimate(&cloud, &config);

    let points = heightmap_to_cloud(&heightmap.z.view(), &config, None).unwrap();
    assert_eq!(points.nrows(), 64);
    assert_eq!(points.column(0), flat(&heightmap.x));
    assert_eq!(points.column(1), flat(&heightmap.y));
    assert_eq!(points.column(2), flat(&heightmap.z));

    let measured = heightmap_to_cloud(
        &heightmap.z.view(),
        &config,
        Some(&heightmap.measured().view()),
    )
    .unwrap();
    assert_eq!(measured.nrows(), 3);
    assert_eq!(measured, heightmap.to_cloud(true));
}

#[rstest]
fn test_robot_disk_boundary(config: HeightmapConfig) {
    let estimator = HeightmapEstimator::new(
        config
            .robot_size(Some(1.0))
            .hm_interp_method(InterpMethod::None),
    )
    .unwrap();

    let (_, points) = estimator
        .estimate_with_points(
            &PointCloud::from_array(array![
                [0.499, 0.0, 0.0],
                [0.5, 0.0, 0.0],
                [0.0, -0.501, 0.0],
                [0.3, 0.3, 0.0],
            ])
            .unwrap(),
            &Transform::eye(),
        )
        .unwrap()
        .unwrap();
    assert_eq!(points, array![[0.0, -0.501, 0.0]]);
}

#[rstest]
fn test_everything_filtered(config: HeightmapConfig) {
    let config = config.grass_range(Some([0.2, 0.3]));
    assert!(HeightmapEstimator::new(config)
        .unwrap()
        .estimate(&flat_cloud(0.25), &Transform::eye())
        .unwrap()
        .is_none());
}
