use nalgebra::{Matrix2, Vector2};
use ndarray::{s, Array2};
use spade::{DelaunayTriangulation, FloatTriangulation, HasPosition, Point2, Triangulation};

use super::{config::InterpMethod, grid::GridAxis};
use crate::{error::Error, kdtree::KdTree};

/// Sibson C1 blend between the natural neighbor and the gradient based estimates.
const CUBIC_FLATNESS: f64 = 0.5;

struct HeightSample {
    position: Point2<f64>,
    height: f64,
}

impl HasPosition for HeightSample {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}

type HeightTriangulation = DelaunayTriangulation<HeightSample>;

fn triangulate(points: &Array2<f32>, method: InterpMethod) -> Result<HeightTriangulation, Error> {
    let samples = points
        .rows()
        .into_iter()
        .map(|point| HeightSample {
            position: Point2::new(point[0] as f64, point[1] as f64),
            height: point[2] as f64,
        })
        .collect::<Vec<_>>();

    let triangulation = HeightTriangulation::bulk_load(samples).map_err(|err| {
        Error::invalid_parameter(format!("Can't triangulate the points: {:?}", err))
    })?;
    if triangulation.num_inner_faces() == 0 {
        return Err(Error::insufficient_points(format!(
            "{:?} interpolation needs at least 3 non collinear points, got {} vertices.",
            method,
            triangulation.num_vertices()
        )));
    }
    Ok(triangulation)
}

/// Least squares plane slope through each vertex and its Delaunay neighbors.
/// Indexed like `triangulation.vertices()`.
fn estimate_gradients(triangulation: &HeightTriangulation) -> Vec<[f64; 2]> {
    triangulation
        .vertices()
        .map(|vertex| {
            let center = vertex.position();
            let height = vertex.data().height;

            let mut normal = Matrix2::<f64>::zeros();
            let mut rhs = Vector2::<f64>::zeros();
            for edge in vertex.out_edges() {
                let neighbor = edge.to();
                let offset = Vector2::new(
                    neighbor.position().x - center.x,
                    neighbor.position().y - center.y,
                );
                normal += offset * offset.transpose();
                rhs += offset * (neighbor.data().height - height);
            }

            normal
                .try_inverse()
                .map(|inverse| {
                    let gradient = inverse * rhs;
                    [gradient[0], gradient[1]]
                })
                .unwrap_or([0.0, 0.0])
        })
        .collect()
}

/// Interpolates the elevation of `[N, 3]` points at every grid node.
///
/// # Returns
///
/// Elevations indexed `[x index, y index]`. Nodes the method can't reach get `fill_value`.
pub(crate) fn interpolate_grid(
    points: &Array2<f32>,
    x_axis: &GridAxis,
    y_axis: &GridAxis,
    method: InterpMethod,
    fill_value: f32,
) -> Result<Array2<f32>, Error> {
    let shape = (x_axis.len(), y_axis.len());
    let (xs, ys) = (x_axis.values(), y_axis.values());

    match method {
        InterpMethod::None => Err(Error::invalid_parameter(
            "Binned height maps are not interpolated.",
        )),
        InterpMethod::Nearest => {
            let tree = KdTree::new(&points.slice(s![.., ..2]))?;
            let nodes = Array2::from_shape_fn((shape.0 * shape.1, 2), |(node, coord)| {
                if coord == 0 {
                    xs[node / shape.1]
                } else {
                    ys[node % shape.1]
                }
            });
            let nearest = tree.nearest(&nodes.view());
            Ok(Array2::from_shape_fn(shape, |(ix, iy)| {
                points[[nearest[ix * shape.1 + iy], 2]]
            }))
        }
        InterpMethod::Linear => {
            let triangulation = triangulate(points, method)?;
            let barycentric = triangulation.barycentric();
            Ok(Array2::from_shape_fn(shape, |(ix, iy)| {
                barycentric
                    .interpolate(
                        |vertex| vertex.data().height,
                        Point2::new(xs[ix] as f64, ys[iy] as f64),
                    )
                    .map(|height| height as f32)
                    .unwrap_or(fill_value)
            }))
        }
        InterpMethod::Cubic => {
            let triangulation = triangulate(points, method)?;
            let gradients = estimate_gradients(&triangulation);
            let natural_neighbor = triangulation.natural_neighbor();
            Ok(Array2::from_shape_fn(shape, |(ix, iy)| {
                natural_neighbor
                    .interpolate_gradient(
                        |vertex| vertex.data().height,
                        |vertex| gradients[vertex.fix().index()],
                        CUBIC_FLATNESS,
                        Point2::new(xs[ix] as f64, ys[iy] as f64),
                    )
                    .map(|height| height as f32)
                    .unwrap_or(fill_value)
            }))
        }
    }
}
