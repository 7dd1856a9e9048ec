use ndarray::parallel::prelude::*;
use ndarray::prelude::*;
use ordered_float::OrderedFloat;

use crate::error::Error;

const LEAF_SIZE: usize = 16;

enum KdNode {
    Leaf {
        points: Array2<f32>,
        indices: Vec<usize>,
    },
    NonLeaf {
        axis: usize,
        middle_value: f32,
        left: Box<KdNode>,
        right: Box<KdNode>,
    },
}

/// KdTree for exact nearest neighbor search over points of any dimension.
pub struct KdTree {
    root: Box<KdNode>,
    dim: usize,
}

impl KdTree {
    /// Create a new KdTree from a set of points.
    /// The points are stored in a 2D array, where each row is a point.
    ///
    /// # Arguments
    ///
    /// * points - 2D array of points, must have at least one row.
    pub fn new(points: &ArrayView2<f32>) -> Result<Self, Error> {
        // Recursive creation.
        fn rec(points: &ArrayView2<f32>, mut indices: Vec<usize>, depth: usize) -> KdNode {
            // Stop recursion if this should be a leaf node.
            if indices.len() <= LEAF_SIZE {
                return KdNode::Leaf {
                    points: points.select(Axis(0), &indices),
                    indices,
                };
            }

            let k = depth % points.ncols();
            indices.sort_by_key(|idx| OrderedFloat(points[[*idx, k]]));

            let mid = indices.len() / 2;
            KdNode::NonLeaf {
                axis: k,
                middle_value: points[[indices[mid], k]],
                left: Box::new(rec(points, indices[0..mid].to_vec(), depth + 1)),
                right: Box::new(rec(points, indices[mid..].to_vec(), depth + 1)),
            }
        }

        if points.nrows() == 0 || points.ncols() == 0 {
            return Err(Error::invalid_parameter(
                "Can't build a KdTree without points.",
            ));
        }

        let indices = Vec::from_iter(0..points.nrows());
        Ok(KdTree {
            root: Box::new(rec(points, indices, 0)),
            dim: points.ncols(),
        })
    }

    /// Dimension of the indexed points.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Find the nearest neighbor to a query point.
    /// Among equally distant points the one with the lowest index wins.
    ///
    /// # Arguments
    ///
    /// * query - The query point, with [`Self::dim`] coordinates.
    ///
    /// # Returns
    ///
    /// A tuple containing the index of the nearest neighbor and the squared distance to it.
    pub fn nearest_point(&self, query: &ArrayView1<f32>) -> (usize, f32) {
        fn rec(node: &KdNode, query: &ArrayView1<f32>, best: &mut (usize, f32)) {
            match node {
                KdNode::NonLeaf {
                    axis,
                    middle_value,
                    left,
                    right,
                } => {
                    let diff = query[*axis] - middle_value;
                    let (near, far) = if diff < 0.0 {
                        (left, right)
                    } else {
                        (right, left)
                    };
                    rec(near, query, best);
                    if diff * diff <= best.1 {
                        rec(far, query, best);
                    }
                }
                KdNode::Leaf { points, indices } => {
                    for (leaf_point, index) in points.rows().into_iter().zip(indices.iter()) {
                        let dist = leaf_point
                            .iter()
                            .zip(query.iter())
                            .map(|(a, b)| (a - b) * (a - b))
                            .sum::<f32>();
                        if dist < best.1 || (dist == best.1 && *index < best.0) {
                            *best = (*index, dist);
                        }
                    }
                }
            }
        }

        let mut best = (usize::MAX, f32::INFINITY);
        rec(&self.root, query, &mut best);
        best
    }

    /// Finds the nearest neighbor index of each query row, in parallel.
    pub fn nearest(&self, queries: &ArrayView2<f32>) -> Array1<usize> {
        let found = queries
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|query| self.nearest_point(&query).0)
            .collect::<Vec<usize>>();
        Array1::from_vec(found)
    }
}
