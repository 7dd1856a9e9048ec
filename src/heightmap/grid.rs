use ndarray::{Array1, Array2, ArrayView1};

/// Uniformly spaced grid coordinates along one axis, `linspace(-half_extent, half_extent, len)`.
#[derive(Clone, Debug, PartialEq)]
pub struct GridAxis {
    values: Array1<f32>,
}

impl GridAxis {
    pub fn new(half_extent: f32, len: usize) -> Self {
        Self {
            values: Array1::linspace(-half_extent, half_extent, len),
        }
    }

    pub fn values(&self) -> ArrayView1<f32> {
        self.values.view()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index of the grid coordinate closest to `value`. Coordinates outside the axis snap
    /// to its ends, exact midpoints go to the lower index.
    pub fn nearest_index(&self, value: f32) -> usize {
        let len = self.values.len();
        if len < 2 {
            return 0;
        }

        let start = self.values[0];
        let step = self.values[1] - start;
        let guess = ((value - start) / step).floor();
        let guess = if guess.is_nan() || guess < 0.0 {
            0
        } else {
            (guess as usize).min(len - 1)
        };

        let mut best = guess.saturating_sub(1);
        for index in best + 1..=(guess + 1).min(len - 1) {
            if (self.values[index] - value).abs() < (self.values[best] - value).abs() {
                best = index;
            }
        }
        best
    }
}

/// Coordinate matrices of shape `[y.len(), x.len()]`, with `x[[row, col]] = x_axis[col]`
/// and `y[[row, col]] = y_axis[row]`.
pub fn meshgrid(x_axis: &GridAxis, y_axis: &GridAxis) -> (Array2<f32>, Array2<f32>) {
    let shape = (y_axis.len(), x_axis.len());
    (
        Array2::from_shape_fn(shape, |(_, col)| x_axis.values[col]),
        Array2::from_shape_fn(shape, |(row, _)| y_axis.values[row]),
    )
}
