use std::collections::BTreeMap;

use ndarray::prelude::*;
use ndarray::{Array1, Array2};

use crate::error::Error;

/// Point cloud with named per-point fields (x, y, z and optional extras like r, g, b).
/// Field order is not significant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldedCloud {
    fields: BTreeMap<String, Array1<f32>>,
    len: usize,
}

impl FieldedCloud {
    /// Creates a fielded cloud from `(name, values)` pairs.
    ///
    /// # Arguments
    ///
    /// * `fields` - Named columns, all of them must have the same length.
    pub fn from_fields<I, S>(fields: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (S, Array1<f32>)>,
        S: Into<String>,
    {
        let mut cloud = Self::default();
        for (name, values) in fields {
            cloud.insert(name, values)?;
        }
        Ok(cloud)
    }

    /// Adds or replaces a field.
    pub fn insert<S: Into<String>>(&mut self, name: S, values: Array1<f32>) -> Result<(), Error> {
        let name = name.into();
        if !self.fields.is_empty() && values.len() != self.len {
            return Err(Error::invalid_parameter(format!(
                "Field {} has {} values, but the cloud has {} points.",
                name,
                values.len(),
                self.len
            )));
        }
        self.len = values.len();
        self.fields.insert(name, values);
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<ArrayView1<f32>> {
        self.fields.get(name).map(|values| values.view())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(|name| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stacks the given fields as columns of a `[N, names.len()]` array.
    fn stack(&self, names: &[&str]) -> Result<Array2<f32>, Error> {
        let mut result = Array2::<f32>::zeros((self.len, names.len()));
        for (name, mut column) in names.iter().zip(result.axis_iter_mut(Axis(1))) {
            let values = self.field(name).ok_or_else(|| {
                Error::invalid_parameter(format!("Point cloud has no field named {}.", name))
            })?;
            column.assign(&values);
        }
        Ok(result)
    }

    fn select(&self, indices: &[usize]) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .map(|(name, values)| (name.clone(), values.select(Axis(0), indices)))
                .collect(),
            len: indices.len(),
        }
    }
}

/// Point cloud as handed over by sensors or datasets.
#[derive(Clone, Debug, PartialEq)]
pub enum PointCloud {
    /// Numeric buffer of shape `[N, C]`, `C >= 3`. The first three columns are the position.
    Plain(Array2<f32>),
    /// Record array with named fields.
    Fielded(FieldedCloud),
}

impl PointCloud {
    /// Creates a plain point cloud checking that it has at least three columns.
    pub fn from_array(points: Array2<f32>) -> Result<Self, Error> {
        if points.ncols() < 3 {
            return Err(Error::invalid_parameter(format!(
                "Point array must have at least 3 columns, got {}.",
                points.ncols()
            )));
        }
        Ok(PointCloud::Plain(points))
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        match self {
            PointCloud::Plain(points) => points.nrows(),
            PointCloud::Fielded(cloud) => cloud.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point positions as a new `[N, 3]` array. The cloud layout is left untouched.
    pub fn positions(&self) -> Result<Array2<f32>, Error> {
        match self {
            PointCloud::Plain(points) => {
                if points.ncols() < 3 {
                    return Err(Error::invalid_parameter(format!(
                        "Point array must have at least 3 columns, got {}.",
                        points.ncols()
                    )));
                }
                Ok(points.slice(s![.., ..3]).to_owned())
            }
            PointCloud::Fielded(cloud) => cloud.stack(&["x", "y", "z"]),
        }
    }

    /// Point colors as a new `[N, 3]` array. Plain clouds must carry them in columns 3 to 5.
    pub fn colors(&self) -> Result<Array2<f32>, Error> {
        match self {
            PointCloud::Plain(points) => {
                if points.ncols() < 6 {
                    return Err(Error::invalid_parameter(format!(
                        "Point array must have at least 6 columns to carry colors, got {}.",
                        points.ncols()
                    )));
                }
                Ok(points.slice(s![.., 3..6]).to_owned())
            }
            PointCloud::Fielded(cloud) => cloud.stack(&["r", "g", "b"]),
        }
    }

    /// New point cloud with the points at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        match self {
            PointCloud::Plain(points) => PointCloud::Plain(points.select(Axis(0), indices)),
            PointCloud::Fielded(cloud) => PointCloud::Fielded(cloud.select(indices)),
        }
    }

    /// New point cloud with the points where `mask` is true.
    pub fn select_mask(&self, mask: &ArrayView1<bool>) -> Result<Self, Error> {
        if mask.len() != self.len() {
            return Err(Error::invalid_parameter(format!(
                "Mask length {} doesn't match the point count {}.",
                mask.len(),
                self.len()
            )));
        }
        let indices = mask
            .iter()
            .enumerate()
            .filter_map(|(i, keep)| if *keep { Some(i) } else { None })
            .collect::<Vec<_>>();
        Ok(self.select(&indices))
    }
}

impl From<FieldedCloud> for PointCloud {
    fn from(cloud: FieldedCloud) -> Self {
        PointCloud::Fielded(cloud)
    }
}
