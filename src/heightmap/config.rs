use std::path::Path;
use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};

use crate::{error::Error, filters::filter_range, pointcloud::PointCloud};

/// How grid cells get their elevation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpMethod {
    /// Each point is snapped to its nearest grid node, highest point wins. Cells without
    /// points keep the fill value.
    None,
    /// Scattered nearest neighbor interpolation.
    Nearest,
    /// Piecewise linear interpolation over the Delaunay triangulation of the points.
    Linear,
    /// Smooth (C1) interpolation over the Delaunay triangulation of the points.
    Cubic,
}

impl Default for InterpMethod {
    fn default() -> Self {
        InterpMethod::Nearest
    }
}

impl FromStr for InterpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(InterpMethod::None),
            "nearest" => Ok(InterpMethod::Nearest),
            "linear" => Ok(InterpMethod::Linear),
            "cubic" => Ok(InterpMethod::Cubic),
            _ => Err(Error::invalid_parameter(format!(
                "Unknown interpolation method {}, expected one of none, nearest, linear, cubic.",
                s
            ))),
        }
    }
}

/// Parameters of the height map estimation. Distances are in meters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightmapConfig {
    /// Minimum range of the points used for the map, see [`HeightmapConfig::filter_range`].
    pub d_min: f32,
    /// Half side of the square map, the grid spans `[-d_max, d_max]` on both axes.
    pub d_max: f32,
    /// Cell size.
    pub grid_res: f32,
    /// Maximum gravity-aligned elevation of the points kept.
    pub h_max: f32,
    /// Diameter of the disk around the origin whose points are dropped. `None` keeps them.
    pub robot_size: Option<f32>,
    /// `[low, high]` elevation band dropped as ground clutter. `None` drops nothing.
    pub grass_range: Option<[f32; 2]>,
    pub hm_interp_method: InterpMethod,
    /// Elevation of the cells without data.
    pub fill_value: f32,
}

impl Default for HeightmapConfig {
    fn default() -> Self {
        Self {
            d_min: 1.0,
            d_max: 12.8,
            grid_res: 0.1,
            h_max: 1.0,
            robot_size: Some(1.0),
            grass_range: None,
            hm_interp_method: InterpMethod::Nearest,
            fill_value: 0.0,
        }
    }
}

impl HeightmapConfig {
    /// Parses the configuration from a JSON document. Missing keys take their default.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let buffer = std::io::BufReader::new(std::fs::File::open(path)?);
        let config: Self = serde_json::from_reader(buffer)?;
        config.validate()?;
        Ok(config)
    }

    pub fn d_min(mut self, value: f32) -> Self {
        self.d_min = value;
        self
    }

    pub fn d_max(mut self, value: f32) -> Self {
        self.d_max = value;
        self
    }

    pub fn grid_res(mut self, value: f32) -> Self {
        self.grid_res = value;
        self
    }

    pub fn h_max(mut self, value: f32) -> Self {
        self.h_max = value;
        self
    }

    pub fn robot_size(mut self, value: Option<f32>) -> Self {
        self.robot_size = value;
        self
    }

    pub fn grass_range(mut self, value: Option<[f32; 2]>) -> Self {
        self.grass_range = value;
        self
    }

    pub fn hm_interp_method(mut self, value: InterpMethod) -> Self {
        self.hm_interp_method = value;
        self
    }

    pub fn fill_value(mut self, value: f32) -> Self {
        self.fill_value = value;
        self
    }

    /// Number of grid nodes along each axis, `floor(2 * d_max / grid_res)`.
    pub fn grid_size(&self) -> usize {
        (2.0 * self.d_max / self.grid_res).floor() as usize
    }

    /// Checks every parameter, so estimation can't fail halfway on a bad configuration.
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.d_min.is_finite() && self.d_min >= 0.0) {
            return Err(Error::invalid_parameter(format!(
                "d_min must be finite and non-negative, got {}.",
                self.d_min
            )));
        }
        if !(self.d_max.is_finite() && self.d_max >= 0.0) {
            return Err(Error::invalid_parameter(format!(
                "d_max must be finite and non-negative, got {}.",
                self.d_max
            )));
        }
        if !(self.grid_res.is_finite() && self.grid_res > 0.0) {
            return Err(Error::invalid_parameter(format!(
                "grid_res must be finite and positive, got {}.",
                self.grid_res
            )));
        }
        if !self.h_max.is_finite() {
            return Err(Error::invalid_parameter(format!(
                "h_max must be finite, got {}.",
                self.h_max
            )));
        }
        if let Some(robot_size) = self.robot_size {
            if !(robot_size.is_finite() && robot_size > 0.0) {
                return Err(Error::invalid_parameter(format!(
                    "robot_size must be finite and positive, got {}.",
                    robot_size
                )));
            }
        }
        if let Some([low, high]) = self.grass_range {
            if !(low.is_finite() && high.is_finite() && low <= high) {
                return Err(Error::invalid_parameter(format!(
                    "grass_range must be a finite [low, high] band, got [{}, {}].",
                    low, high
                )));
            }
        }
        if self.grid_size() == 0 {
            return Err(Error::invalid_parameter(format!(
                "d_max {} and grid_res {} give an empty grid.",
                self.d_max, self.grid_res
            )));
        }
        Ok(())
    }

    /// Drops the points closer than `d_min` to the origin.
    pub fn filter_range(&self, cloud: &PointCloud) -> Result<PointCloud, Error> {
        filter_range(cloud, self.d_min, f32::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use ndarray::array;
    use rstest::*;

    use super::{HeightmapConfig, InterpMethod};
    use crate::pointcloud::PointCloud;

    #[test]
    fn test_defaults_are_valid() {
        let config = HeightmapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid_size(), 256);
        assert_eq!(config.hm_interp_method, InterpMethod::Nearest);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "d_max": 6.4,
            "grid_res": 0.1,
            "hm_interp_method": "none",
            "grass_range": [0.0, 0.2],
            "robot_size": null
        }"#;
        let config = HeightmapConfig::from_json_str(json).unwrap();

        assert_eq!(config.d_max, 6.4);
        assert_eq!(config.grid_size(), 128);
        assert_eq!(config.hm_interp_method, InterpMethod::None);
        assert_eq!(config.grass_range, Some([0.0, 0.2]));
        assert_eq!(config.robot_size, None);
        assert_eq!(config.h_max, 1.0);
    }

    #[test]
    fn test_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"grid_res": 0.2, "hm_interp_method": "cubic"}}"#).unwrap();

        let config = HeightmapConfig::load(file.path()).unwrap();
        assert_eq!(config.grid_res, 0.2);
        assert_eq!(config.hm_interp_method, InterpMethod::Cubic);
    }

    #[rstest]
    #[case(r#"{"grass_range": [0.0]}"#)]
    #[case(r#"{"grass_range": [0.5, 0.1]}"#)]
    #[case(r#"{"hm_interp_method": "quadratic"}"#)]
    #[case(r#"{"grid_res": 0.0}"#)]
    #[case(r#"{"grid_res": 30.0}"#)]
    #[case(r#"{"d_max": -1.0}"#)]
    #[case(r#"{"robot_size": 0.0}"#)]
    fn test_rejects_bad_configs(#[case] json: &str) {
        assert!(HeightmapConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_interp_method_from_str() {
        assert_eq!(
            "linear".parse::<InterpMethod>().unwrap(),
            InterpMethod::Linear
        );
        assert!("spline".parse::<InterpMethod>().is_err());
    }

    #[test]
    fn test_filter_range() {
        let cloud = PointCloud::from_array(array![[0.5, 0.0, 0.0], [2.0, 0.0, 0.0]]).unwrap();
        let config = HeightmapConfig::default().d_min(1.0);
        assert_eq!(config.filter_range(&cloud).unwrap().len(), 1);
    }
}
