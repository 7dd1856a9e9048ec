pub mod error;
pub mod pointcloud;
pub mod transform;

pub mod bounds;
pub mod filters;
pub mod gravity;
pub mod kdtree;

pub mod heightmap;
pub use heightmap::{estimate_heightmap, heightmap_to_cloud, HeightMap, HeightmapConfig};
