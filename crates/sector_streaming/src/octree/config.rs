//! OctreeConfig - build limits and screen-space LOD threshold for the icon
//! octree.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Deepest octree level a config may ask for. Builds recurse once per level.
pub const MAX_OCTREE_DEPTH: u32 = 32;

/// Configuration for building and querying a [`PointOctree`](super::PointOctree).
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OctreeConfig {
  /// A leaf splits into eight octants once it holds more items than this.
  pub max_points_per_leaf: usize,

  /// Leaves at this depth never split; co-located items share them.
  /// At most [`MAX_OCTREE_DEPTH`].
  pub max_depth: u32,

  /// Minimum projected area (fraction of the viewport, 0..=1) a child octant
  /// must cover for its parent to be expanded.
  pub screen_area_threshold: f64,

  /// Capacity of the aggregate proxy pool.
  pub max_aggregate_proxies: usize,
}

impl OctreeConfig {
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.max_points_per_leaf == 0 {
      return Err(ConfigError::Invalid(
        "max_points_per_leaf must be at least 1".into(),
      ));
    }
    if self.max_depth > MAX_OCTREE_DEPTH {
      return Err(ConfigError::Invalid(format!(
        "max_depth must be at most {MAX_OCTREE_DEPTH}, got {}",
        self.max_depth
      )));
    }
    if !self.screen_area_threshold.is_finite() || self.screen_area_threshold < 0.0 {
      return Err(ConfigError::Invalid(format!(
        "screen_area_threshold must be finite and non-negative, got {}",
        self.screen_area_threshold
      )));
    }
    Ok(())
  }
}

impl Default for OctreeConfig {
  fn default() -> Self {
    Self {
      max_points_per_leaf: 2,
      max_depth: 8,
      screen_area_threshold: 0.025,
      max_aggregate_proxies: 1000,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
