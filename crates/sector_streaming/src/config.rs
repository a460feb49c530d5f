//! Streaming configuration, loadable from RON.
//!
//! ```ron
//! (
//!     scheduler: (max_concurrent_downloads: 20),
//!     octree: (screen_area_threshold: 0.025),
//! )
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::octree::OctreeConfig;

/// Download scheduler settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
  /// Upper bound on downloads in flight at once.
  pub max_concurrent_downloads: usize,
  /// Worker threads in the download pool. 0 = one per download slot.
  pub worker_threads: usize,
}

impl SchedulerConfig {
  pub fn with_max_concurrent_downloads(max_concurrent_downloads: usize) -> Self {
    Self {
      max_concurrent_downloads,
      ..Self::default()
    }
  }

  /// Worker count after resolving the `0 = auto` convention.
  #[inline]
  pub fn effective_worker_threads(&self) -> usize {
    if self.worker_threads == 0 {
      self.max_concurrent_downloads
    } else {
      self.worker_threads
    }
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.max_concurrent_downloads == 0 {
      return Err(ConfigError::Invalid(
        "max_concurrent_downloads must be at least 1".into(),
      ));
    }
    Ok(())
  }
}

impl Default for SchedulerConfig {
  fn default() -> Self {
    Self {
      max_concurrent_downloads: 20,
      worker_threads: 0,
    }
  }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StreamingConfig {
  pub scheduler: SchedulerConfig,
  pub octree: OctreeConfig,
}

impl StreamingConfig {
  /// Read and validate a RON config file.
  pub fn read_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let reader = std::fs::File::open(path)?;
    let config: Self = ron::de::from_reader(reader)?;
    config.validate()?;
    Ok(config)
  }

  /// Parse and validate a RON string.
  pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
    let config: Self = ron::from_str(source)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    self.scheduler.validate()?;
    self.octree.validate()
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
