//! IconLodController - owns an icon octree and refreshes its visibility once
//! per rendered frame.

use glam::{DMat4, DVec3};
use web_time::Instant;

use super::{IconVisibility, LodSelection, OctreeConfig, PointOctree};
use crate::error::ConfigError;
use crate::metrics::StreamingMetrics;

/// Screen-space LOD for a fixed collection of icons.
pub struct IconLodController<T> {
  octree: PointOctree<T>,
  visibility: IconVisibility,
  screen_area_threshold: f64,
  last_selection: LodSelection,
  metrics: StreamingMetrics,
}

impl<T> IconLodController<T> {
  /// Build the octree for `icons`. Nothing is visible until the first
  /// [`on_render`](Self::on_render).
  pub fn new(
    icons: impl IntoIterator<Item = (DVec3, T)>,
    config: &OctreeConfig,
  ) -> Result<Self, ConfigError> {
    config.validate()?;
    let octree = PointOctree::build(icons, config);
    let visibility = IconVisibility::new(octree.len(), config.max_aggregate_proxies);

    Ok(Self {
      octree,
      visibility,
      screen_area_threshold: config.screen_area_threshold,
      last_selection: LodSelection::default(),
      metrics: StreamingMetrics::default(),
    })
  }

  /// Per-frame hook: select against `view_projection` and rebuild visibility.
  pub fn on_render(&mut self, view_projection: &DMat4) -> &IconVisibility {
    let start = Instant::now();
    self.last_selection = self
      .octree
      .select(view_projection, self.screen_area_threshold);
    self.visibility.apply(&self.octree, &self.last_selection);
    self
      .metrics
      .record_select_timing(start.elapsed().as_micros() as u64);

    &self.visibility
  }

  pub fn octree(&self) -> &PointOctree<T> {
    &self.octree
  }

  pub fn visibility(&self) -> &IconVisibility {
    &self.visibility
  }

  /// Selection computed by the last [`on_render`](Self::on_render).
  pub fn last_selection(&self) -> &LodSelection {
    &self.last_selection
  }

  pub fn screen_area_threshold(&self) -> f64 {
    self.screen_area_threshold
  }

  /// Takes effect on the next frame.
  pub fn set_screen_area_threshold(&mut self, threshold: f64) -> Result<(), ConfigError> {
    if !threshold.is_finite() || threshold < 0.0 {
      return Err(ConfigError::Invalid(format!(
        "screen_area_threshold must be finite and non-negative, got {threshold}"
      )));
    }
    self.screen_area_threshold = threshold;
    Ok(())
  }

  pub fn metrics(&self) -> &StreamingMetrics {
    &self.metrics
  }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;
