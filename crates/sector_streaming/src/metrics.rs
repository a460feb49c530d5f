//! Engine-agnostic metrics for sector streaming and icon LOD selection.
//!
//! Feature-gated and runtime-toggled to ensure zero overhead when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use sector_streaming::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let snapshot = scheduler.metrics();
//! println!("avg download: {:.1}us", snapshot.avg_download_timing_us());
//! ```

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Rolling window for storing recent values (e.g., timing history).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  /// Create a new rolling window with the given capacity.
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Push a new value, evicting the oldest if at capacity.
  pub fn push(&mut self, value: T) {
    if self.capacity == 0 {
      return;
    }
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Iterate over values (oldest to newest).
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.buffer.iter()
  }

  /// Get the most recent value.
  pub fn last(&self) -> Option<&T> {
    self.buffer.back()
  }
}

impl RollingWindow<u64> {
  pub fn sum(&self) -> u64 {
    self.buffer.iter().sum()
  }

  /// Average of all values, 0 when empty.
  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.sum() as f64 / self.buffer.len() as f64
    }
  }

  /// Get min and max values.
  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = self.buffer.iter().min()?;
    let max = self.buffer.iter().max()?;
    Some((*min, *max))
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(128) // ~2 seconds at 60fps
  }
}

/// Download and selection statistics.
///
/// Counters are cumulative for the lifetime of the scheduler; timings are
/// rolling windows.
#[derive(Debug, Clone, Default)]
pub struct StreamingMetrics {
  /// Downloads handed to the pool.
  pub downloads_started: u64,
  /// Downloads that returned geometry (or an empty sector).
  pub downloads_completed: u64,
  /// Downloads that errored or panicked and were turned into discarded sectors.
  pub downloads_failed: u64,
  /// Queued sectors discarded before a slot was ever assigned.
  pub discarded_before_start: u64,
  /// Abort signals sent to running downloads.
  pub aborts_requested: u64,
  /// Download wall time in microseconds.
  pub download_timings: RollingWindow<u64>,
  /// Octree selection time in microseconds.
  pub select_timings: RollingWindow<u64>,
}

impl StreamingMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record_started(&mut self) {
    if is_enabled() {
      self.downloads_started += 1;
    }
  }

  /// Record the outcome of a finished download.
  pub fn record_finished(&mut self, succeeded: bool, timing_us: u64) {
    if !is_enabled() {
      return;
    }
    if succeeded {
      self.downloads_completed += 1;
    } else {
      self.downloads_failed += 1;
    }
    self.download_timings.push(timing_us);
  }

  pub fn record_discarded_before_start(&mut self) {
    if is_enabled() {
      self.discarded_before_start += 1;
    }
  }

  pub fn record_abort(&mut self) {
    if is_enabled() {
      self.aborts_requested += 1;
    }
  }

  pub fn record_select_timing(&mut self, timing_us: u64) {
    if is_enabled() {
      self.select_timings.push(timing_us);
    }
  }

  /// Downloads that have finished one way or another.
  pub fn downloads_finished(&self) -> u64 {
    self.downloads_completed + self.downloads_failed
  }

  pub fn avg_download_timing_us(&self) -> f64 {
    self.download_timings.average()
  }

  pub fn avg_select_timing_us(&self) -> f64 {
    self.select_timings.average()
  }
}
