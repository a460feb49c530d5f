//! Explicitly sized worker pool for sector downloads.
//!
//! Wraps a dedicated `rayon::ThreadPool` owned by the scheduler instead of
//! rayon's global pool, so several schedulers (or tests) never share workers.
//!
//! # Usage
//!
//! ```ignore
//! let pool = DownloadPool::new(4)?;
//!
//! // Fire-and-forget, non-blocking
//! pool.spawn(move || fetch_sector());
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Owned thread pool running download closures.
pub struct DownloadPool {
  pool: rayon::ThreadPool,
  /// Jobs spawned but not yet finished.
  in_flight: Arc<AtomicUsize>,
}

impl DownloadPool {
  /// Create a pool with `num_threads` workers (at least one).
  pub fn new(num_threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
    let pool = rayon::ThreadPoolBuilder::new()
      .num_threads(num_threads.max(1))
      .thread_name(|i| format!("sector-download-{i}"))
      .build()?;

    Ok(Self {
      pool,
      in_flight: Arc::new(AtomicUsize::new(0)),
    })
  }

  /// Run `work` on a pool thread (non-blocking).
  pub fn spawn<F>(&self, work: F)
  where
    F: FnOnce() + Send + 'static,
  {
    let in_flight = Arc::clone(&self.in_flight);
    in_flight.fetch_add(1, Ordering::AcqRel);
    self.pool.spawn(move || {
      work();
      in_flight.fetch_sub(1, Ordering::AcqRel);
    });
  }

  /// Number of worker threads.
  pub fn num_threads(&self) -> usize {
    self.pool.current_num_threads()
  }

  /// Number of spawned jobs that have not finished.
  pub fn in_flight(&self) -> usize {
    self.in_flight.load(Ordering::Acquire)
  }
}
