//! Downloader seam: the caller-supplied function that actually fetches a sector.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::DownloadError;
use crate::sector::{ConsumedSector, WantedSector};

/// Advisory cancellation flag shared between the scheduler and a running download.
///
/// Setting it does not resolve anything by itself; the download still has to
/// return before its slot is freed.
#[derive(Clone, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
  pub fn new() -> Self {
    Self::default()
  }

  /// Ask the download to stop early.
  pub fn abort(&self) {
    self.0.store(true, Ordering::Release);
  }

  pub fn is_aborted(&self) -> bool {
    self.0.load(Ordering::Acquire)
  }
}

impl fmt::Debug for AbortSignal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "AbortSignal({})", self.is_aborted())
  }
}

/// Fetches and parses one sector. Runs on the scheduler's download pool.
///
/// Errors never reach the caller of the scheduler; they are logged and turned
/// into a discarded result.
pub trait SectorDownloader: Send + Sync {
  fn download(
    &self,
    sector: &WantedSector,
    abort: &AbortSignal,
  ) -> Result<ConsumedSector, DownloadError>;
}

impl<F> SectorDownloader for F
where
  F: Fn(&WantedSector, &AbortSignal) -> Result<ConsumedSector, DownloadError> + Send + Sync,
{
  fn download(
    &self,
    sector: &WantedSector,
    abort: &AbortSignal,
  ) -> Result<ConsumedSector, DownloadError> {
    self(sector, abort)
  }
}

/// One entry of a batch handed to the scheduler: what to fetch and how.
#[derive(Clone)]
pub struct SectorRequest {
  pub sector: WantedSector,
  pub downloader: Arc<dyn SectorDownloader>,
}

impl SectorRequest {
  pub fn new(sector: WantedSector, downloader: Arc<dyn SectorDownloader>) -> Self {
    Self { sector, downloader }
  }
}

impl fmt::Debug for SectorRequest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SectorRequest")
      .field("sector", &self.sector)
      .finish_non_exhaustive()
  }
}
