//! Bounded-concurrency sector download scheduler.
//!
//! Each frame the visibility system hands over a batch of wanted sectors.
//! The scheduler maps them onto at most `max_concurrent_downloads` running
//! downloads, queues the rest FIFO, shares one [`SectorHandle`] per sector
//! identity, and cancels queued work that becomes unwanted before it starts.
//!
//! ```text
//!                  queue_batch()                     slot frees
//!   Unrequested ──────────────────► Pending ◄───────────────────── Queued
//!        │        (|pending| < max)    │                             ▲
//!        │                             │ download returns            │
//!        └─────────────────────────────┼─────────────────────────────┘
//!                                      ▼           (|pending| == max)
//!                                  Resolved
//!
//!   Discarded request: Pending → abort signal (advisory)
//!                      Queued  → spliced out, resolved as discarded
//! ```
//!
//! All bookkeeping happens under one mutex and never blocks on a download,
//! so `|pending| <= max` holds at every observable point. Handles are
//! resolved while that mutex is held; wakers registered on a handle must not
//! call back into the scheduler synchronously.

use std::collections::{HashMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::{Receiver, Sender};
use web_time::Instant;

use super::{AbortSignal, DownloadPool, SectorHandle, SectorRequest};
use crate::config::SchedulerConfig;
use crate::error::{DownloadError, SchedulerError};
use crate::metrics::StreamingMetrics;
use crate::sector::{ConsumedSector, LevelOfDetail, SectorKey, WantedSector};

/// A download currently occupying a slot.
struct PendingDownload {
  handle: SectorHandle,
  abort: AbortSignal,
}

/// A sector waiting for a slot.
struct QueuedSectorData {
  request: SectorRequest,
  handle: SectorHandle,
}

#[derive(Default)]
struct SchedulerState {
  pending: HashMap<SectorKey, PendingDownload>,
  queued: HashMap<SectorKey, QueuedSectorData>,
  /// FIFO of queued keys. Mirrors `queued` exactly.
  queue: VecDeque<SectorKey>,
  peak_pending: usize,
  metrics: StreamingMetrics,
}

struct Inner {
  max_concurrent_downloads: usize,
  pool: DownloadPool,
  state: Mutex<SchedulerState>,
  completions_tx: Sender<Arc<ConsumedSector>>,
  completions_rx: Receiver<Arc<ConsumedSector>>,
}

impl Inner {
  fn lock(&self) -> MutexGuard<'_, SchedulerState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

/// Turns per-frame sector wishes into a bounded number of downloads.
///
/// Cloning yields another handle to the same scheduler.
#[derive(Clone)]
pub struct DownloadScheduler {
  inner: Arc<Inner>,
}

impl DownloadScheduler {
  /// Create a scheduler with its own download pool.
  pub fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
    config.validate()?;
    let pool = DownloadPool::new(config.effective_worker_threads())?;
    let (completions_tx, completions_rx) = crossbeam_channel::unbounded();

    Ok(Self {
      inner: Arc::new(Inner {
        max_concurrent_downloads: config.max_concurrent_downloads,
        pool,
        state: Mutex::new(SchedulerState::default()),
        completions_tx,
        completions_rx,
      }),
    })
  }

  /// Queue a batch of sector requests.
  ///
  /// Returns one handle per request, in request order. Requests sharing a
  /// [`SectorKey`] (within this batch or with earlier, unresolved batches)
  /// get clones of the same handle and the downloader runs at most once.
  #[cfg_attr(
    feature = "tracing-spans",
    tracing::instrument(skip_all, name = "download::queue_batch")
  )]
  pub fn queue_batch(&self, requests: Vec<SectorRequest>) -> Vec<SectorHandle> {
    let mut state = self.inner.lock();
    requests
      .into_iter()
      .map(|request| self.queue_one(&mut state, request))
      .collect()
  }

  fn queue_one(&self, state: &mut SchedulerState, request: SectorRequest) -> SectorHandle {
    let key = request.sector.key();

    if request.sector.level_of_detail == LevelOfDetail::Discarded {
      return discard(&self.inner, state, &key, &request.sector);
    }

    // The first accepted request for a key governs until it resolves
    if let Some(pending) = state.pending.get(&key) {
      return pending.handle.clone();
    }
    if let Some(queued) = state.queued.get(&key) {
      return queued.handle.clone();
    }

    let handle = SectorHandle::new();
    if state.pending.len() < self.inner.max_concurrent_downloads {
      start_download(&self.inner, state, key, request, handle.clone());
    } else {
      state.queue.push_back(key.clone());
      state.queued.insert(
        key,
        QueuedSectorData {
          request,
          handle: handle.clone(),
        },
      );
    }
    handle
  }

  /// Downloads currently occupying a slot.
  pub fn pending_count(&self) -> usize {
    self.inner.lock().pending.len()
  }

  /// Sectors waiting for a slot.
  pub fn queued_count(&self) -> usize {
    self.inner.lock().queued.len()
  }

  pub fn is_pending(&self, key: &SectorKey) -> bool {
    self.inner.lock().pending.contains_key(key)
  }

  pub fn is_queued(&self, key: &SectorKey) -> bool {
    self.inner.lock().queued.contains_key(key)
  }

  /// True when nothing is pending or queued.
  pub fn is_idle(&self) -> bool {
    let state = self.inner.lock();
    state.pending.is_empty() && state.queued.is_empty()
  }

  /// Queued keys in the order they will be promoted.
  pub fn queued_keys(&self) -> Vec<SectorKey> {
    self.inner.lock().queue.iter().cloned().collect()
  }

  pub fn max_concurrent_downloads(&self) -> usize {
    self.inner.max_concurrent_downloads
  }

  /// Highest number of simultaneously pending downloads observed so far.
  pub fn peak_pending_count(&self) -> usize {
    self.inner.lock().peak_pending
  }

  /// Take every sector resolved since the last call, in resolution order.
  ///
  /// Covers finished downloads, including failed and aborted ones, and
  /// queued requests discarded before they started. Discards of sectors the
  /// scheduler never held resolve immediately and are not reported here.
  pub fn drain_completions(&self) -> Vec<Arc<ConsumedSector>> {
    self.inner.completions_rx.try_iter().collect()
  }

  /// Snapshot of the scheduler's metrics.
  pub fn metrics(&self) -> StreamingMetrics {
    self.inner.lock().metrics.clone()
  }
}

/// Handle a request whose level of detail is `Discarded`.
fn discard(
  inner: &Inner,
  state: &mut SchedulerState,
  key: &SectorKey,
  sector: &WantedSector,
) -> SectorHandle {
  if let Some(pending) = state.pending.get(key) {
    tracing::debug!(sector = %key, "aborting pending download");
    pending.abort.abort();
    state.metrics.record_abort();
    return pending.handle.clone();
  }

  if let Some(queued) = state.queued.remove(key) {
    tracing::debug!(sector = %key, "discarding queued download before start");
    state.queue.retain(|queued_key| queued_key != key);
    state.metrics.record_discarded_before_start();
    // Resolve with the sector as it was queued, not as the discard request
    let consumed = Arc::new(ConsumedSector::discarded(&queued.request.sector));
    let _ = inner.completions_tx.send(Arc::clone(&consumed));
    queued.handle.resolve(consumed);
    return queued.handle;
  }

  // Nothing held for this sector, so there is no completion to report
  SectorHandle::resolved(ConsumedSector::discarded(sector))
}

/// Occupy a slot and hand the download to the pool.
fn start_download(
  inner: &Arc<Inner>,
  state: &mut SchedulerState,
  key: SectorKey,
  request: SectorRequest,
  handle: SectorHandle,
) {
  debug_assert!(
    state.pending.len() < inner.max_concurrent_downloads,
    "download started without a free slot"
  );

  let abort = AbortSignal::new();
  state.pending.insert(
    key.clone(),
    PendingDownload {
      handle: handle.clone(),
      abort: abort.clone(),
    },
  );
  state.peak_pending = state.peak_pending.max(state.pending.len());
  state.metrics.record_started();

  let task_inner = Arc::clone(inner);
  inner.pool.spawn(move || {
    let start = Instant::now();
    let result = run_download(&request, &abort);
    let elapsed_us = start.elapsed().as_micros() as u64;

    let succeeded = result.is_ok();
    let consumed = result.unwrap_or_else(|err| {
      match err {
        DownloadError::Aborted => {
          tracing::debug!(sector = %key, "download aborted");
        }
        err => {
          tracing::error!(sector = %key, error = %err, "failed to load sector");
        }
      }
      ConsumedSector::discarded(&request.sector)
    });

    finish_download(&task_inner, key, handle, consumed, succeeded, elapsed_us);
  });
}

/// Run the caller's downloader, turning panics into errors.
fn run_download(
  request: &SectorRequest,
  abort: &AbortSignal,
) -> Result<ConsumedSector, DownloadError> {
  panic::catch_unwind(AssertUnwindSafe(|| {
    request.downloader.download(&request.sector, abort)
  }))
  .unwrap_or_else(|payload| {
    let message = payload
      .downcast_ref::<&str>()
      .map(|s| s.to_string())
      .or_else(|| payload.downcast_ref::<String>().cloned())
      .unwrap_or_else(|| "unknown panic".to_string());
    Err(DownloadError::Panicked(message))
  })
}

/// Free the slot, resolve the handle, and promote the queue head.
fn finish_download(
  inner: &Arc<Inner>,
  key: SectorKey,
  handle: SectorHandle,
  consumed: ConsumedSector,
  succeeded: bool,
  elapsed_us: u64,
) {
  let mut state = inner.lock();

  let was_pending = state.pending.remove(&key).is_some();
  debug_assert!(was_pending, "finished download {key} was not pending");
  if !was_pending {
    tracing::warn!(sector = %key, "finished download was not pending");
  }

  state.metrics.record_finished(succeeded, elapsed_us);
  let consumed = Arc::new(consumed);

  // Report, then resolve under the lock: anyone woken by the handle finds the
  // completion queued and the promotion below already applied.
  let _ = inner.completions_tx.send(Arc::clone(&consumed));
  let first_resolve = handle.resolve(consumed);
  debug_assert!(first_resolve, "sector {key} resolved twice");
  if !first_resolve {
    tracing::warn!(sector = %key, "sector resolved twice");
  }

  promote_next(inner, &mut state);
}

/// Move the head of the FIFO queue into a free slot.
fn promote_next(inner: &Arc<Inner>, state: &mut SchedulerState) {
  let has_free_slot = state.pending.len() < inner.max_concurrent_downloads;
  debug_assert!(has_free_slot, "queue promotion attempted without a free slot");
  if !has_free_slot {
    tracing::warn!("queue promotion attempted without a free slot");
    return;
  }

  while let Some(next_key) = state.queue.pop_front() {
    let Some(queued) = state.queued.remove(&next_key) else {
      if cfg!(debug_assertions) {
        panic!("queued key {next_key} has no queued data");
      }
      tracing::warn!(sector = %next_key, "queued key has no queued data");
      continue;
    };
    tracing::trace!(sector = %next_key, "promoting queued download");
    start_download(inner, state, next_key, queued.request, queued.handle);
    return;
  }
}

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;
