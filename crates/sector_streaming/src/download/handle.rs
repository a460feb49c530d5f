//! SectorHandle - shared one-shot result of a sector download.
//!
//! Every request for the same sector identity receives a clone of the same
//! handle, so all of them observe the identical `Arc<ConsumedSector>`.
//!
//! A handle can be consumed three ways:
//! - polled without blocking each frame ([`SectorHandle::try_get`]),
//! - awaited as a [`Future`] from any executor,
//! - waited on synchronously ([`SectorHandle::wait`]), mostly in tests.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, Waker};
use std::time::Duration;

use crate::sector::ConsumedSector;

struct Slot {
  value: Option<Arc<ConsumedSector>>,
  wakers: Vec<Waker>,
}

struct Shared {
  slot: Mutex<Slot>,
  ready: Condvar,
}

impl Shared {
  fn lock(&self) -> MutexGuard<'_, Slot> {
    self.slot.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

/// Cloneable, never-failing future of a [`ConsumedSector`].
#[derive(Clone)]
pub struct SectorHandle {
  shared: Arc<Shared>,
}

impl SectorHandle {
  /// Create an unresolved handle.
  pub(crate) fn new() -> Self {
    Self {
      shared: Arc::new(Shared {
        slot: Mutex::new(Slot {
          value: None,
          wakers: Vec::new(),
        }),
        ready: Condvar::new(),
      }),
    }
  }

  /// Create a handle that is already resolved.
  pub(crate) fn resolved(value: ConsumedSector) -> Self {
    let handle = Self::new();
    handle.resolve(Arc::new(value));
    handle
  }

  /// Store the result and wake every waiter.
  ///
  /// Returns `false` (and keeps the first value) if the handle was already
  /// resolved.
  pub(crate) fn resolve(&self, value: Arc<ConsumedSector>) -> bool {
    let wakers = {
      let mut slot = self.shared.lock();
      if slot.value.is_some() {
        return false;
      }
      slot.value = Some(value);
      std::mem::take(&mut slot.wakers)
    };
    self.shared.ready.notify_all();
    for waker in wakers {
      waker.wake();
    }
    true
  }

  /// Non-blocking: the result if the download has finished.
  pub fn try_get(&self) -> Option<Arc<ConsumedSector>> {
    self.shared.lock().value.clone()
  }

  pub fn is_ready(&self) -> bool {
    self.shared.lock().value.is_some()
  }

  /// Block the current thread until resolved.
  pub fn wait(&self) -> Arc<ConsumedSector> {
    let mut slot = self.shared.lock();
    loop {
      if let Some(value) = &slot.value {
        return Arc::clone(value);
      }
      slot = self
        .shared
        .ready
        .wait(slot)
        .unwrap_or_else(PoisonError::into_inner);
    }
  }

  /// Block until resolved or `timeout` elapses.
  pub fn wait_timeout(&self, timeout: Duration) -> Option<Arc<ConsumedSector>> {
    let slot = self.shared.lock();
    let (slot, _) = self
      .shared
      .ready
      .wait_timeout_while(slot, timeout, |slot| slot.value.is_none())
      .unwrap_or_else(PoisonError::into_inner);
    slot.value.clone()
  }

  /// True if both handles refer to the same underlying download.
  pub fn ptr_eq(&self, other: &SectorHandle) -> bool {
    Arc::ptr_eq(&self.shared, &other.shared)
  }
}

impl Future for SectorHandle {
  type Output = Arc<ConsumedSector>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let mut slot = self.shared.lock();
    match &slot.value {
      Some(value) => Poll::Ready(Arc::clone(value)),
      None => {
        if !slot.wakers.iter().any(|w| w.will_wake(cx.waker())) {
          slot.wakers.push(cx.waker().clone());
        }
        Poll::Pending
      }
    }
  }
}

impl fmt::Debug for SectorHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.try_get() {
      Some(value) => write!(f, "SectorHandle(ready: {:?})", value.level_of_detail),
      None => write!(f, "SectorHandle(pending)"),
    }
  }
}

#[cfg(test)]
#[path = "handle_test.rs"]
mod handle_test;
