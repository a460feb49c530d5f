use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::Wake;

use glam::DVec3;

use super::*;
use crate::octree::DAabb3;
use crate::sector::{LevelOfDetail, SectorId, SectorMetadata, WantedSector};

fn consumed() -> ConsumedSector {
  let metadata = SectorMetadata::new(SectorId(1), None, DAabb3::new(DVec3::ZERO, DVec3::ONE));
  let sector = WantedSector::new("m".into(), "base", Arc::new(metadata), LevelOfDetail::Detailed);
  ConsumedSector::loaded(&sector, None)
}

/// Waker that counts how often it was woken.
struct CountingWaker(AtomicUsize);

impl Wake for CountingWaker {
  fn wake(self: Arc<Self>) {
    self.0.fetch_add(1, Ordering::SeqCst);
  }
}

#[test]
fn test_unresolved_handle() {
  let handle = SectorHandle::new();
  assert!(!handle.is_ready());
  assert!(handle.try_get().is_none());
  assert!(handle.wait_timeout(Duration::from_millis(5)).is_none());
}

#[test]
fn test_resolve_once() {
  let handle = SectorHandle::new();
  let first = Arc::new(consumed());

  assert!(handle.resolve(Arc::clone(&first)));
  assert!(!handle.resolve(Arc::new(consumed())));

  let value = handle.try_get().unwrap();
  assert!(Arc::ptr_eq(&value, &first));
}

#[test]
fn test_clones_share_result() {
  let handle = SectorHandle::new();
  let clone = handle.clone();
  assert!(handle.ptr_eq(&clone));
  assert!(!handle.ptr_eq(&SectorHandle::new()));

  handle.resolve(Arc::new(consumed()));
  assert!(Arc::ptr_eq(&handle.wait(), &clone.wait()));
}

#[test]
fn test_wait_across_threads() {
  let handle = SectorHandle::new();
  let resolver = handle.clone();

  let thread = std::thread::spawn(move || {
    std::thread::sleep(Duration::from_millis(10));
    resolver.resolve(Arc::new(consumed()));
  });

  let value = handle.wait();
  assert_eq!(value.sector_id(), SectorId(1));
  thread.join().unwrap();
}

#[test]
fn test_future_wakes_on_resolve() {
  let handle = SectorHandle::new();
  let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
  let waker = Waker::from(Arc::clone(&counter));
  let mut cx = Context::from_waker(&waker);

  let mut future = handle.clone();
  assert!(Pin::new(&mut future).poll(&mut cx).is_pending());
  // Polling twice with the same waker registers it once
  assert!(Pin::new(&mut future).poll(&mut cx).is_pending());

  handle.resolve(Arc::new(consumed()));
  assert_eq!(counter.0.load(Ordering::SeqCst), 1);

  match Pin::new(&mut future).poll(&mut cx) {
    Poll::Ready(value) => assert_eq!(value.sector_id(), SectorId(1)),
    Poll::Pending => panic!("handle should be ready"),
  }
}

#[test]
fn test_resolved_constructor() {
  let handle = SectorHandle::resolved(consumed());
  assert!(handle.is_ready());
}
