//! Blocking push/pop paths for OS threads.
//!
//! Both operations follow the same shape: try the non-blocking core first,
//! and only if that fails, take the gate lock, re-check the condition, and
//! commit to parking while still holding the lock. Re-checking under the
//! lock is what closes the window where the state changes between the failed
//! attempt and the park: any wakeup that fires after we enqueue ourselves
//! finds us in the waiter queue.

use super::core::SyncWaiter;
use super::BufferGate;
use crate::error::{TryPopError, TryPushError};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Spin briefly, then yield, then park until `cond` holds.
///
/// The parked phase relies on the waker setting the condition before the
/// `unpark()`, so a spurious unpark simply re-parks.
fn adaptive_wait<F>(cond: F)
where
  F: Fn() -> bool,
{
  for _ in 0..16 {
    if cond() {
      return;
    }
    std::hint::spin_loop();
  }
  for _ in 0..8 {
    if cond() {
      return;
    }
    thread::yield_now();
  }
  while !cond() {
    thread::park();
  }
}

/// Blocking push: parks the calling thread while the buffer is full.
pub(crate) fn push_sync<T: Send>(gate: &BufferGate<T>, item: T) {
  let mut pending = Some(item);

  loop {
    let item = pending
      .take()
      .expect("an item is always pending at the top of the push loop");

    // Phase 1: optimistic non-blocking attempt.
    match gate.shared.try_push_core(item) {
      Ok(()) => return,
      Err(TryPushError::Full(returned)) => pending = Some(returned),
    }

    // Phase 2: prepare the waiter.
    let done = Arc::new(AtomicBool::new(false));
    let waiter = SyncWaiter {
      thread: thread::current(),
      done: done.clone(),
    };

    // Phase 3: lock, re-check, commit to parking.
    {
      let mut guard = gate.shared.internal.lock();
      if !guard.ring.is_full() {
        // A slot opened between phases 1 and 3. Retry instead of parking.
        continue;
      }
      guard.waiting_sync_producers.push_back(waiter);
    }

    // Phase 4: wait until a consumer frees a slot and wakes us.
    adaptive_wait(|| done.load(Ordering::Acquire));

    // Phase 5: a slot is probably free now; loop and try again.
  }
}

/// Blocking pop: parks the calling thread while the buffer is empty and
/// producers are still running. Returns `None` once the gate is drained.
pub(crate) fn pop_sync<T: Send>(gate: &BufferGate<T>) -> Option<T> {
  loop {
    // Phase 1: optimistic non-blocking attempt.
    match gate.shared.try_pop_core() {
      Ok(item) => return Some(item),
      Err(TryPopError::Drained) => return None,
      Err(TryPopError::Empty) => {}
    }

    // Phase 2: prepare the waiter.
    let done = Arc::new(AtomicBool::new(false));
    let waiter = SyncWaiter {
      thread: thread::current(),
      done: done.clone(),
    };

    // Phase 3: lock, re-check, commit to parking. The drained check and the
    // enqueue happen under one lock, so a producer finishing in between
    // either sees us in the queue (and broadcasts to us) or we see the
    // updated counter here.
    {
      let mut guard = gate.shared.internal.lock();
      if !guard.ring.is_empty() {
        continue;
      }
      if guard.is_drained(gate.shared.total_producers) {
        return None;
      }
      guard.waiting_sync_consumers.push_back(waiter);
    }

    // Phase 4: wait for an item or for the termination broadcast.
    adaptive_wait(|| done.load(Ordering::Acquire));

    // Phase 5: either an item arrived or the gate drained; loop to find out.
  }
}
