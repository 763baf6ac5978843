//! The shared, mutex-protected state behind the coordination gate.
//!
//! A single `parking_lot::Mutex` guards the ring buffer, the finished-producer
//! counter, and every waiter queue. Holding one lock over all of it is what
//! makes the consumer's check-then-block sequence atomic: a consumer can only
//! decide to park after observing, under the lock, that the buffer is empty
//! and producers are still running.
//!
//! Waiters are kept in four queues, split by side (producer/consumer) and by
//! parking mechanism (parked thread vs. registered waker), so the wake path
//! always knows whether to `unpark()` a thread or `wake()` a task.

use crate::error::{TryPopError, TryPushError};
use crate::ring::RingBuffer;

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::Waker;
use std::thread::Thread;

/// A parked synchronous thread waiting for room (producer) or an item
/// (consumer).
#[derive(Debug)]
pub(crate) struct SyncWaiter {
  /// Handle to the parked thread, used for `unpark()`.
  pub(crate) thread: Thread,
  /// Set by the waker before `unpark()`, so the adaptive wait can tell a
  /// real wakeup from a spurious one and never re-parks after being woken.
  pub(crate) done: Arc<AtomicBool>,
}

impl SyncWaiter {
  pub(crate) fn wake(self) {
    self.done.store(true, Ordering::Release);
    self.thread.unpark();
  }
}

/// The gate state proper, protected by `GateShared::internal`.
#[derive(Debug)]
pub(crate) struct GateInternal<T> {
  /// Item storage.
  pub(crate) ring: RingBuffer<T>,
  /// Number of producers that have pushed their final item. Monotonic,
  /// never exceeds `GateShared::total_producers`.
  pub(crate) producers_finished: usize,
  /// Parked synchronous producers, blocked on a full buffer.
  pub(crate) waiting_sync_producers: VecDeque<SyncWaiter>,
  /// Registered asynchronous producers, blocked on a full buffer.
  pub(crate) waiting_async_producers: VecDeque<Waker>,
  /// Parked synchronous consumers, blocked on an empty buffer.
  pub(crate) waiting_sync_consumers: VecDeque<SyncWaiter>,
  /// Registered asynchronous consumers, blocked on an empty buffer.
  pub(crate) waiting_async_consumers: VecDeque<Waker>,
}

impl<T> GateInternal<T> {
  /// True once no item will ever arrive again: every producer has finished
  /// and the buffer is empty.
  #[inline]
  pub(crate) fn is_drained(&self, total_producers: usize) -> bool {
    self.producers_finished == total_producers && self.ring.is_empty()
  }

  /// Wakes one blocked consumer, if any. Async waiters first; they are
  /// cheaper to wake than parked threads.
  pub(crate) fn wake_one_consumer(&mut self) {
    if let Some(waker) = self.waiting_async_consumers.pop_front() {
      waker.wake();
    } else if let Some(waiter) = self.waiting_sync_consumers.pop_front() {
      waiter.wake();
    }
  }

  /// Wakes one blocked producer, if any.
  pub(crate) fn wake_one_producer(&mut self) {
    if let Some(waker) = self.waiting_async_producers.pop_front() {
      waker.wake();
    } else if let Some(waiter) = self.waiting_sync_producers.pop_front() {
      waiter.wake();
    }
  }
}

/// The shared owner of the gate state, wrapped in an `Arc` by `BufferGate`.
#[derive(Debug)]
pub(crate) struct GateShared<T> {
  pub(crate) internal: Mutex<GateInternal<T>>,
  pub(crate) capacity: usize,
  pub(crate) total_producers: usize,
}

impl<T: Send> GateShared<T> {
  pub(crate) fn new(capacity: usize, total_producers: usize) -> Self {
    GateShared {
      internal: Mutex::new(GateInternal {
        ring: RingBuffer::new(capacity),
        producers_finished: 0,
        waiting_sync_producers: VecDeque::new(),
        waiting_async_producers: VecDeque::new(),
        waiting_sync_consumers: VecDeque::new(),
        waiting_async_consumers: VecDeque::new(),
      }),
      capacity,
      total_producers,
    }
  }

  /// Core non-blocking push: store the item if a slot is free and wake one
  /// blocked consumer. Returns the item if the buffer is full.
  pub(crate) fn try_push_core(&self, item: T) -> Result<(), TryPushError<T>> {
    let mut guard = self.internal.lock();
    guard.ring.push(item)?;
    guard.wake_one_consumer();
    Ok(())
  }

  /// Core non-blocking pop: take an item if one is buffered and wake one
  /// blocked producer. Distinguishes a temporarily empty buffer (`Empty`)
  /// from a terminally empty one (`Drained`).
  pub(crate) fn try_pop_core(&self) -> Result<T, TryPopError> {
    let mut guard = self.internal.lock();
    if let Some(item) = guard.ring.pop() {
      guard.wake_one_producer();
      return Ok(item);
    }
    if guard.producers_finished == self.total_producers {
      return Err(TryPopError::Drained);
    }
    Err(TryPopError::Empty)
  }

  /// Records that one producer has pushed its final item.
  ///
  /// When the last producer finishes, every blocked consumer must be woken:
  /// no new item is coming, so a single targeted wakeup would strand all but
  /// one of them. Waking happens outside the lock.
  pub(crate) fn mark_producer_finished_core(&self) {
    let sync_waiters;
    let async_waiters;
    {
      let mut guard = self.internal.lock();
      assert!(
        guard.producers_finished < self.total_producers,
        "a producer finished more times than there are producers"
      );
      guard.producers_finished += 1;
      if guard.producers_finished == self.total_producers {
        sync_waiters = std::mem::take(&mut guard.waiting_sync_consumers);
        async_waiters = std::mem::take(&mut guard.waiting_async_consumers);
      } else {
        return;
      }
    }
    for waiter in sync_waiters {
      waiter.wake();
    }
    for waker in async_waiters {
      waker.wake();
    }
  }
}
