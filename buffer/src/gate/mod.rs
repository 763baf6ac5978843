//! The coordination gate: a bounded buffer with blocking access and a
//! multi-producer termination handshake.
//!
//! `BufferGate` wraps a [`RingBuffer`](crate::ring::RingBuffer) behind one
//! mutex and enforces the two blocking conditions of a bounded buffer:
//! [`push`](BufferGate::push) blocks while the buffer is full, and
//! [`pop`](BufferGate::pop) blocks while it is empty — unless the gate has
//! *drained*, meaning every producer has called
//! [`mark_producer_finished`](BufferGate::mark_producer_finished) and no
//! items remain, in which case `pop` returns `None` instead of blocking
//! forever.
//!
//! Every operation exists in a synchronous (thread-parking) and an
//! asynchronous (waker-based) form over the same shared state, so blocking
//! threads and cooperative tasks can produce into and consume from one
//! buffer interchangeably.
//!
//! The one genuinely delicate piece is the final producer's handshake: when
//! the last producer finishes, several consumers can be blocked on an empty
//! buffer at once, and no future item will wake them. The gate therefore
//! wakes *every* blocked consumer at that transition, where an ordinary item
//! push wakes exactly one.

mod async_impl;
mod core;
mod sync_impl;

pub use async_impl::{PopFuture, PushFuture};

use self::core::GateShared;
use crate::error::{ConfigError, TryPopError, TryPushError};

use std::fmt;
use std::sync::Arc;

/// A clonable handle to a bounded buffer shared by producers and consumers.
///
/// All clones refer to the same buffer and termination state. The gate is
/// constructed with a fixed producer count; it is the callers'
/// responsibility that exactly that many producers eventually call
/// [`mark_producer_finished`](BufferGate::mark_producer_finished).
pub struct BufferGate<T: Send> {
  pub(crate) shared: Arc<GateShared<T>>,
}

impl<T: Send> Clone for BufferGate<T> {
  fn clone(&self) -> Self {
    Self {
      shared: Arc::clone(&self.shared),
    }
  }
}

impl<T: Send> fmt::Debug for BufferGate<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let internal = self.shared.internal.lock();
    f.debug_struct("BufferGate")
      .field("capacity", &self.shared.capacity)
      .field("len", &internal.ring.len())
      .field("total_producers", &self.shared.total_producers)
      .field("producers_finished", &internal.producers_finished)
      .finish()
  }
}

impl<T: Send> BufferGate<T> {
  /// Creates a gate over an empty buffer of the given capacity, expecting
  /// `total_producers` completion signals before consumers are released.
  ///
  /// # Errors
  ///
  /// Returns `ConfigError::ZeroCapacity` if `capacity` is zero.
  pub fn new(capacity: usize, total_producers: usize) -> Result<Self, ConfigError> {
    if capacity == 0 {
      return Err(ConfigError::ZeroCapacity);
    }
    Ok(Self {
      shared: Arc::new(GateShared::new(capacity, total_producers)),
    })
  }

  /// Stores an item, blocking the calling thread while the buffer is full.
  pub fn push(&self, item: T) {
    sync_impl::push_sync(self, item);
  }

  /// Attempts to store an item without blocking.
  pub fn try_push(&self, item: T) -> Result<(), TryPushError<T>> {
    self.shared.try_push_core(item)
  }

  /// Stores an item asynchronously; the future resolves once a slot is free.
  pub fn push_async(&self, item: T) -> PushFuture<'_, T> {
    PushFuture::new(self, item)
  }

  /// Takes an item, blocking the calling thread while the buffer is empty
  /// and producers are still running.
  ///
  /// Returns `None` once the gate has drained: every producer has finished
  /// and no items remain. After the first `None`, every subsequent call
  /// returns `None` immediately.
  pub fn pop(&self) -> Option<T> {
    sync_impl::pop_sync(self)
  }

  /// Attempts to take an item without blocking.
  pub fn try_pop(&self) -> Result<T, TryPopError> {
    self.shared.try_pop_core()
  }

  /// Takes an item asynchronously; resolves to `None` once the gate has
  /// drained.
  pub fn pop_async(&self) -> PopFuture<'_, T> {
    PopFuture::new(self)
  }

  /// Signals that one producer has pushed its final item.
  ///
  /// The final call — the one that brings the finished count up to the
  /// gate's producer count — wakes every blocked consumer so they can
  /// observe the drain condition.
  ///
  /// # Panics
  ///
  /// Panics if called more times than the gate's producer count; that is a
  /// coordination bug on the caller's side.
  pub fn mark_producer_finished(&self) {
    self.shared.mark_producer_finished_core();
  }

  /// Number of items currently buffered.
  pub fn len(&self) -> usize {
    self.shared.internal.lock().ring.len()
  }

  /// True if no items are currently buffered.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Total number of slots.
  pub fn capacity(&self) -> usize {
    self.shared.capacity
  }

  /// The number of completion signals the gate was constructed to expect.
  pub fn total_producers(&self) -> usize {
    self.shared.total_producers
  }

  /// How many producers have finished so far.
  pub fn producers_finished(&self) -> usize {
    self.shared.internal.lock().producers_finished
  }

  /// True once every producer has finished and the buffer is empty.
  pub fn is_drained(&self) -> bool {
    let guard = self.shared.internal.lock();
    guard.is_drained(self.shared.total_producers)
  }
}
