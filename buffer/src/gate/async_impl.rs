//! Waker-based push/pop futures for cooperative tasks.
//!
//! Each future polls the gate state under the same mutex the blocking paths
//! use, so sync threads and async tasks can wait on the same buffer without
//! a separate protocol. Registration and waking both happen under the lock,
//! which rules out a waker being woken before it is enqueued.

use super::BufferGate;
use crate::error::TryPushError;

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Future returned by [`BufferGate::push_async`]. Resolves once the item has
/// been stored.
#[must_use = "futures do nothing unless you .await or poll them"]
pub struct PushFuture<'a, T: Send> {
  gate: &'a BufferGate<T>,
  item: Option<T>,
}

impl<'a, T: Send> PushFuture<'a, T> {
  pub(crate) fn new(gate: &'a BufferGate<T>, item: T) -> Self {
    Self {
      gate,
      item: Some(item),
    }
  }
}

// The item is never pinned; only moved out by value during poll.
impl<T: Send> Unpin for PushFuture<'_, T> {}

impl<T: Send> Future for PushFuture<'_, T> {
  type Output = ();

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let this = self.get_mut();
    let item = match this.item.take() {
      Some(item) => item,
      // Already completed on an earlier poll.
      None => return Poll::Ready(()),
    };

    let mut guard = this.gate.shared.internal.lock();
    match guard.ring.push(item) {
      Ok(()) => {
        // Drop any registration left over from an earlier Pending poll, so a
        // later wakeup is not spent on this already-finished future.
        guard
          .waiting_async_producers
          .retain(|w| !w.will_wake(cx.waker()));
        guard.wake_one_consumer();
        Poll::Ready(())
      }
      Err(TryPushError::Full(returned)) => {
        this.item = Some(returned);
        if !guard
          .waiting_async_producers
          .iter()
          .any(|w| w.will_wake(cx.waker()))
        {
          guard.waiting_async_producers.push_back(cx.waker().clone());
        }
        Poll::Pending
      }
    }
  }
}

/// Future returned by [`BufferGate::pop_async`]. Resolves to an item, or to
/// `None` once every producer has finished and the buffer is empty.
#[must_use = "futures do nothing unless you .await or poll them"]
pub struct PopFuture<'a, T: Send> {
  gate: &'a BufferGate<T>,
}

impl<'a, T: Send> PopFuture<'a, T> {
  pub(crate) fn new(gate: &'a BufferGate<T>) -> Self {
    Self { gate }
  }
}

impl<T: Send> Future for PopFuture<'_, T> {
  type Output = Option<T>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let mut guard = self.gate.shared.internal.lock();

    if let Some(item) = guard.ring.pop() {
      guard
        .waiting_async_consumers
        .retain(|w| !w.will_wake(cx.waker()));
      guard.wake_one_producer();
      return Poll::Ready(Some(item));
    }

    if guard.is_drained(self.gate.shared.total_producers) {
      guard
        .waiting_async_consumers
        .retain(|w| !w.will_wake(cx.waker()));
      return Poll::Ready(None);
    }

    if !guard
      .waiting_async_consumers
      .iter()
      .any(|w| w.will_wake(cx.waker()))
    {
      guard.waiting_async_consumers.push_back(cx.waker().clone());
    }
    Poll::Pending
  }
}
