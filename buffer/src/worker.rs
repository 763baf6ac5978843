//! Producer and consumer task state machines.
//!
//! A `Producer` pushes a fixed quota of deterministic items and then signals
//! its completion to the gate; a `Consumer` drains items until the gate
//! reports that no more will ever arrive. Both run either on an OS thread
//! (`run`) or as a cooperative task (`run_async`) against the same gate.

use crate::gate::BufferGate;

use std::thread;
use std::time::Duration;
use tracing::{debug, trace};

/// A single buffered work item.
///
/// The payload is deterministic — producer id plus that producer's sequence
/// number — so every (producer, seq) pair is unique and a test can check
/// that the set of consumed items equals the set of produced ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Item {
  /// Id of the producer that created this item.
  pub producer: usize,
  /// Position in that producer's output, starting at 0.
  pub seq: u64,
}

/// A producer task: pushes `quota` items, then signals completion.
#[derive(Debug)]
pub struct Producer {
  id: usize,
  quota: u64,
  produced: u64,
}

impl Producer {
  /// Creates a producer that will push `quota` items tagged with `id`.
  pub fn new(id: usize, quota: u64) -> Self {
    Self {
      id,
      quota,
      produced: 0,
    }
  }

  pub fn id(&self) -> usize {
    self.id
  }

  /// Items pushed so far. Equals the quota once a run loop returns.
  pub fn produced(&self) -> u64 {
    self.produced
  }

  /// Runs the producer to completion on the calling thread, blocking on a
  /// full buffer. `delay` simulates per-item I/O or compute cost; it affects
  /// throughput only. Returns the number of items pushed.
  pub fn run(&mut self, gate: &BufferGate<Item>, delay: Option<Duration>) -> u64 {
    while self.produced < self.quota {
      if let Some(d) = delay {
        thread::sleep(d);
      }
      let item = Item {
        producer: self.id,
        seq: self.produced,
      };
      gate.push(item);
      self.produced += 1;
      trace!(producer = self.id, seq = item.seq, "produced item");
    }
    // The completion signal comes after the last successful push; for the
    // final producer this wakes every consumer still blocked on empty.
    gate.mark_producer_finished();
    debug!(producer = self.id, produced = self.produced, "producer finished");
    self.produced
  }

  /// Cooperative version of [`run`](Producer::run): suspends instead of
  /// parking when the buffer is full. Delay injection is a thread-runner
  /// concern and has no counterpart here.
  pub async fn run_async(&mut self, gate: &BufferGate<Item>) -> u64 {
    while self.produced < self.quota {
      let item = Item {
        producer: self.id,
        seq: self.produced,
      };
      gate.push_async(item).await;
      self.produced += 1;
      trace!(producer = self.id, seq = item.seq, "produced item");
    }
    gate.mark_producer_finished();
    debug!(producer = self.id, produced = self.produced, "producer finished");
    self.produced
  }
}

/// A consumer task: drains items until the gate reports drained.
#[derive(Debug)]
pub struct Consumer {
  id: usize,
  consumed: u64,
}

impl Consumer {
  pub fn new(id: usize) -> Self {
    Self { id, consumed: 0 }
  }

  pub fn id(&self) -> usize {
    self.id
  }

  /// Items taken so far.
  pub fn consumed(&self) -> u64 {
    self.consumed
  }

  /// Runs the consumer to completion on the calling thread, blocking on an
  /// empty buffer until the gate drains. Returns the number of items taken.
  pub fn run(&mut self, gate: &BufferGate<Item>, delay: Option<Duration>) -> u64 {
    self.run_with(gate, delay, |_| {})
  }

  /// Like [`run`](Consumer::run), but hands every item to `observe` —
  /// the hook tests use to collect the consumed set.
  pub fn run_with<F>(&mut self, gate: &BufferGate<Item>, delay: Option<Duration>, mut observe: F) -> u64
  where
    F: FnMut(Item),
  {
    while let Some(item) = gate.pop() {
      trace!(consumer = self.id, producer = item.producer, seq = item.seq, "consumed item");
      self.consumed += 1;
      observe(item);
      if let Some(d) = delay {
        thread::sleep(d);
      }
    }
    debug!(consumer = self.id, consumed = self.consumed, "consumer finished");
    self.consumed
  }

  /// Cooperative version of [`run`](Consumer::run).
  pub async fn run_async(&mut self, gate: &BufferGate<Item>) -> u64 {
    while let Some(item) = gate.pop_async().await {
      trace!(consumer = self.id, producer = item.producer, seq = item.seq, "consumed item");
      self.consumed += 1;
    }
    debug!(consumer = self.id, consumed = self.consumed, "consumer finished");
    self.consumed
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn producer_pushes_deterministic_sequence() {
    let gate = BufferGate::new(8, 1).unwrap();
    let mut producer = Producer::new(3, 5);
    assert_eq!(producer.run(&gate, None), 5);
    for seq in 0..5 {
      assert_eq!(gate.pop(), Some(Item { producer: 3, seq }));
    }
    // Quota met and completion signalled, so the gate is drained.
    assert_eq!(gate.pop(), None);
  }

  #[test]
  fn zero_quota_producer_still_signals_completion() {
    let gate = BufferGate::new(2, 1).unwrap();
    let mut producer = Producer::new(0, 0);
    assert_eq!(producer.run(&gate, None), 0);
    assert!(gate.is_drained());
  }

  #[test]
  fn consumer_drains_and_terminates() {
    let gate = BufferGate::new(4, 1).unwrap();
    let mut producer = Producer::new(0, 10);
    let gate_clone = gate.clone();
    let handle = std::thread::spawn(move || producer.run(&gate_clone, None));

    let mut consumer = Consumer::new(0);
    assert_eq!(consumer.run(&gate, None), 10);
    assert_eq!(handle.join().unwrap(), 10);
    assert!(gate.is_empty());
  }
}
