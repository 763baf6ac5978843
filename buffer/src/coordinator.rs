//! Owns the gate, launches the tasks, and accounts for the run.
//!
//! Two runners over the same contract: [`run`] spawns one OS thread per task
//! and joins them, [`run_async`] composes every task into a single future so
//! the whole run can execute cooperatively, even on a single-threaded
//! executor. Both validate the configuration before any task starts and
//! return the produced/consumed totals.

use crate::error::ConfigError;
use crate::gate::BufferGate;
use crate::worker::{Consumer, Item, Producer};

use futures_util::future::{join, join_all};
use futures_util::FutureExt;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Parameters for one producer/consumer run.
#[derive(Debug, Clone)]
pub struct Config {
  /// Number of buffer slots. Must be at least 1.
  pub capacity: usize,
  /// Number of producer tasks.
  pub producers: usize,
  /// Number of consumer tasks.
  pub consumers: usize,
  /// Items each producer pushes before signalling completion.
  pub items_per_producer: u64,
  /// Optional per-item pause before each push, simulating input latency.
  pub producer_delay: Option<Duration>,
  /// Optional per-item pause after each pop, simulating processing cost.
  pub consumer_delay: Option<Duration>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      capacity: 100,
      producers: 5,
      consumers: 5,
      items_per_producer: 100,
      producer_delay: None,
      consumer_delay: None,
    }
  }
}

impl Config {
  /// Rejects configurations no run should be started with.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.capacity == 0 {
      return Err(ConfigError::ZeroCapacity);
    }
    Ok(())
  }

  /// Total number of items the producers will push.
  pub fn expected_items(&self) -> u64 {
    self.producers as u64 * self.items_per_producer
  }
}

/// Final accounting of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
  /// Items pushed across all producers.
  pub total_produced: u64,
  /// Items taken across all consumers.
  pub total_consumed: u64,
}

impl Summary {
  /// True when every produced item was consumed.
  pub fn is_balanced(&self) -> bool {
    self.total_produced == self.total_consumed
  }
}

/// Runs the configuration on OS threads, one per task, and joins them all.
///
/// On return every producer has signalled completion, every consumer has
/// observed the drain and exited, and — whenever there is at least one
/// consumer — the buffer is empty.
///
/// With `consumers == 0` and more items than slots, producers block forever
/// once the buffer fills and this function never returns; that is the
/// documented behavior of a buffer nobody drains, not an error this crate
/// recovers from.
///
/// # Errors
///
/// Returns `ConfigError` before any task starts if the configuration is
/// invalid.
pub fn run(config: &Config) -> Result<Summary, ConfigError> {
  config.validate()?;
  let gate = BufferGate::<Item>::new(config.capacity, config.producers)?;
  debug!(?config, "starting threaded run");

  let mut producer_handles = Vec::with_capacity(config.producers);
  for id in 0..config.producers {
    let gate = gate.clone();
    let delay = config.producer_delay;
    let mut producer = Producer::new(id, config.items_per_producer);
    producer_handles.push(thread::spawn(move || producer.run(&gate, delay)));
  }

  let mut consumer_handles = Vec::with_capacity(config.consumers);
  for id in 0..config.consumers {
    let gate = gate.clone();
    let delay = config.consumer_delay;
    let mut consumer = Consumer::new(id);
    consumer_handles.push(thread::spawn(move || consumer.run(&gate, delay)));
  }

  let mut total_produced = 0u64;
  for handle in producer_handles {
    total_produced += handle.join().expect("producer thread panicked");
  }
  let mut total_consumed = 0u64;
  for handle in consumer_handles {
    total_consumed += handle.join().expect("consumer thread panicked");
  }

  assert_eq!(
    gate.producers_finished(),
    config.producers,
    "every producer must have signalled completion before the run ends"
  );
  if config.consumers > 0 {
    assert!(
      gate.is_empty(),
      "buffer must be drained once all consumers have exited"
    );
  }

  let summary = Summary {
    total_produced,
    total_consumed,
  };
  debug!(?summary, "threaded run complete");
  Ok(summary)
}

/// Runs the configuration cooperatively: every task becomes a future and the
/// whole run is one `join_all`, suitable for a single-threaded executor.
///
/// Delay injection is ignored here — a blocking sleep would stall every
/// other task on the executor, and delays only shape throughput, never
/// correctness.
///
/// # Errors
///
/// Returns `ConfigError` before any task starts if the configuration is
/// invalid.
pub async fn run_async(config: &Config) -> Result<Summary, ConfigError> {
  config.validate()?;
  let gate = BufferGate::<Item>::new(config.capacity, config.producers)?;
  debug!(?config, "starting cooperative run");

  let producer_tasks: Vec<_> = (0..config.producers)
    .map(|id| {
      let gate = gate.clone();
      let mut producer = Producer::new(id, config.items_per_producer);
      async move { producer.run_async(&gate).await }.boxed()
    })
    .collect();

  let consumer_tasks: Vec<_> = (0..config.consumers)
    .map(|id| {
      let gate = gate.clone();
      let mut consumer = Consumer::new(id);
      async move { consumer.run_async(&gate).await }.boxed()
    })
    .collect();

  let (produced, consumed) = join(join_all(producer_tasks), join_all(consumer_tasks)).await;

  assert_eq!(
    gate.producers_finished(),
    config.producers,
    "every producer must have signalled completion before the run ends"
  );
  if config.consumers > 0 {
    assert!(
      gate.is_empty(),
      "buffer must be drained once all consumers have exited"
    );
  }

  let summary = Summary {
    total_produced: produced.into_iter().sum(),
    total_consumed: consumed.into_iter().sum(),
  };
  debug!(?summary, "cooperative run complete");
  Ok(summary)
}
