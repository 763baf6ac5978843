mod common;
use common::*;

use bobbin::{run, BufferGate, Config, Consumer, Item, Producer, Summary};

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// Drives `num_producers` producer threads and `num_consumers` consumer
/// threads over one gate and checks the exactly-once oracle: every produced
/// (producer, seq) pair is consumed exactly once.
fn run_sync_gate_test(num_producers: usize, num_consumers: usize, items_per_producer: u64, capacity: usize) {
  let gate = BufferGate::<Item>::new(capacity, num_producers).unwrap();
  let total_expected = num_producers as u64 * items_per_producer;
  let consumed_set = Arc::new(Mutex::new(HashSet::new()));

  let mut consumer_handles = Vec::new();
  for id in 0..num_consumers {
    let gate = gate.clone();
    let consumed_set = Arc::clone(&consumed_set);
    consumer_handles.push(thread::spawn(move || {
      let mut consumer = Consumer::new(id);
      consumer.run_with(&gate, None, |item| {
        assert!(
          consumed_set.lock().unwrap().insert(item),
          "item consumed twice: {:?}",
          item
        );
      })
    }));
  }

  let mut producer_handles = Vec::new();
  for id in 0..num_producers {
    let gate = gate.clone();
    producer_handles.push(thread::spawn(move || {
      Producer::new(id, items_per_producer).run(&gate, None)
    }));
  }

  let mut total_produced = 0u64;
  for handle in producer_handles {
    total_produced += handle.join().expect("producer thread panicked");
  }
  let mut total_consumed = 0u64;
  for handle in consumer_handles {
    total_consumed += handle.join().expect("consumer thread panicked");
  }

  assert_eq!(total_produced, total_expected);
  assert_eq!(total_consumed, total_expected);
  assert_eq!(consumed_set.lock().unwrap().len() as u64, total_expected);
  assert!(gate.is_empty());
  assert!(gate.is_drained());
}

#[test]
fn sync_1p_1c_small_buffer() {
  run_sync_gate_test(1, 1, ITEMS_HIGH, 4);
}

#[test]
fn sync_mp_1c() {
  run_sync_gate_test(4, 1, ITEMS_MEDIUM, 16);
}

#[test]
fn sync_1p_mc() {
  run_sync_gate_test(1, 4, ITEMS_HIGH, 16);
}

#[test]
fn sync_mp_mc_contention() {
  run_sync_gate_test(4, 4, ITEMS_HIGH, 4);
}

#[test]
fn sync_more_consumers_than_items() {
  run_sync_gate_test(2, 8, 3, 4);
}

#[test]
fn single_producer_order_is_preserved() {
  // capacity=1, 1 producer, 1 consumer, 3 items: consumed in order 0,1,2.
  let gate = BufferGate::<Item>::new(1, 1).unwrap();

  let gate_clone = gate.clone();
  let producer = thread::spawn(move || Producer::new(0, 3).run(&gate_clone, None));

  let seen = Arc::new(Mutex::new(Vec::new()));
  let seen_clone = Arc::clone(&seen);
  let gate_clone = gate.clone();
  let consumer = thread::spawn(move || {
    Consumer::new(0).run_with(&gate_clone, None, |item| {
      seen_clone.lock().unwrap().push(item.seq);
    })
  });

  assert_eq!(producer.join().unwrap(), 3);
  assert_eq!(consumer.join().unwrap(), 3);
  assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
}

#[test]
fn coordinator_scenario_3p_4c() {
  // capacity=10, 3 producers, 4 consumers, 50 items each: 150 consumed.
  let config = Config {
    capacity: 10,
    producers: 3,
    consumers: 4,
    items_per_producer: 50,
    ..Config::default()
  };
  let summary = run(&config).unwrap();
  assert_eq!(summary.total_produced, 150);
  assert_eq!(summary.total_consumed, 150);
  assert!(summary.is_balanced());
}

#[test]
fn coordinator_zero_producers_consumers_exit_immediately() {
  let config = Config {
    capacity: 8,
    producers: 0,
    consumers: 5,
    items_per_producer: 100,
    ..Config::default()
  };
  let summary = run(&config).unwrap();
  assert_eq!(
    summary,
    Summary {
      total_produced: 0,
      total_consumed: 0
    }
  );
}

#[test]
fn coordinator_zero_items_per_producer() {
  let config = Config {
    capacity: 8,
    producers: 3,
    consumers: 3,
    items_per_producer: 0,
    ..Config::default()
  };
  let summary = run(&config).unwrap();
  assert!(summary.is_balanced());
  assert_eq!(summary.total_produced, 0);
}

#[test]
fn coordinator_defaults() {
  let summary = run(&Config::default()).unwrap();
  assert_eq!(summary.total_produced, 500);
  assert_eq!(summary.total_consumed, 500);
}

#[test]
fn coordinator_is_idempotent_across_runs() {
  let config = Config {
    capacity: 7,
    producers: 3,
    consumers: 2,
    items_per_producer: 40,
    ..Config::default()
  };
  let first = run(&config).unwrap();
  let second = run(&config).unwrap();
  assert_eq!(first, second);
  assert_eq!(first.total_consumed, 120);
}

#[test]
fn coordinator_zero_consumers_items_fit_in_buffer() {
  // Producers finish because everything fits; nothing ever drains it.
  let config = Config {
    capacity: 16,
    producers: 2,
    consumers: 0,
    items_per_producer: 5,
    ..Config::default()
  };
  let summary = run(&config).unwrap();
  assert_eq!(summary.total_produced, 10);
  assert_eq!(summary.total_consumed, 0);
  assert!(!summary.is_balanced());
}

#[test]
fn coordinator_zero_consumers_overfull_blocks_by_design() {
  // More items than slots and nobody draining: producers block forever.
  // The run must still be blocked after a generous grace period.
  let finished = Arc::new(AtomicBool::new(false));
  let finished_clone = Arc::clone(&finished);
  thread::spawn(move || {
    let config = Config {
      capacity: 2,
      producers: 1,
      consumers: 0,
      items_per_producer: 10,
      ..Config::default()
    };
    let _ = run(&config);
    finished_clone.store(true, Ordering::Release);
  });

  thread::sleep(SHORT_TIMEOUT);
  assert!(
    !finished.load(Ordering::Acquire),
    "a run with no consumers and an overfull buffer should not complete"
  );
  // The blocked thread is intentionally leaked; the test process reaps it.
}

#[test]
fn delays_do_not_affect_totals() {
  let config = Config {
    capacity: 4,
    producers: 2,
    consumers: 2,
    items_per_producer: 10,
    producer_delay: Some(std::time::Duration::from_millis(1)),
    consumer_delay: Some(std::time::Duration::from_millis(1)),
  };
  let summary = run(&config).unwrap();
  assert_eq!(summary.total_consumed, 20);
  assert!(summary.is_balanced());
}
