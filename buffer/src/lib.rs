//! Bounded-buffer producer/consumer coordination for Rust.
//!
//! Bobbin provides a fixed-capacity ring buffer behind a blocking
//! coordination gate: producers block while the buffer is full, consumers
//! block while it is empty, and once every producer has signalled completion
//! and the buffer has drained, every consumer is released with no lost items
//! and no missed wakeups. The gate offers both synchronous (thread-parking)
//! and asynchronous (waker-based) operations over the same shared state, so
//! blocking threads and cooperative tasks can share one buffer.

pub mod coordinator;
pub mod error;
pub mod gate;
pub mod ring;
pub mod worker;

// Public re-exports for convenience.
pub use coordinator::{run, run_async, Config, Summary};
pub use error::{ConfigError, TryPopError, TryPushError};
pub use gate::BufferGate;
pub use ring::RingBuffer;
pub use worker::{Consumer, Item, Producer};
