//! Command-line driver for the bobbin coordination core.
//!
//! Mirrors the classic bounded-buffer exercise harness: pick a buffer size,
//! producer/consumer counts and a per-producer quota, run to completion, and
//! exit 0 only if every produced item was consumed. `RUST_LOG=trace` shows
//! the per-item trace lines.

use std::process::ExitCode;
use std::time::Duration;

use bobbin::{run, run_async, Config, Summary};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "bobbin", about = "Bounded-buffer producer/consumer runner")]
struct Args {
  /// Buffer capacity in items.
  #[arg(short = 'b', long, default_value_t = 100)]
  capacity: usize,

  /// Number of producer tasks.
  #[arg(short = 'p', long, default_value_t = 5)]
  producers: usize,

  /// Number of consumer tasks.
  #[arg(short = 'c', long, default_value_t = 5)]
  consumers: usize,

  /// Items each producer pushes before finishing.
  #[arg(short = 'e', long, default_value_t = 100)]
  items_per_producer: u64,

  /// Sleep this many milliseconds before each push, simulating input latency.
  #[arg(short = 'i', long, value_name = "MS")]
  producer_delay_ms: Option<u64>,

  /// Sleep this many milliseconds after each pop, simulating processing cost.
  #[arg(short = 'j', long, value_name = "MS")]
  consumer_delay_ms: Option<u64>,

  /// Run all tasks cooperatively on one thread instead of spawning threads.
  #[arg(long)]
  cooperative: bool,
}

impl Args {
  fn to_config(&self) -> Config {
    Config {
      capacity: self.capacity,
      producers: self.producers,
      consumers: self.consumers,
      items_per_producer: self.items_per_producer,
      producer_delay: self.producer_delay_ms.map(Duration::from_millis),
      consumer_delay: self.consumer_delay_ms.map(Duration::from_millis),
    }
  }
}

fn execute(args: &Args) -> Result<Summary, Box<dyn std::error::Error>> {
  let config = args.to_config();
  if args.cooperative {
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    Ok(runtime.block_on(run_async(&config))?)
  } else {
    Ok(run(&config)?)
  }
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let args = Args::parse();
  match execute(&args) {
    Ok(summary) => {
      info!(
        produced = summary.total_produced,
        consumed = summary.total_consumed,
        "run complete"
      );
      println!(
        "produced {} items, consumed {} items",
        summary.total_produced, summary.total_consumed
      );
      if summary.is_balanced() {
        ExitCode::SUCCESS
      } else {
        ExitCode::FAILURE
      }
    }
    Err(err) => {
      error!(%err, "run failed");
      eprintln!("error: {}", err);
      ExitCode::FAILURE
    }
  }
}
