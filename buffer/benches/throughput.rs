use bobbin::{run, Config};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_threaded_run(c: &mut Criterion) {
  let mut group = c.benchmark_group("threaded_run");

  for (capacity, producers, consumers, items) in [
    (4usize, 1usize, 1usize, 10_000u64),
    (16, 4, 4, 10_000),
    (128, 8, 8, 10_000),
  ] {
    let config = Config {
      capacity,
      producers,
      consumers,
      items_per_producer: items,
      ..Config::default()
    };
    let total_items = config.expected_items();
    group.throughput(Throughput::Elements(total_items));
    group.bench_with_input(
      BenchmarkId::from_parameter(format!("cap{}_p{}_c{}", capacity, producers, consumers)),
      &config,
      |b, config| {
        b.iter(|| {
          let summary = run(config).expect("bench config is valid");
          assert!(summary.is_balanced());
        });
      },
    );
  }

  group.finish();
}

criterion_group!(benches, bench_threaded_run);
criterion_main!(benches);
