/*!
 * Simulation Benchmarks
 *
 * Full MLQ runs over synthetic batches of increasing size
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mlq_sim::{Dispatcher, ProcessRecord, QueueLevel};

fn synthetic_batch(count: usize) -> Vec<ProcessRecord> {
    (0..count)
        .map(|i| {
            let level = QueueLevel::ALL[i % 3];
            let burst = 1 + (i as u64 * 7) % 13;
            let arrival = (i as u64 * 3) / 2;
            ProcessRecord::new(format!("p{}", i), burst, arrival, level, 0).unwrap()
        })
        .collect()
}

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");

    for count in [10usize, 100, 1_000] {
        let batch = synthetic_batch(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &batch, |b, batch| {
            b.iter(|| {
                let outcome = Dispatcher::with_defaults(black_box(batch.clone())).run();
                black_box(outcome.final_time)
            });
        });
    }

    group.finish();
}

fn bench_text_report(c: &mut Criterion) {
    let outcome = Dispatcher::with_defaults(synthetic_batch(500)).run();

    c.bench_function("render_text_500", |b| {
        b.iter(|| mlq_sim::report::render_text(black_box(&outcome.records)).unwrap());
    });
}

criterion_group!(benches, bench_full_run, bench_text_report);
criterion_main!(benches);
