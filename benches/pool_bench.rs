use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use dynpool::{ThreadConfig, ThreadPool};
use rand::prelude::*;

fn submit_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit");

    group.bench_function("noop_jobs", |b| {
        b.iter_batched(
            || {
                ThreadPool::new(2, num_cpus::get().max(2), None, ThreadConfig::default()).unwrap()
            },
            |pool| {
                for _ in 0..1000 {
                    pool.spawn(|| {});
                }
                pool.join();
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("counting_jobs", |b| {
        b.iter_batched(
            || {
                let pool =
                    ThreadPool::new(2, num_cpus::get().max(2), None, ThreadConfig::default())
                        .unwrap();
                (pool, Arc::new(AtomicU64::new(0)))
            },
            |(pool, counter)| {
                for _ in 0..1000 {
                    let counter = Arc::clone(&counter);
                    pool.spawn(move || {
                        counter.fetch_add(1, Ordering::Relaxed);
                    });
                }
                pool.join();
                assert_eq!(counter.load(Ordering::Relaxed), 1000);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn burst_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("burst");

    // Jittered short sleeps approximate a mixed I/O workload; the pool
    // grows to its ceiling under the burst and shrinks afterwards.
    group.bench_function("mixed_durations", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        let delays: Vec<u64> = (0..200).map(|_| rng.gen_range(0..200)).collect();

        b.iter_batched(
            || {
                let pool = ThreadPool::new(
                    1,
                    num_cpus::get().max(2),
                    Some(Duration::from_millis(100)),
                    ThreadConfig::default(),
                )
                .unwrap();
                (pool, delays.clone())
            },
            |(pool, delays)| {
                for micros in delays {
                    pool.spawn(move || {
                        std::thread::sleep(Duration::from_micros(micros));
                    });
                }
                pool.join();
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, submit_bench, burst_bench);
criterion_main!(benches);
