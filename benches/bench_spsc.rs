//! SPSC stream throughput benchmarks.
//!
//! Run: cargo bench --bench bench_spsc

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::thread;

use surge::affinity::pin_to_core;
use surge::{spsc, BlockingWait, SpinWait, WaitStrategy};

const RING_SIZE: usize = 1024;
const TOTAL_EVENTS: u64 = 1_000_000;

#[derive(Default, Clone, Copy)]
struct Event {
    data: u64,
}

fn run_stream<W: WaitStrategy + Default>(events: u64) -> u64 {
    let (mut tx, mut rx) = spsc::channel::<Event, W>(RING_SIZE, W::default()).unwrap();

    let producer = thread::spawn(move || {
        let _ = pin_to_core(0);
        for i in 1..=events {
            tx.push_with(|slot| slot.data = i);
        }
        tx.close();
    });

    let _ = pin_to_core(1);
    let mut sum = 0u64;
    rx.run(|event, _sequence, _end_of_batch| sum += event.data);

    producer.join().unwrap();
    sum
}

fn run_raw_publish(events: u64) -> u64 {
    // Ungated single-thread claim/publish cycle: the per-event floor.
    let claim =
        surge::SingleProducerClaim::new(RING_SIZE, std::sync::Arc::new(SpinWait)).unwrap();
    let mut last = 0;
    for _ in 0..events {
        last = claim.claim_one();
        claim.publish(last);
    }
    last
}

fn bench_spsc(c: &mut Criterion) {
    let expected = TOTAL_EVENTS * (TOTAL_EVENTS + 1) / 2;

    let mut group = c.benchmark_group("spsc_stream");
    group.throughput(Throughput::Elements(TOTAL_EVENTS));
    group.sample_size(10);

    group.bench_function(BenchmarkId::new("spin", TOTAL_EVENTS), |b| {
        b.iter(|| {
            let sum = run_stream::<SpinWait>(TOTAL_EVENTS);
            assert_eq!(sum, expected);
            sum
        })
    });

    group.bench_function(BenchmarkId::new("blocking", TOTAL_EVENTS), |b| {
        b.iter(|| {
            let sum = run_stream::<BlockingWait>(TOTAL_EVENTS);
            assert_eq!(sum, expected);
            sum
        })
    });

    group.finish();

    let mut group = c.benchmark_group("claim_publish");
    group.throughput(Throughput::Elements(TOTAL_EVENTS));
    group.bench_function("ungated", |b| b.iter(|| run_raw_publish(TOTAL_EVENTS)));
    group.finish();
}

criterion_group!(benches, bench_spsc);
criterion_main!(benches);
