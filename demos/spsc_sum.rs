//! Spin-strategy SPSC stream demo.
//!
//! One producer streams 1,000,000 events through a 2048-slot ring to one
//! consumer, which drains in batches and verifies the running sum. The
//! stream ends with an explicit close, not a sentinel payload.
//!
//! Run: cargo run --release --example spsc_sum

use std::thread;
use std::time::Instant;

use surge::affinity::pin_to_core;
use surge::{spsc, SpinWait};

const RING_SIZE: usize = 1024 * 2;
const MESSAGE_COUNT: u64 = 1_000_000;

#[derive(Default, Clone, Copy)]
struct Event {
    data: u64,
}

fn main() {
    println!("\n=== SPSC sum demo ===\n");

    let (mut tx, mut rx) = spsc::channel::<Event, _>(RING_SIZE, SpinWait).unwrap();

    let producer = thread::spawn(move || {
        let _ = pin_to_core(0);
        for i in 1..=MESSAGE_COUNT {
            // Claim a slot (waits if the ring is full), write, publish.
            tx.push_with(|slot| slot.data = i);
        }
        tx.close();
    });

    let consumer = thread::spawn(move || {
        let _ = pin_to_core(1);
        let mut sum = 0u64;
        let mut batches = 0u64;
        let mut largest = 0usize;
        // Each drain processes every contiguous published event.
        while let Some(drained) = rx.drain(|event, _sequence, _end_of_batch| {
            sum += event.data;
        }) {
            batches += 1;
            largest = largest.max(drained);
        }
        (sum, batches, largest)
    });

    let start = Instant::now();
    producer.join().unwrap();
    let (sum, batches, largest) = consumer.join().unwrap();
    let duration = start.elapsed();

    let expected = MESSAGE_COUNT * (MESSAGE_COUNT + 1) / 2;
    assert_eq!(sum, expected, "sum mismatch!");

    let throughput = MESSAGE_COUNT as f64 / duration.as_secs_f64() / 1_000_000.0;
    println!("Verified: sum = {} (expected {})", sum, expected);
    println!(
        "Batches: {} (avg {:.1} events, largest {})",
        batches,
        MESSAGE_COUNT as f64 / batches as f64,
        largest
    );
    println!("Throughput: {:.2}M msgs/sec", throughput);
}
