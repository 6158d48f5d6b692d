//! Blocking-strategy demo: bursty producer, parked consumer, clean close.
//!
//! The consumer sleeps on a condvar between bursts instead of spinning;
//! the final close() wakes it a last time and ends the run without any
//! sentinel value in the payload.
//!
//! Run: cargo run --release --example blocking_close

use std::thread;
use std::time::Duration;

use surge::{spsc, BlockingWait};

const RING_SIZE: usize = 256;
const BURSTS: u64 = 10;
const BURST_LEN: u64 = 1000;

#[derive(Default, Clone, Copy)]
struct Event {
    data: u64,
}

fn main() {
    println!("\n=== Blocking close demo ===\n");

    let (mut tx, mut rx) = spsc::channel::<Event, _>(RING_SIZE, BlockingWait::default()).unwrap();

    let consumer = thread::spawn(move || {
        let mut received = 0u64;
        let mut wakeups = 0u64;
        while let Some(drained) = rx.drain(|_event, _sequence, _end_of_batch| {}) {
            received += drained as u64;
            wakeups += 1;
        }
        (received, wakeups)
    });

    for burst in 0..BURSTS {
        for i in 0..BURST_LEN {
            tx.push(Event {
                data: burst * BURST_LEN + i,
            });
        }
        // Idle gap: the consumer parks instead of burning a core.
        thread::sleep(Duration::from_millis(10));
    }
    tx.close();

    let (received, wakeups) = consumer.join().unwrap();
    assert_eq!(received, BURSTS * BURST_LEN);
    println!("Received {} events in {} wake-ups", received, wakeups);
}
