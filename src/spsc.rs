//! Wired single-producer single-consumer pair.
//!
//! [`channel`] assembles the ensemble - ring buffer, claim strategy, one
//! gating barrier, a shared wait strategy - and hands each thread its half.
//! The halves are not `Clone`: ownership enforces the single-producer and
//! single-consumer contracts.

use std::sync::Arc;

use crate::barrier::SequenceBarrier;
use crate::claim::SingleProducerClaim;
use crate::error::Result;
use crate::ring_buffer::RingBuffer;
use crate::sequence::reaches;
use crate::trace_debug;
use crate::wait::WaitStrategy;

/// Builds a connected producer/consumer pair over a fresh ring of
/// `capacity` default-constructed `T` slots.
pub fn channel<T, W>(capacity: usize, wait: W) -> Result<(Producer<T, W>, Consumer<T, W>)>
where
    T: Default + Send + Sync + 'static,
    W: WaitStrategy,
{
    let wait = Arc::new(wait);
    let ring = Arc::new(RingBuffer::new(capacity)?);
    let barrier = Arc::new(SequenceBarrier::new(Arc::clone(&wait)));
    let mut claim = SingleProducerClaim::new(capacity, wait)?;
    claim.add_claim_barrier(Arc::clone(&barrier));
    let claim = Arc::new(claim);
    trace_debug!("spsc channel ready, capacity {}", capacity);

    Ok((
        Producer {
            ring: Arc::clone(&ring),
            claim: Arc::clone(&claim),
        },
        Consumer {
            ring,
            claim,
            barrier,
            next: 0,
        },
    ))
}

pub struct Producer<T, W: WaitStrategy> {
    ring: Arc<RingBuffer<T>>,
    claim: Arc<SingleProducerClaim<W>>,
}

impl<T, W: WaitStrategy> Producer<T, W> {
    /// Claims the next slot, writes it in place, publishes it. Blocks while
    /// the ring is full. Returns the published sequence.
    #[inline]
    pub fn push_with<F>(&mut self, write: F) -> u64
    where
        F: FnOnce(&mut T),
    {
        let sequence = self.claim.claim_one();
        // Safety: `sequence` was claimed by the single producer and the
        // gating wait has cleared every consumer past the slot's previous
        // occupant.
        write(unsafe { self.ring.slot_mut(sequence) });
        self.claim.publish(sequence);
        sequence
    }

    /// Moves `value` into the next slot. Blocks while the ring is full.
    #[inline]
    pub fn push(&mut self, value: T) -> u64 {
        self.push_with(|slot| *slot = value)
    }

    /// Non-blocking push. Returns the sequence, or gives `value` back
    /// untouched when the ring is full.
    pub fn try_push(&mut self, value: T) -> std::result::Result<u64, T> {
        match self.claim.try_claim_one() {
            Some(sequence) => {
                // Safety: as in push_with.
                unsafe { *self.ring.slot_mut(sequence) = value };
                self.claim.publish(sequence);
                Ok(sequence)
            }
            None => Err(value),
        }
    }

    /// Ends the stream. The consumer drains whatever is already published,
    /// then observes end-of-stream.
    pub fn close(self) {
        self.claim.close();
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.claim.capacity()
    }
}

pub struct Consumer<T, W: WaitStrategy> {
    ring: Arc<RingBuffer<T>>,
    claim: Arc<SingleProducerClaim<W>>,
    barrier: Arc<SequenceBarrier<W>>,
    next: u64,
}

impl<T, W: WaitStrategy> Consumer<T, W> {
    /// One blocking wait, then processes every contiguous published event.
    ///
    /// `handle` receives the event, its sequence, and an end-of-batch flag
    /// on the last event of the drain. Consumption is acknowledged through
    /// the barrier once the whole batch is processed, which is what
    /// unblocks a gated producer. Returns the batch size, or `None` once
    /// the stream is closed and fully drained.
    pub fn drain<F>(&mut self, mut handle: F) -> Option<usize>
    where
        F: FnMut(&T, u64, bool),
    {
        let available = self.claim.wait_until_published(self.next)?;
        let total = available.wrapping_sub(self.next).wrapping_add(1) as usize;

        let mut sequence = self.next;
        let mut left = total;
        while left > 0 {
            // Safety: everything in [sequence, available] is published and
            // unacknowledged; the slice is clamped at the ring end.
            let run = unsafe { self.ring.slice(sequence, left) };
            for event in run {
                handle(event, sequence, left == 1);
                sequence = sequence.wrapping_add(1);
                left -= 1;
            }
        }

        self.next = available.wrapping_add(1);
        self.barrier.publish(available);
        Some(total)
    }

    /// Drains batches until the stream is closed and empty.
    pub fn run<F>(&mut self, mut handle: F)
    where
        F: FnMut(&T, u64, bool),
    {
        while self.drain(&mut handle).is_some() {}
    }

    /// Sequence the next drain starts from.
    #[inline]
    pub fn next_sequence(&self) -> u64 {
        self.next
    }

    /// This consumer's gating barrier (its published consumption progress).
    #[inline]
    pub fn barrier(&self) -> &SequenceBarrier<W> {
        &self.barrier
    }

    /// True once the producer closed the stream and everything published
    /// has been drained.
    pub fn is_drained(&self) -> bool {
        self.claim.is_closed() && !reaches(self.claim.last_published(), self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wait::SpinWait;

    #[derive(Default, Clone, Copy, PartialEq, Debug)]
    struct Sample {
        value: u64,
    }

    #[test]
    fn drain_processes_the_whole_batch() {
        let (mut tx, mut rx) = channel::<Sample, _>(16, SpinWait).unwrap();
        for i in 0..6u64 {
            tx.push(Sample { value: i * 10 });
        }

        let mut flags = Vec::new();
        let drained = rx.drain(|event, sequence, end_of_batch| {
            assert_eq!(event.value, sequence * 10);
            flags.push(end_of_batch);
        });

        assert_eq!(drained, Some(6));
        assert_eq!(flags, vec![false, false, false, false, false, true]);
        assert_eq!(rx.next_sequence(), 6);
        assert_eq!(rx.barrier().current(), 5);
    }

    #[test]
    fn drain_acknowledgement_reopens_the_ring() {
        let (mut tx, mut rx) = channel::<Sample, _>(4, SpinWait).unwrap();
        for i in 0..4u64 {
            assert!(tx.try_push(Sample { value: i }).is_ok());
        }
        assert!(tx.try_push(Sample { value: 99 }).is_err());

        assert_eq!(rx.drain(|_, _, _| {}), Some(4));
        assert!(tx.try_push(Sample { value: 4 }).is_ok());
    }

    #[test]
    fn close_then_run_stops() {
        let (mut tx, mut rx) = channel::<Sample, _>(8, SpinWait).unwrap();
        tx.push(Sample { value: 1 });
        tx.push(Sample { value: 2 });
        tx.close();

        let mut seen = 0;
        rx.run(|_, _, _| seen += 1);
        assert_eq!(seen, 2);
        assert!(rx.is_drained());
        assert_eq!(rx.drain(|_, _, _| {}), None);
    }

    #[test]
    fn wraparound_preserves_values() {
        let (mut tx, mut rx) = channel::<Sample, _>(4, SpinWait).unwrap();
        // Three laps around a 4-slot ring, drained between bursts.
        for lap in 0..3u64 {
            for i in 0..4u64 {
                tx.push(Sample {
                    value: lap * 4 + i,
                });
            }
            let mut expected = lap * 4;
            rx.drain(|event, sequence, _| {
                assert_eq!(sequence, expected);
                assert_eq!(event.value, expected);
                expected += 1;
            })
            .unwrap();
        }
    }
}
