//! Producer-side slot allocation, publication and backpressure.
//!
//! The claim strategy owns the two producer counters: `claimed` (highest
//! sequence handed out) and `published` (highest sequence whose slot write
//! is visible). The gap between them is the window where a consumer must
//! not yet read the slot. Gating barriers - one per registered consumer -
//! bound how far `claimed` may run ahead of consumption: a slot is never
//! reclaimed until every consumer has acknowledged its previous occupant.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::barrier::SequenceBarrier;
use crate::error::{Result, SurgeError};
use crate::sequence::{reaches, Sequence, BEFORE_START};
use crate::trace_debug;
use crate::wait::{WaitOutcome, WaitStrategy};

pub struct SingleProducerClaim<W: WaitStrategy> {
    capacity: u64,
    claimed: Sequence,
    published: Sequence,
    closed: AtomicBool,
    gates: Vec<Arc<SequenceBarrier<W>>>,
    wait: Arc<W>,
}

impl<W: WaitStrategy> SingleProducerClaim<W> {
    /// Capacity must match the ring buffer this strategy allocates slots
    /// for: a nonzero power of two.
    pub fn new(capacity: usize, wait: Arc<W>) -> Result<Self> {
        if capacity == 0 || !capacity.is_power_of_two() {
            return Err(SurgeError::config(
                "claim strategy capacity must be a nonzero power of 2",
            ));
        }
        Ok(Self {
            capacity: capacity as u64,
            claimed: Sequence::before_start(),
            published: Sequence::before_start(),
            closed: AtomicBool::new(false),
            gates: Vec::new(),
            wait,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    /// Registers a consumer's barrier as a gating dependency.
    ///
    /// Setup-time only: the gate set is read without synchronization during
    /// steady state, so registering after the first claim is a contract
    /// violation.
    pub fn add_claim_barrier(&mut self, barrier: Arc<SequenceBarrier<W>>) {
        assert_eq!(
            self.claimed.get_relaxed(),
            BEFORE_START,
            "claim barriers must be registered before any sequence is claimed"
        );
        trace_debug!("registered claim barrier {}", self.gates.len());
        self.gates.push(barrier);
    }

    /// Distance from `next` back to the laggiest registered consumer.
    /// `next` is safe to write once this is at most `capacity`. An empty
    /// gate set leaves the producer ungated.
    #[inline(always)]
    fn lagging_distance(&self, next: u64) -> u64 {
        self.gates
            .iter()
            .map(|gate| next.wrapping_sub(gate.current()))
            .max()
            .unwrap_or(0)
    }

    /// Claims the next sequence, blocking while the ring is full.
    ///
    /// Single producer: a plain increment suffices, no compare-and-swap.
    /// Blocking here is the sole backpressure mechanism - a full ring makes
    /// the producer wait, never drop or error.
    pub fn claim_one(&self) -> u64 {
        let next = self.claimed.get_relaxed().wrapping_add(1);
        self.claimed.set_relaxed(next);
        if self.lagging_distance(next) <= self.capacity {
            return next;
        }
        self.wait.wait_until(|| {
            (self.lagging_distance(next) <= self.capacity).then_some(WaitOutcome::Reached(next))
        });
        next
    }

    /// Non-blocking claim. Does not advance the claimed counter on refusal.
    pub fn try_claim_one(&self) -> Option<u64> {
        let next = self.claimed.get_relaxed().wrapping_add(1);
        if self.lagging_distance(next) <= self.capacity {
            self.claimed.set_relaxed(next);
            Some(next)
        } else {
            None
        }
    }

    /// Makes a written slot visible to the consumer and wakes it.
    ///
    /// `sequence` must be the value most recently returned by
    /// [`claim_one`](Self::claim_one), and the slot write must be complete:
    /// the release store here is what orders slot content before its
    /// visibility.
    #[inline]
    pub fn publish(&self, sequence: u64) {
        debug_assert_eq!(
            sequence,
            self.claimed.get_relaxed(),
            "published sequence was never claimed"
        );
        self.published.set(sequence);
        self.wait.signal();
    }

    /// Blocks until the published counter reaches `from`, returning the
    /// observed counter - the upper bound of the contiguous batch
    /// `[from, returned]` the caller may drain before waiting again.
    ///
    /// Returns `None` once the stream is closed and nothing at or past
    /// `from` will ever be published.
    pub fn wait_until_published(&self, from: u64) -> Option<u64> {
        match self.wait.wait_until(|| self.published_after(from)) {
            WaitOutcome::Reached(sequence) => Some(sequence),
            WaitOutcome::Closed => None,
        }
    }

    /// Non-blocking peek at the published counter.
    pub fn try_wait_until_published(&self, from: u64) -> Option<u64> {
        match self.published_after(from) {
            Some(WaitOutcome::Reached(sequence)) => Some(sequence),
            _ => None,
        }
    }

    #[inline]
    fn published_after(&self, from: u64) -> Option<WaitOutcome> {
        let published = self.published.get();
        if reaches(published, from) {
            return Some(WaitOutcome::Reached(published));
        }
        if self.closed.load(Ordering::Acquire) {
            // close() may race with the final publish; re-read before
            // declaring the stream drained.
            let published = self.published.get();
            return if reaches(published, from) {
                Some(WaitOutcome::Reached(published))
            } else {
                Some(WaitOutcome::Closed)
            };
        }
        None
    }

    /// Ends the stream: every waiter unblocks, and consumers see `None`
    /// from [`wait_until_published`](Self::wait_until_published) once the
    /// remaining published events are drained. Termination is explicit
    /// rather than an in-band sentinel payload.
    pub fn close(&self) {
        trace_debug!("stream closed at sequence {}", self.published.get_relaxed());
        self.closed.store(true, Ordering::Release);
        self.wait.signal();
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Highest published sequence, [`BEFORE_START`] if none.
    #[inline]
    pub fn last_published(&self) -> u64 {
        self.published.get()
    }
}
