//! Consumer progress publication.

use std::sync::Arc;

use crate::sequence::{reaches, Sequence};
use crate::wait::WaitStrategy;

/// A consumer's consumed-up-to register plus a notifier.
///
/// Owned by exactly one consumer, which publishes non-decreasing sequences
/// as it finishes with events. The claim strategy reads [`current`] when
/// gating the producer, and the publish-side signal wakes a producer blocked
/// on a full ring.
///
/// [`current`]: SequenceBarrier::current
#[derive(Debug)]
pub struct SequenceBarrier<W: WaitStrategy> {
    consumed: Sequence,
    wait: Arc<W>,
}

impl<W: WaitStrategy> SequenceBarrier<W> {
    pub fn new(wait: Arc<W>) -> Self {
        Self {
            consumed: Sequence::before_start(),
            wait,
        }
    }

    /// Announces that every event up to and including `sequence` has been
    /// consumed, and wakes any thread waiting on this barrier's progress.
    ///
    /// Must only be called by the owning consumer, with non-decreasing
    /// sequences.
    #[inline]
    pub fn publish(&self, sequence: u64) {
        debug_assert!(
            reaches(sequence, self.consumed.get_relaxed()),
            "barrier publish must be non-decreasing"
        );
        self.consumed.set(sequence);
        self.wait.signal();
    }

    /// Last published consumed sequence (acquire read, idempotent).
    #[inline]
    pub fn current(&self) -> u64 {
        self.consumed.get()
    }
}
