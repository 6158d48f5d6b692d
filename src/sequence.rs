//! Monotonic sequence counters.
//!
//! A sequence identifies a logical position in the unbounded event stream.
//! Counters start at [`BEFORE_START`] (`u64::MAX`, i.e. -1 in wrapping
//! arithmetic) so the first claimed sequence is 0. 64 bits never wrap at
//! realistic rates, but all comparisons go through [`reaches`] so the
//! before-the-start value orders below every real sequence.

use std::sync::atomic::{AtomicU64, Ordering};

/// Value a sequence holds before anything has been claimed or published.
pub const BEFORE_START: u64 = u64::MAX;

/// Wrap-aware `current >= target`.
#[inline(always)]
pub fn reaches(current: u64, target: u64) -> bool {
    current.wrapping_sub(target) as i64 >= 0
}

/// Cache-line padded atomic sequence counter (prevents false sharing).
#[repr(align(128))]
#[derive(Debug)]
pub struct Sequence(AtomicU64);

impl Sequence {
    pub fn new(value: u64) -> Self {
        Self(AtomicU64::new(value))
    }

    pub fn before_start() -> Self {
        Self::new(BEFORE_START)
    }

    /// Acquire load: writes made before the matching [`set`](Self::set) are
    /// visible after this returns the stored value.
    #[inline(always)]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    #[inline(always)]
    pub fn get_relaxed(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Release store: publishes all preceding memory writes (e.g. a ring
    /// buffer slot) to any thread that acquires this value.
    #[inline(always)]
    pub fn set(&self, value: u64) {
        self.0.store(value, Ordering::Release)
    }

    #[inline(always)]
    pub fn set_relaxed(&self, value: u64) {
        self.0.store(value, Ordering::Relaxed)
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::before_start()
    }
}
