//! Fixed-capacity slot storage indexed by sequence number.
//!
//! A slot `i` is addressed by every sequence of the form `n * capacity + i`;
//! the mapping is a single mask because capacity is a power of two. The
//! buffer tracks nothing about which slots are live - that is entirely the
//! sequence arithmetic of the claim strategy and barriers, so the accessors
//! are `unsafe` and the caller upholds the claim/publish discipline.

use std::cell::UnsafeCell;

use crate::error::{Result, SurgeError};

pub struct RingBuffer<T> {
    slots: Box<[UnsafeCell<T>]>,
    mask: u64,
}

// Safety: slots are plain data; the claim/publish protocol guarantees each
// slot has one writer between a claim and its publish, and one reader
// between that publish and the slot's next reuse.
unsafe impl<T: Send> Send for RingBuffer<T> {}
unsafe impl<T: Send + Sync> Sync for RingBuffer<T> {}

impl<T: Default> RingBuffer<T> {
    /// Allocates and default-constructs `capacity` slots.
    ///
    /// Capacity must be a nonzero power of two, e.g. 16384.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 || !capacity.is_power_of_two() {
            return Err(SurgeError::config(
                "ring buffer capacity must be a nonzero power of 2",
            ));
        }

        let slots = (0..capacity)
            .map(|_| UnsafeCell::new(T::default()))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self {
            slots,
            mask: (capacity - 1) as u64,
        })
    }
}

impl<T> RingBuffer<T> {
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    fn index(&self, sequence: u64) -> usize {
        (sequence & self.mask) as usize
    }

    /// Reference to the slot addressed by `sequence`.
    ///
    /// # Safety
    ///
    /// The sequence must have been published, and the slot must not be
    /// reclaimed for writing while the reference lives (the gating barrier
    /// must not advance past it).
    #[inline(always)]
    pub unsafe fn slot(&self, sequence: u64) -> &T {
        &*self.slots.get_unchecked(self.index(sequence)).get()
    }

    /// Mutable reference to the slot addressed by `sequence`.
    ///
    /// # Safety
    ///
    /// The sequence must have been claimed and not yet published, and only
    /// the single producer may hold this reference.
    #[inline(always)]
    #[allow(clippy::mut_from_ref)] // single-producer guarantee documented above
    pub unsafe fn slot_mut(&self, sequence: u64) -> &mut T {
        &mut *self.slots.get_unchecked(self.index(sequence)).get()
    }

    /// Contiguous run of published slots starting at `sequence`, clamped at
    /// the physical end of the ring (the batch-drain read path).
    ///
    /// # Safety
    ///
    /// Every sequence in `[sequence, sequence + count)` must have been
    /// published and not yet acknowledged as consumed.
    #[inline(always)]
    pub unsafe fn slice(&self, sequence: u64, count: usize) -> &[T] {
        let start = self.index(sequence);
        let run = count.min(self.slots.len() - start);
        std::slice::from_raw_parts(self.slots.as_ptr().add(start) as *const T, run)
    }
}
