//! Surge - single-producer single-consumer disruptor.
//!
//! A fixed-capacity, power-of-two ring buffer coordinated by monotonic
//! sequence counters (LMAX Disruptor pattern). One producer thread streams
//! fixed-size events to one consumer thread without per-event locking; a
//! gating barrier gives the producer backpressure instead of overwrites, and
//! the consumer drains every contiguous published event per wake-up.
//!
//! - [`Sequence`] - cache-padded atomic position counter
//! - [`RingBuffer<T>`] - power-of-two slot storage indexed by sequence
//! - [`SpinWait`] / [`BlockingWait`] - pluggable waiting policies
//! - [`SequenceBarrier`] - consumer progress publication
//! - [`SingleProducerClaim`] - slot allocation, publication and backpressure
//! - [`spsc::channel`] - the pieces wired into a producer/consumer pair

pub mod affinity;
mod barrier;
mod claim;
pub mod error;
mod ring_buffer;
mod sequence;
pub mod spsc;
mod wait;

pub use barrier::SequenceBarrier;
pub use claim::SingleProducerClaim;
pub use error::{Result, SurgeError};
pub use ring_buffer::RingBuffer;
pub use sequence::{reaches, Sequence, BEFORE_START};
pub use wait::{BlockingWait, SpinWait, WaitOutcome, WaitStrategy};

// Tracing macros - no-op when the feature is disabled
#[cfg(feature = "tracing")]
macro_rules! trace_debug { ($($arg:tt)*) => { tracing::debug!($($arg)*) } }
#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug { ($($arg:tt)*) => {} }
pub(crate) use trace_debug;
