//! Pluggable waiting policies.
//!
//! A wait strategy decides how a thread blocks until a condition over
//! sequences holds and how it is woken when state changes:
//!
//! - [`SpinWait`] - busy-polls, lowest latency, burns a core while idle
//! - [`BlockingWait`] - mutex + condvar, lowest CPU, higher wake-up latency
//!
//! The policy is chosen at construction time and shared (via `Arc`) by every
//! barrier and claim strategy that blocks or signals on it.

use std::sync::{Condvar, Mutex};

/// Result of a wait: the observed sequence once the condition held, or the
/// distinguished end-of-stream outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The awaited condition holds; carries the observed sequence, which may
    /// exceed the requested one (the batch-drain upper bound).
    Reached(u64),
    /// The stream was closed and the condition can no longer be met.
    Closed,
}

pub trait WaitStrategy: Send + Sync + 'static {
    /// Blocks the calling thread until `check` yields an outcome, then
    /// returns it.
    ///
    /// `check` must be cheap and side-effect free; it is re-evaluated an
    /// unbounded number of times. Implementations must not lose a signal
    /// that arrives between a failed check and going to sleep.
    fn wait_until<F>(&self, check: F) -> WaitOutcome
    where
        F: Fn() -> Option<WaitOutcome>;

    /// Wakes every thread blocked in [`wait_until`](Self::wait_until).
    fn signal(&self);
}

/// Busy-spin policy: re-checks in a tight loop with a CPU relax hint.
///
/// Immune to lost wake-ups by construction; `signal` is a no-op. Unbounded
/// CPU usage while idle is the accepted trade-off for minimum latency.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinWait;

impl WaitStrategy for SpinWait {
    #[inline]
    fn wait_until<F>(&self, check: F) -> WaitOutcome
    where
        F: Fn() -> Option<WaitOutcome>,
    {
        loop {
            if let Some(outcome) = check() {
                return outcome;
            }
            std::hint::spin_loop();
        }
    }

    #[inline]
    fn signal(&self) {}
}

/// Parking policy: suspends the thread on a condvar until signalled.
///
/// The condition is re-checked while holding the lock before every sleep,
/// and `signal` notifies under the same lock, which closes the race between
/// a failed check and entering the wait.
#[derive(Debug, Default)]
pub struct BlockingWait {
    lock: Mutex<()>,
    cond: Condvar,
}

impl WaitStrategy for BlockingWait {
    fn wait_until<F>(&self, check: F) -> WaitOutcome
    where
        F: Fn() -> Option<WaitOutcome>,
    {
        // Fast path: no lock traffic while the stream keeps up.
        if let Some(outcome) = check() {
            return outcome;
        }
        let mut guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if let Some(outcome) = check() {
                return outcome;
            }
            guard = self.cond.wait(guard).unwrap_or_else(|e| e.into_inner());
        }
    }

    fn signal(&self) {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.cond.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn spin_returns_when_condition_already_holds() {
        let outcome = SpinWait.wait_until(|| Some(WaitOutcome::Reached(9)));
        assert_eq!(outcome, WaitOutcome::Reached(9));
    }

    #[test]
    fn blocking_returns_without_sleeping_when_condition_holds() {
        let wait = BlockingWait::default();
        let outcome = wait.wait_until(|| Some(WaitOutcome::Closed));
        assert_eq!(outcome, WaitOutcome::Closed);
    }

    #[test]
    fn blocking_waiter_wakes_on_signal() {
        let wait = Arc::new(BlockingWait::default());
        let value = Arc::new(AtomicU64::new(0));

        let w = wait.clone();
        let v = value.clone();
        let waiter = thread::spawn(move || {
            w.wait_until(|| {
                let seen = v.load(Ordering::Acquire);
                (seen != 0).then_some(WaitOutcome::Reached(seen))
            })
        });

        // Give the waiter a chance to park before publishing.
        thread::sleep(std::time::Duration::from_millis(20));
        value.store(7, Ordering::Release);
        wait.signal();

        assert_eq!(waiter.join().unwrap(), WaitOutcome::Reached(7));
    }

    #[test]
    fn spin_polls_cross_thread_progress() {
        let value = Arc::new(AtomicU64::new(0));
        let v = value.clone();
        let waiter = thread::spawn(move || {
            SpinWait.wait_until(|| {
                let seen = v.load(Ordering::Acquire);
                (seen >= 3).then_some(WaitOutcome::Reached(seen))
            })
        });

        value.store(3, Ordering::Release);
        assert_eq!(waiter.join().unwrap(), WaitOutcome::Reached(3));
    }
}
