//! Thread affinity for Linux.
//!
//! The demo drivers and benches pin the producer and consumer to distinct
//! cores so the spin strategies measure the protocol, not the scheduler.
//!
//! ```rust,ignore
//! use surge::affinity::pin_to_core;
//! let _ = pin_to_core(0);
//! ```

use std::io;

/// Pin the current thread to a specific CPU core.
#[cfg(target_os = "linux")]
pub fn pin_to_core(core_id: usize) -> io::Result<()> {
    use libc::{cpu_set_t, sched_setaffinity, CPU_SET, CPU_ZERO};

    let mut set: cpu_set_t = unsafe { std::mem::zeroed() };
    unsafe {
        CPU_ZERO(&mut set);
        CPU_SET(core_id, &mut set);

        if sched_setaffinity(0, std::mem::size_of::<cpu_set_t>(), &set) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn pin_to_core(_core_id: usize) -> io::Result<()> {
    Err(io::Error::new(io::ErrorKind::Unsupported, "Linux only"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(target_os = "linux")]
    fn pin_to_first_core() {
        // May be refused inside a restricted cpuset; just must not panic.
        let _ = pin_to_core(0);
    }

    #[test]
    #[cfg(not(target_os = "linux"))]
    fn pin_is_unsupported_elsewhere() {
        assert!(pin_to_core(0).is_err());
    }
}
