//! Error types for surge.
//!
//! Only construction faults are recoverable errors. Contract violations
//! (publishing an unclaimed sequence, late barrier registration) are
//! assertions, and "buffer full" / "no new data" are blocking waits, not
//! errors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SurgeError>;

#[derive(Error, Debug)]
pub enum SurgeError {
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SurgeError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
