//! # Error Taxonomy
//!
//! Typed, recoverable errors for the care operations. The core never
//! terminates the process: every operation reports one of these and the
//! interactive surface renders it.

use thiserror::Error;

/// Errors returned by store, history, and intake operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CareError {
    /// Empty or invalid field, invalid or past schedule
    #[error("{0}")]
    Validation(String),

    /// Medication storage is full
    #[error("medication storage is full (capacity {0})")]
    Capacity(usize),

    /// Position reference outside the current sequence
    #[error("index {index} out of range (size {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Intake logging against a medication with no schedules
    #[error("no schedules for this medication")]
    NoSchedules,
}

impl CareError {
    /// Shorthand for a validation failure with a message
    pub fn validation(message: impl Into<String>) -> Self {
        CareError::Validation(message.into())
    }
}
