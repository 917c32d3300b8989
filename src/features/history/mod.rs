//! # History Feature
//!
//! The care-event record types and the bounded history log.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod log;
pub mod record;

pub use self::log::HistoryLog;
pub use record::{MedicationRef, Record, RecordKind, RECORD_TIME_FORMAT};
