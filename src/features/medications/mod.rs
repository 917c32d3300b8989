//! # Medications Feature
//!
//! Medication entities and the bounded inventory store shared with the
//! reminder scheduler.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod medication;
pub mod store;

pub use medication::{
    format_schedule, parse_schedule_list, Medication, MedicationId, SCHEDULE_FORMAT,
};
pub use store::{MedicationStore, MedicationUpdate, NewMedication};
