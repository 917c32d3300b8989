//! # Features
//!
//! Feature modules for the care system.

pub mod history;
pub mod medications;
pub mod reminders;

// Re-export feature items
pub use history::{HistoryLog, MedicationRef, Record, RecordKind};
pub use medications::{
    Medication, MedicationId, MedicationStore, MedicationUpdate, NewMedication,
};
pub use reminders::{ReminderNotice, ReminderNotifier, ReminderScheduler, SchedulerHandle};
