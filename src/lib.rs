// Core layer - configuration and error taxonomy
pub mod core;

// Features layer - all feature modules
pub mod features;

// Application layer - orchestration for the interactive surface
pub mod care_manager;

// Re-export core config for convenience
pub use crate::core::{CareError, Config};

// Re-export feature items
pub use features::{
    // History
    HistoryLog, MedicationRef, Record, RecordKind,
    // Medications
    Medication, MedicationId, MedicationStore, MedicationUpdate, NewMedication,
    // Reminders
    ReminderNotice, ReminderNotifier, ReminderScheduler, SchedulerHandle,
};

pub use care_manager::{CareManager, UpcomingDoses};
