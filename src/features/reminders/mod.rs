//! # Reminders Feature
//!
//! Scheduled reminder system: the background tick loop and the
//! non-blocking delivery channel it writes to.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

pub mod notifier;
pub mod scheduler;

pub use notifier::{ReminderNotice, ReminderNotifier};
pub use scheduler::{ReminderScheduler, SchedulerHandle};
