//! Non-blocking delivery sink for fired reminders.
//!
//! Notices are queued on an unbounded channel and drained by whichever
//! surface owns the receiver, so the scheduler never blocks on delivery.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use std::fmt;

use chrono::NaiveDateTime;
use log::warn;
use tokio::sync::mpsc;

use crate::features::medications::format_schedule;

/// A reminder ready for user-facing delivery
#[derive(Debug, Clone)]
pub struct ReminderNotice {
    pub medication: String,
    pub dosage: String,
    pub due: NaiveDateTime,
}

impl fmt::Display for ReminderNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time to take {} ({}) at {}",
            self.medication,
            self.dosage,
            format_schedule(self.due)
        )
    }
}

/// Queues notices for delivery without blocking the sender
#[derive(Clone)]
pub struct ReminderNotifier {
    sender: mpsc::UnboundedSender<ReminderNotice>,
}

impl ReminderNotifier {
    /// Create a notifier and the receiving end the surface drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ReminderNotice>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (ReminderNotifier { sender }, receiver)
    }

    /// Queue a notice for delivery (non-blocking)
    pub fn notify(&self, notice: ReminderNotice) {
        if let Err(e) = self.sender.send(notice) {
            warn!("Failed to queue reminder notice: {e}");
        }
    }
}
