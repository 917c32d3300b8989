//! # Feature: Reminder Scheduling
//!
//! Background loop that compares the local clock against every stored
//! schedule on a fixed tick and fires exactly one reminder per
//! (medication, schedule) instant: a history record, a notice on the
//! delivery channel, and a reminded mark on the medication.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Cancellable shutdown handle; mid-scan deletes skipped cleanly
//! - 1.0.0: Initial release with fixed 10s tick

use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use log::{debug, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::features::history::{HistoryLog, Record};
use crate::features::medications::{format_schedule, MedicationStore};
use super::notifier::{ReminderNotice, ReminderNotifier};

/// Periodic scanner over the medication store
pub struct ReminderScheduler {
    store: MedicationStore,
    history: HistoryLog,
    notifier: ReminderNotifier,
    tick_interval: Duration,
}

/// Cancellation handle for the running scheduler task
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal the scheduler to stop and wait for the loop to wind down.
    ///
    /// The current sleep is abandoned promptly; an in-progress scan is
    /// allowed to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

impl ReminderScheduler {
    pub fn new(
        store: MedicationStore,
        history: HistoryLog,
        notifier: ReminderNotifier,
        tick_interval: Duration,
    ) -> Self {
        ReminderScheduler {
            store,
            history,
            notifier,
            tick_interval,
        }
    }

    /// Start the background loop. Called once at startup; the returned
    /// handle is the only way to stop it.
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown, signal) = watch::channel(false);
        let task = tokio::spawn(self.run(signal));
        SchedulerHandle { shutdown, task }
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "⏰ Reminder scheduler started (tick every {}s)",
            self.tick_interval.as_secs()
        );
        let mut ticker = tokio::time::interval(self.tick_interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.scan(Local::now().naive_local()).await;
                }
                _ = shutdown.changed() => {
                    info!("Reminder scheduler stopped");
                    break;
                }
            }
        }
    }

    /// Run one scan pass against the given clock reading.
    ///
    /// The store is read as a snapshot taken once for the whole pass;
    /// reminders fire in store order, then schedule-list order. For each
    /// due instant the history record is appended and the notice queued
    /// before the reminded mark is written back. A medication deleted
    /// between the snapshot and the write-back is skipped; the appended
    /// record stands, since records outlive their medication.
    pub async fn scan(&self, now: NaiveDateTime) {
        let snapshot = self.store.list().await;
        for medication in snapshot {
            for &due in &medication.schedules {
                if medication.is_reminded(due) || medication.is_taken(due) {
                    continue;
                }
                if now <= due {
                    continue;
                }

                let description = format!(
                    "Medication reminder for {} at {}",
                    medication.name,
                    format_schedule(due)
                );
                self.history.append(Record::reminder(now, description)).await;
                self.notifier.notify(ReminderNotice {
                    medication: medication.name.clone(),
                    dosage: medication.dosage.clone(),
                    due,
                });

                if !self.store.mark_reminded(medication.id(), due).await {
                    debug!(
                        "Medication {} removed mid-scan, skipping its remaining schedules",
                        medication.id()
                    );
                    break;
                }
                debug!(
                    "Reminder fired for {} at {}",
                    medication.name,
                    format_schedule(due)
                );
            }
        }
    }
}
