//! # Care Manager
//!
//! Orchestrates the operations the interactive surface drives: inventory
//! CRUD with audit records, intake logging, wellness feedback, and the
//! history views. Every menu action goes through here and into the store
//! and history log.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Audit records for edit/delete/view restored to the history
//! - 1.0.0: Initial release

use chrono::{Local, NaiveDateTime};
use log::info;

use crate::core::CareError;
use crate::features::history::{HistoryLog, MedicationRef, Record, RecordKind};
use crate::features::medications::{
    format_schedule, parse_schedule_list, Medication, MedicationId, MedicationStore,
    MedicationUpdate, NewMedication,
};

/// Schedules still awaiting intake for one medication, for the reminders view
#[derive(Debug, Clone)]
pub struct UpcomingDoses {
    pub name: String,
    pub dosage: String,
    pub instructions: String,
    pub schedules: Vec<NaiveDateTime>,
}

/// Front door for the interactive surface
#[derive(Clone)]
pub struct CareManager {
    store: MedicationStore,
    history: HistoryLog,
}

impl CareManager {
    pub fn new(store: MedicationStore, history: HistoryLog) -> Self {
        CareManager { store, history }
    }

    /// Parse the schedule batch and add the medication.
    pub async fn add_medication(
        &self,
        name: &str,
        dosage: &str,
        schedule_input: &str,
        instructions: &str,
    ) -> Result<MedicationId, CareError> {
        let schedules = parse_schedule_list(schedule_input)?;
        let id = self
            .store
            .add(NewMedication {
                name: name.to_string(),
                dosage: dosage.to_string(),
                schedules,
                instructions: instructions.to_string(),
            })
            .await?;
        info!("Added medication {name} ({id})");
        Ok(id)
    }

    /// Apply the supplied edits to the medication at `index` and record
    /// the change. Fields the user left blank arrive as `None` and keep
    /// their prior values.
    pub async fn edit_medication(
        &self,
        index: usize,
        name: Option<&str>,
        dosage: Option<&str>,
        schedule_input: Option<&str>,
        instructions: Option<&str>,
    ) -> Result<(), CareError> {
        let schedules = match schedule_input {
            Some(input) => Some(parse_schedule_list(input)?),
            None => None,
        };
        self.store
            .edit(
                index,
                MedicationUpdate {
                    name: name.map(str::to_string),
                    dosage: dosage.map(str::to_string),
                    schedules,
                    instructions: instructions.map(str::to_string),
                },
            )
            .await?;

        let edited = self.store.get(index).await?;
        self.history
            .append(Record::reminder(
                now(),
                format!("Edited medication: {}", edited.name),
            ))
            .await;
        info!("Edited medication {} ({})", edited.name, edited.id());
        Ok(())
    }

    /// Delete the medication at `index`, record the deletion, and return
    /// the removed name.
    pub async fn delete_medication(&self, index: usize) -> Result<String, CareError> {
        let removed = self.store.delete(index).await?;
        self.history
            .append(Record::reminder(
                now(),
                format!("Deleted medication: {}", removed.name),
            ))
            .await;
        info!("Deleted medication {} ({})", removed.name, removed.id());
        Ok(removed.name)
    }

    /// Snapshot of the inventory, in order
    pub async fn medications(&self) -> Vec<Medication> {
        self.store.list().await
    }

    /// Snapshot of one medication by position
    pub async fn medication(&self, index: usize) -> Result<Medication, CareError> {
        self.store.get(index).await
    }

    /// Schedules still awaiting intake, per medication, and an audit
    /// record that the view happened.
    pub async fn upcoming_reminders(&self) -> Vec<UpcomingDoses> {
        let upcoming: Vec<UpcomingDoses> = self
            .store
            .list()
            .await
            .into_iter()
            .filter_map(|m| {
                let schedules = m.untaken_schedules();
                if schedules.is_empty() {
                    None
                } else {
                    Some(UpcomingDoses {
                        name: m.name.clone(),
                        dosage: m.dosage.clone(),
                        instructions: m.instructions.clone(),
                        schedules,
                    })
                }
            })
            .collect();

        self.history
            .append(Record::reminder(now(), "Viewed reminders."))
            .await;
        upcoming
    }

    /// Mark a schedule administered and append the intake record.
    ///
    /// A dose taken after its reminder fired keeps the reminded state;
    /// taking it only suppresses future reminders for that instant.
    pub async fn log_intake(
        &self,
        med_index: usize,
        schedule_index: usize,
        note: Option<&str>,
    ) -> Result<(), CareError> {
        let (medication, instant) = self.store.mark_taken(med_index, schedule_index).await?;
        let note = note
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Taken");
        let description = format!("{note} at {}", format_schedule(instant));
        self.history
            .append(Record::intake(
                now(),
                description,
                MedicationRef::from(&medication),
            ))
            .await;
        info!(
            "Intake logged for {} at {}",
            medication.name,
            format_schedule(instant)
        );
        Ok(())
    }

    /// Record patient wellness feedback.
    pub async fn add_feedback(&self, feeling: &str, symptoms: &str) {
        let feeling = feeling.trim();
        let symptoms = symptoms.trim();
        let mut notes = format!(
            "Feeling: {}",
            if feeling.is_empty() {
                "Not specified"
            } else {
                feeling
            }
        );
        if !symptoms.is_empty() {
            notes.push_str(&format!(" | Symptoms: {symptoms}"));
        }
        self.history
            .append(Record::feedback(now(), "Patient wellness feedback", notes))
            .await;
    }

    /// Every record, oldest first
    pub async fn history(&self) -> Vec<Record> {
        self.history.all().await
    }

    /// Feedback records only, oldest first
    pub async fn feedback_history(&self) -> Vec<Record> {
        self.history.of_kind(RecordKind::Feedback).await
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reminders::{ReminderNotifier, ReminderScheduler};
    use chrono::Duration as ChronoDuration;
    use std::time::Duration;

    fn manager() -> (CareManager, MedicationStore, HistoryLog) {
        let store = MedicationStore::new(10);
        let history = HistoryLog::new(50);
        (
            CareManager::new(store.clone(), history.clone()),
            store,
            history,
        )
    }

    fn future_input(minutes: i64) -> String {
        format_schedule(Local::now().naive_local() + ChronoDuration::minutes(minutes))
    }

    #[tokio::test]
    async fn test_add_medication_rejects_bad_schedule_batch() {
        let (care, store, _history) = manager();
        let err = care
            .add_medication("Aspirin", "100mg", "not a date", "with food")
            .await
            .unwrap_err();
        assert!(matches!(err, CareError::Validation(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_edit_appends_audit_record_with_new_name() {
        let (care, _store, history) = manager();
        care.add_medication("Aspirin", "100mg", &future_input(5), "with food")
            .await
            .unwrap();

        care.edit_medication(0, Some("Ibuprofen"), None, None, None)
            .await
            .unwrap();

        let records = history.all().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description(), "Edited medication: Ibuprofen");
    }

    #[tokio::test]
    async fn test_delete_appends_audit_record_and_compacts() {
        let (care, store, history) = manager();
        care.add_medication("Aspirin", "100mg", &future_input(5), "with food")
            .await
            .unwrap();
        care.add_medication("Ibuprofen", "200mg", &future_input(5), "after meals")
            .await
            .unwrap();

        let name = care.delete_medication(0).await.unwrap();
        assert_eq!(name, "Aspirin");
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(0).await.unwrap().name, "Ibuprofen");

        let records = history.all().await;
        assert_eq!(records.last().unwrap().description(), "Deleted medication: Aspirin");
    }

    #[tokio::test]
    async fn test_log_intake_defaults_note_and_marks_taken() {
        let (care, store, history) = manager();
        care.add_medication("Aspirin", "100mg", &future_input(5), "with food")
            .await
            .unwrap();

        care.log_intake(0, 0, None).await.unwrap();

        let med = store.get(0).await.unwrap();
        let instant = med.schedules[0];
        assert!(med.is_taken(instant));

        let records = history.of_kind(RecordKind::Intake).await;
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].description(),
            format!("Taken at {}", format_schedule(instant))
        );
        assert!(records[0].to_string().contains("Aspirin (100mg)"));
    }

    #[tokio::test]
    async fn test_log_intake_uses_supplied_note() {
        let (care, store, history) = manager();
        care.add_medication("Aspirin", "100mg", &future_input(5), "with food")
            .await
            .unwrap();

        care.log_intake(0, 0, Some("With breakfast")).await.unwrap();

        let instant = store.get(0).await.unwrap().schedules[0];
        let records = history.of_kind(RecordKind::Intake).await;
        assert_eq!(
            records[0].description(),
            format!("With breakfast at {}", format_schedule(instant))
        );
    }

    #[tokio::test]
    async fn test_log_intake_out_of_range() {
        let (care, _store, _history) = manager();
        let err = care.log_intake(0, 0, None).await.unwrap_err();
        assert_eq!(err, CareError::IndexOutOfRange { index: 0, len: 0 });
    }

    #[tokio::test]
    async fn test_feedback_notes_assembly() {
        let (care, _store, _history) = manager();
        care.add_feedback("tired", "mild headache").await;
        care.add_feedback("", "").await;

        let records = care.feedback_history().await;
        assert_eq!(records.len(), 2);
        assert!(records[0]
            .to_string()
            .contains("Feeling: tired | Symptoms: mild headache"));
        assert!(records[1].to_string().contains("Feeling: Not specified"));
        assert!(!records[1].to_string().contains("Symptoms"));
    }

    #[tokio::test]
    async fn test_upcoming_reminders_skip_taken_and_audit_the_view() {
        let (care, _store, history) = manager();
        let first = future_input(5);
        let second = future_input(10);
        care.add_medication(
            "Aspirin",
            "100mg",
            &format!("{first}, {second}"),
            "with food",
        )
        .await
        .unwrap();
        care.log_intake(0, 0, None).await.unwrap();

        let upcoming = care.upcoming_reminders().await;
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].schedules.len(), 1);
        assert_eq!(format_schedule(upcoming[0].schedules[0]), second);

        assert_eq!(
            history.all().await.last().unwrap().description(),
            "Viewed reminders."
        );
    }

    /// End-to-end: add, let the scheduler fire, log intake, verify the
    /// history holds both events and nothing more.
    #[tokio::test]
    async fn test_end_to_end_reminder_then_intake() {
        let store = MedicationStore::new(10);
        let history = HistoryLog::new(50);
        let care = CareManager::new(store.clone(), history.clone());
        let (notifier, mut notices) = ReminderNotifier::channel();
        let scheduler = ReminderScheduler::new(
            store.clone(),
            history.clone(),
            notifier,
            Duration::from_secs(10),
        );

        care.add_medication("Aspirin", "100mg", &future_input(2), "with food")
            .await
            .unwrap();
        assert_eq!(store.len().await, 1);

        let due = store.get(0).await.unwrap().schedules[0];
        scheduler.scan(due + ChronoDuration::minutes(1)).await;

        let reminders = history.of_kind(RecordKind::Reminder).await;
        assert_eq!(reminders.len(), 1);
        assert!(reminders[0].description().contains("Aspirin"));
        assert_eq!(notices.recv().await.unwrap().medication, "Aspirin");

        care.log_intake(0, 0, None).await.unwrap();

        // Intake appended, prior reminder untouched, no further reminders
        scheduler.scan(due + ChronoDuration::minutes(2)).await;
        assert_eq!(history.of_kind(RecordKind::Reminder).await.len(), 1);
        assert_eq!(history.of_kind(RecordKind::Intake).await.len(), 1);
    }
}
