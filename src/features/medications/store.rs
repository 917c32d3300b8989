//! # Feature: Medication Store
//!
//! Bounded, ordered medication inventory with index-based CRUD, shared
//! between the interactive surface and the reminder scheduler. One write
//! lock per operation; readers get cloned snapshots.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: By-id write-backs (mark_reminded) tolerate concurrent deletes
//! - 1.1.0: Capacity made configurable
//! - 1.0.0: Initial release with index CRUD

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use log::debug;
use tokio::sync::RwLock;

use crate::core::CareError;
use super::medication::{format_schedule, Medication, MedicationId};

/// Validated input for a new medication
#[derive(Debug, Clone)]
pub struct NewMedication {
    pub name: String,
    pub dosage: String,
    pub schedules: Vec<NaiveDateTime>,
    pub instructions: String,
}

/// Field-by-field edit; `None` keeps the prior value
#[derive(Debug, Clone, Default)]
pub struct MedicationUpdate {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub schedules: Option<Vec<NaiveDateTime>>,
    pub instructions: Option<String>,
}

/// Bounded medication inventory. Cloning shares the underlying state.
#[derive(Clone)]
pub struct MedicationStore {
    medications: Arc<RwLock<Vec<Medication>>>,
    next_id: Arc<AtomicU64>,
    capacity: usize,
}

impl MedicationStore {
    pub fn new(capacity: usize) -> Self {
        MedicationStore {
            medications: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            capacity,
        }
    }

    /// Add a medication, returning its stable id.
    ///
    /// Fails validation when a text field is empty, the schedule list is
    /// empty, or any schedule is not strictly in the future; fails with
    /// `Capacity` when the store is full.
    pub async fn add(&self, new: NewMedication) -> Result<MedicationId, CareError> {
        validate_text("Name", &new.name)?;
        validate_text("Dosage", &new.dosage)?;
        validate_schedules(&new.schedules)?;
        validate_text("Instructions", &new.instructions)?;

        let mut medications = self.medications.write().await;
        if medications.len() >= self.capacity {
            return Err(CareError::Capacity(self.capacity));
        }
        let id = MedicationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        medications.push(Medication::new(
            id,
            new.name,
            new.dosage,
            new.schedules,
            new.instructions,
        ));
        debug!("Added medication {id} ({} stored)", medications.len());
        Ok(id)
    }

    /// Apply the supplied field edits to the medication at `index`.
    ///
    /// Supplied fields are validated as in [`add`](Self::add). Replacing
    /// the schedule list leaves previously recorded reminded/taken
    /// instants in place even when they no longer appear in the list.
    pub async fn edit(&self, index: usize, update: MedicationUpdate) -> Result<(), CareError> {
        if let Some(name) = &update.name {
            validate_text("Name", name)?;
        }
        if let Some(dosage) = &update.dosage {
            validate_text("Dosage", dosage)?;
        }
        if let Some(schedules) = &update.schedules {
            validate_schedules(schedules)?;
        }
        if let Some(instructions) = &update.instructions {
            validate_text("Instructions", instructions)?;
        }

        let mut medications = self.medications.write().await;
        let len = medications.len();
        let medication = medications
            .get_mut(index)
            .ok_or(CareError::IndexOutOfRange { index, len })?;

        if let Some(name) = update.name {
            medication.name = name;
        }
        if let Some(dosage) = update.dosage {
            medication.dosage = dosage;
        }
        if let Some(schedules) = update.schedules {
            medication.schedules = schedules;
        }
        if let Some(instructions) = update.instructions {
            medication.instructions = instructions;
        }
        Ok(())
    }

    /// Remove the medication at `index`, compacting the list, and return
    /// the removed entry.
    pub async fn delete(&self, index: usize) -> Result<Medication, CareError> {
        let mut medications = self.medications.write().await;
        let len = medications.len();
        if index >= len {
            return Err(CareError::IndexOutOfRange { index, len });
        }
        let removed = medications.remove(index);
        debug!(
            "Deleted medication {} ({} remaining)",
            removed.id(),
            medications.len()
        );
        Ok(removed)
    }

    /// Cloned snapshot of the medication at `index`
    pub async fn get(&self, index: usize) -> Result<Medication, CareError> {
        let medications = self.medications.read().await;
        medications
            .get(index)
            .cloned()
            .ok_or(CareError::IndexOutOfRange {
                index,
                len: medications.len(),
            })
    }

    /// Cloned snapshot of the whole inventory, in order
    pub async fn list(&self) -> Vec<Medication> {
        self.medications.read().await.clone()
    }

    /// Mark the schedule at `schedule_index` of the medication at `index`
    /// as administered, returning a snapshot and the instant for record
    /// construction.
    pub async fn mark_taken(
        &self,
        index: usize,
        schedule_index: usize,
    ) -> Result<(Medication, NaiveDateTime), CareError> {
        let mut medications = self.medications.write().await;
        let len = medications.len();
        let medication = medications
            .get_mut(index)
            .ok_or(CareError::IndexOutOfRange { index, len })?;
        if medication.schedules.is_empty() {
            return Err(CareError::NoSchedules);
        }
        let schedule =
            *medication
                .schedules
                .get(schedule_index)
                .ok_or(CareError::IndexOutOfRange {
                    index: schedule_index,
                    len: medication.schedules.len(),
                })?;
        medication.mark_taken(schedule);
        Ok((medication.clone(), schedule))
    }

    /// Mark a schedule instant reminded, by identity.
    ///
    /// Returns `false` when the medication no longer exists, which the
    /// scheduler treats as a concurrent delete and skips.
    pub async fn mark_reminded(&self, id: MedicationId, schedule: NaiveDateTime) -> bool {
        let mut medications = self.medications.write().await;
        match medications.iter_mut().find(|m| m.id() == id) {
            Some(medication) => {
                medication.mark_reminded(schedule);
                true
            }
            None => false,
        }
    }

    /// Whether a medication with this id is still stored
    pub async fn contains(&self, id: MedicationId) -> bool {
        self.medications.read().await.iter().any(|m| m.id() == id)
    }

    pub async fn len(&self) -> usize {
        self.medications.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.medications.read().await.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn validate_text(field: &str, value: &str) -> Result<(), CareError> {
    if value.trim().is_empty() {
        return Err(CareError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn validate_schedules(schedules: &[NaiveDateTime]) -> Result<(), CareError> {
    if schedules.is_empty() {
        return Err(CareError::validation("At least one schedule is required"));
    }
    let now = Local::now().naive_local();
    for &schedule in schedules {
        if schedule <= now {
            return Err(CareError::validation(format!(
                "Schedule cannot be in the past: {}",
                format_schedule(schedule)
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn future(minutes: i64) -> NaiveDateTime {
        Local::now().naive_local() + Duration::minutes(minutes)
    }

    fn new_med(name: &str, schedules: Vec<NaiveDateTime>) -> NewMedication {
        NewMedication {
            name: name.to_string(),
            dosage: "100mg".to_string(),
            schedules,
            instructions: "with food".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_returns_distinct_ids() {
        let store = MedicationStore::new(10);
        let a = store.add(new_med("Aspirin", vec![future(5)])).await.unwrap();
        let b = store
            .add(new_med("Ibuprofen", vec![future(5)]))
            .await
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_add_rejects_empty_name_without_growing_store() {
        let store = MedicationStore::new(10);
        let err = store.add(new_med("  ", vec![future(5)])).await.unwrap_err();
        assert_eq!(err, CareError::validation("Name cannot be empty"));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_add_rejects_past_schedule_without_growing_store() {
        let store = MedicationStore::new(10);
        let err = store
            .add(new_med("Aspirin", vec![future(-5)]))
            .await
            .unwrap_err();
        assert!(matches!(err, CareError::Validation(_)));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_add_rejects_empty_schedule_list() {
        let store = MedicationStore::new(10);
        let err = store.add(new_med("Aspirin", vec![])).await.unwrap_err();
        assert_eq!(
            err,
            CareError::validation("At least one schedule is required")
        );
    }

    #[tokio::test]
    async fn test_add_fails_when_full() {
        let store = MedicationStore::new(2);
        store.add(new_med("A", vec![future(5)])).await.unwrap();
        store.add(new_med("B", vec![future(5)])).await.unwrap();
        let err = store.add(new_med("C", vec![future(5)])).await.unwrap_err();
        assert_eq!(err, CareError::Capacity(2));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_edit_partial_keeps_other_fields() {
        let store = MedicationStore::new(10);
        store.add(new_med("Aspirin", vec![future(5)])).await.unwrap();
        store
            .edit(
                0,
                MedicationUpdate {
                    dosage: Some("200mg".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let med = store.get(0).await.unwrap();
        assert_eq!(med.name, "Aspirin");
        assert_eq!(med.dosage, "200mg");
        assert_eq!(med.instructions, "with food");
    }

    #[tokio::test]
    async fn test_edit_validates_supplied_fields() {
        let store = MedicationStore::new(10);
        store.add(new_med("Aspirin", vec![future(5)])).await.unwrap();
        let err = store
            .edit(
                0,
                MedicationUpdate {
                    name: Some("".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, CareError::validation("Name cannot be empty"));
    }

    #[tokio::test]
    async fn test_edit_out_of_range() {
        let store = MedicationStore::new(10);
        let err = store.edit(3, MedicationUpdate::default()).await.unwrap_err();
        assert_eq!(err, CareError::IndexOutOfRange { index: 3, len: 0 });
    }

    #[tokio::test]
    async fn test_edit_schedule_replacement_keeps_stale_taken_marks() {
        let store = MedicationStore::new(10);
        let original = future(5);
        store.add(new_med("Aspirin", vec![original])).await.unwrap();
        store.mark_taken(0, 0).await.unwrap();

        store
            .edit(
                0,
                MedicationUpdate {
                    schedules: Some(vec![future(10)]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // The orphaned instant stays marked: history preserved, not rewritten
        let med = store.get(0).await.unwrap();
        assert!(med.is_taken(original));
        assert!(!med.schedules.contains(&original));
    }

    #[tokio::test]
    async fn test_delete_compacts_preserving_order() {
        let store = MedicationStore::new(10);
        store.add(new_med("A", vec![future(5)])).await.unwrap();
        store.add(new_med("B", vec![future(5)])).await.unwrap();
        store.add(new_med("C", vec![future(5)])).await.unwrap();

        let removed = store.delete(1).await.unwrap();
        assert_eq!(removed.name, "B");

        let names: Vec<String> = store.list().await.into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn test_delete_out_of_range() {
        let store = MedicationStore::new(10);
        store.add(new_med("A", vec![future(5)])).await.unwrap();
        let err = store.delete(1).await.unwrap_err();
        assert_eq!(err, CareError::IndexOutOfRange { index: 1, len: 1 });
    }

    #[tokio::test]
    async fn test_mark_taken_records_the_instant() {
        let store = MedicationStore::new(10);
        let instant = future(5);
        store.add(new_med("Aspirin", vec![instant])).await.unwrap();

        let (med, taken_at) = store.mark_taken(0, 0).await.unwrap();
        assert_eq!(taken_at, instant);
        assert_eq!(med.name, "Aspirin");
        assert!(store.get(0).await.unwrap().is_taken(instant));
    }

    #[tokio::test]
    async fn test_mark_taken_rejects_bad_schedule_index() {
        let store = MedicationStore::new(10);
        store.add(new_med("Aspirin", vec![future(5)])).await.unwrap();
        let err = store.mark_taken(0, 4).await.unwrap_err();
        assert_eq!(err, CareError::IndexOutOfRange { index: 4, len: 1 });
    }

    #[tokio::test]
    async fn test_mark_reminded_by_id_survives_index_shift() {
        let store = MedicationStore::new(10);
        let instant = future(5);
        store.add(new_med("A", vec![future(5)])).await.unwrap();
        let id_b = store.add(new_med("B", vec![instant])).await.unwrap();

        // Shift B from index 1 to index 0
        store.delete(0).await.unwrap();

        assert!(store.mark_reminded(id_b, instant).await);
        assert!(store.get(0).await.unwrap().is_reminded(instant));
    }

    #[tokio::test]
    async fn test_mark_reminded_reports_deleted_medication() {
        let store = MedicationStore::new(10);
        let instant = future(5);
        let id = store.add(new_med("A", vec![instant])).await.unwrap();
        store.delete(0).await.unwrap();
        assert!(!store.mark_reminded(id, instant).await);
        assert!(!store.contains(id).await);
    }
}
