//! Care records: immutable history events with variant-specific payloads.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use std::fmt;

use chrono::NaiveDateTime;

use crate::features::medications::{Medication, MedicationId};

/// Record timestamps are shown in this format
pub const RECORD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Snapshot reference to the medication an intake concerns.
///
/// Owns the display text so the record stays readable after the
/// medication itself is deleted; the id keeps the relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicationRef {
    pub id: MedicationId,
    pub name: String,
    pub dosage: String,
}

impl From<&Medication> for MedicationRef {
    fn from(medication: &Medication) -> Self {
        MedicationRef {
            id: medication.id(),
            name: medication.name.clone(),
            dosage: medication.dosage.clone(),
        }
    }
}

/// Variant tag, for filtered history views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Reminder,
    Intake,
    Feedback,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Reminder => "reminder",
            RecordKind::Intake => "intake",
            RecordKind::Feedback => "feedback",
        }
    }
}

/// One historical care event, immutable once constructed
#[derive(Debug, Clone)]
pub enum Record {
    /// A reminder fired by the scheduler, or an inventory audit entry
    Reminder {
        timestamp: NaiveDateTime,
        description: String,
    },
    /// A dose administered against a schedule instant
    Intake {
        timestamp: NaiveDateTime,
        description: String,
        medication: MedicationRef,
    },
    /// Patient wellness feedback
    Feedback {
        timestamp: NaiveDateTime,
        description: String,
        feedback: String,
    },
}

impl Record {
    pub fn reminder(timestamp: NaiveDateTime, description: impl Into<String>) -> Self {
        Record::Reminder {
            timestamp,
            description: description.into(),
        }
    }

    pub fn intake(
        timestamp: NaiveDateTime,
        description: impl Into<String>,
        medication: MedicationRef,
    ) -> Self {
        Record::Intake {
            timestamp,
            description: description.into(),
            medication,
        }
    }

    pub fn feedback(
        timestamp: NaiveDateTime,
        description: impl Into<String>,
        feedback: impl Into<String>,
    ) -> Self {
        Record::Feedback {
            timestamp,
            description: description.into(),
            feedback: feedback.into(),
        }
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            Record::Reminder { timestamp, .. }
            | Record::Intake { timestamp, .. }
            | Record::Feedback { timestamp, .. } => *timestamp,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Record::Reminder { description, .. }
            | Record::Intake { description, .. }
            | Record::Feedback { description, .. } => description,
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Reminder { .. } => RecordKind::Reminder,
            Record::Intake { .. } => RecordKind::Intake,
            Record::Feedback { .. } => RecordKind::Feedback,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let when = self.timestamp().format(RECORD_TIME_FORMAT);
        match self {
            Record::Reminder { description, .. } => {
                write!(f, "{when} - Reminder: {description}")
            }
            Record::Intake {
                description,
                medication,
                ..
            } => write!(
                f,
                "{when} - Medication Taken: {} ({}) {description}",
                medication.name, medication.dosage
            ),
            Record::Feedback {
                description,
                feedback,
                ..
            } => write!(f, "{when} - Feedback: {feedback} (notes: {description})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 1)
            .unwrap()
            .and_hms_opt(8, 30, 15)
            .unwrap()
    }

    fn aspirin_ref() -> MedicationRef {
        MedicationRef {
            id: MedicationId(1),
            name: "Aspirin".to_string(),
            dosage: "100mg".to_string(),
        }
    }

    #[test]
    fn test_reminder_display() {
        let record = Record::reminder(ts(), "Medication reminder for Aspirin at 2026-10-01 08:00");
        assert_eq!(
            record.to_string(),
            "2026-10-01 08:30:15 - Reminder: Medication reminder for Aspirin at 2026-10-01 08:00"
        );
    }

    #[test]
    fn test_intake_display() {
        let record = Record::intake(ts(), "Taken at 2026-10-01 08:00", aspirin_ref());
        assert_eq!(
            record.to_string(),
            "2026-10-01 08:30:15 - Medication Taken: Aspirin (100mg) Taken at 2026-10-01 08:00"
        );
    }

    #[test]
    fn test_feedback_display() {
        let record = Record::feedback(ts(), "Patient wellness feedback", "Feeling: fine");
        assert_eq!(
            record.to_string(),
            "2026-10-01 08:30:15 - Feedback: Feeling: fine (notes: Patient wellness feedback)"
        );
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(Record::reminder(ts(), "x").kind(), RecordKind::Reminder);
        assert_eq!(
            Record::intake(ts(), "x", aspirin_ref()).kind(),
            RecordKind::Intake
        );
        assert_eq!(
            Record::feedback(ts(), "x", "y").kind(),
            RecordKind::Feedback
        );
        assert_eq!(RecordKind::Intake.as_str(), "intake");
    }

    #[test]
    fn test_intake_ref_outlives_medication_text() {
        // The ref is an owned snapshot; nothing here borrows a Medication
        let record = Record::intake(ts(), "Taken at 2026-10-01 08:00", aspirin_ref());
        assert_eq!(record.description(), "Taken at 2026-10-01 08:00");
        assert_eq!(record.timestamp(), ts());
    }
}
