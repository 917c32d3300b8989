//! Medication entity and the schedule text format shared by the crate.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Stable MedicationId so scheduler write-backs survive index shifts
//! - 1.0.0: Initial release

use std::collections::HashSet;
use std::fmt;

use chrono::{Local, NaiveDateTime};

use crate::core::CareError;

/// Schedule instants are entered and shown in this format
pub const SCHEDULE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Stable identity for a medication, assigned by the store.
///
/// List positions are ephemeral (they shift on delete); the id is what the
/// scheduler uses to write reminder state back safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MedicationId(pub(crate) u64);

impl fmt::Display for MedicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A medication with its dosing schedule and administration state.
///
/// The reminded/taken sets record which schedule instants have already
/// fired a reminder or been administered. Replacing `schedules` leaves
/// stale members of those sets in place: history is preserved, not
/// rewritten, when a schedule changes.
#[derive(Debug, Clone)]
pub struct Medication {
    id: MedicationId,
    pub name: String,
    pub dosage: String,
    /// Dose instants, ordered as entered
    pub schedules: Vec<NaiveDateTime>,
    pub instructions: String,
    reminded: HashSet<NaiveDateTime>,
    taken: HashSet<NaiveDateTime>,
}

impl Medication {
    pub(crate) fn new(
        id: MedicationId,
        name: String,
        dosage: String,
        schedules: Vec<NaiveDateTime>,
        instructions: String,
    ) -> Self {
        Medication {
            id,
            name,
            dosage,
            schedules,
            instructions,
            reminded: HashSet::new(),
            taken: HashSet::new(),
        }
    }

    pub fn id(&self) -> MedicationId {
        self.id
    }

    /// Whether a reminder has already fired for this instant
    pub fn is_reminded(&self, schedule: NaiveDateTime) -> bool {
        self.reminded.contains(&schedule)
    }

    /// Whether this instant has been marked administered
    pub fn is_taken(&self, schedule: NaiveDateTime) -> bool {
        self.taken.contains(&schedule)
    }

    pub(crate) fn mark_reminded(&mut self, schedule: NaiveDateTime) {
        self.reminded.insert(schedule);
    }

    pub(crate) fn mark_taken(&mut self, schedule: NaiveDateTime) {
        self.taken.insert(schedule);
    }

    /// Schedule instants not yet marked administered, in list order
    pub fn untaken_schedules(&self) -> Vec<NaiveDateTime> {
        self.schedules
            .iter()
            .copied()
            .filter(|s| !self.taken.contains(s))
            .collect()
    }

    /// Comma-separated schedule list for display
    pub fn schedules_display(&self) -> String {
        self.schedules
            .iter()
            .map(|s| format_schedule(*s))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Medication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {} | Dosage: {} | Schedules: {} | Instructions: {}",
            self.name,
            self.dosage,
            self.schedules_display(),
            self.instructions
        )
    }
}

/// Render a schedule instant in the shared text format
pub fn format_schedule(schedule: NaiveDateTime) -> String {
    schedule.format(SCHEDULE_FORMAT).to_string()
}

/// Parse a comma-separated list of schedule instants.
///
/// All-or-nothing: any token that fails to parse, or that is not strictly
/// in the future, rejects the whole batch. Duplicate instants collapse to
/// their first occurrence.
pub fn parse_schedule_list(input: &str) -> Result<Vec<NaiveDateTime>, CareError> {
    parse_schedule_list_at(input, Local::now().naive_local())
}

fn parse_schedule_list_at(
    input: &str,
    now: NaiveDateTime,
) -> Result<Vec<NaiveDateTime>, CareError> {
    let mut schedules = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        let schedule = NaiveDateTime::parse_from_str(token, SCHEDULE_FORMAT)
            .map_err(|_| CareError::validation(format!("Invalid schedule format: {token}")))?;
        if schedule <= now {
            return Err(CareError::validation(format!(
                "Schedule cannot be in the past: {token}"
            )));
        }
        if !schedules.contains(&schedule) {
            schedules.push(schedule);
        }
    }
    Ok(schedules)
}
