//! Interactive MediCare menu.
//!
//! Drives the care manager from a terminal while the reminder scheduler
//! ticks in the background; fired reminders print between prompts.

use anyhow::Result;
use dialoguer::{Input, Select};
use dotenvy::dotenv;
use log::info;

use medicare::care_manager::CareManager;
use medicare::core::Config;
use medicare::features::history::HistoryLog;
use medicare::features::medications::{format_schedule, Medication, MedicationStore};
use medicare::features::reminders::{ReminderNotifier, ReminderScheduler};

const MENU_ITEMS: &[&str] = &[
    "Add Medication",
    "Edit Medication",
    "Delete Medication",
    "View Medication List",
    "View Reminders",
    "Log Intake",
    "View History",
    "Add Wellness Feedback",
    "Exit",
];

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting MediCare...");

    let store = MedicationStore::new(config.capacity_med);
    let history = HistoryLog::new(config.capacity_record);
    let (notifier, mut notices) = ReminderNotifier::channel();

    // Print fired reminders as they arrive
    tokio::spawn(async move {
        while let Some(notice) = notices.recv().await {
            println!("\n🔔 Reminder: {notice}");
        }
    });

    let scheduler = ReminderScheduler::new(
        store.clone(),
        history.clone(),
        notifier,
        config.tick_interval,
    )
    .spawn();

    let care = CareManager::new(store, history);

    loop {
        match menu_choice().await? {
            0 => add_medication(&care).await?,
            1 => edit_medication(&care).await?,
            2 => delete_medication(&care).await?,
            3 => view_medications(&care).await,
            4 => view_reminders(&care).await,
            5 => log_intake(&care).await?,
            6 => view_history(&care).await,
            7 => add_feedback(&care).await?,
            _ => break,
        }
    }

    scheduler.shutdown().await;
    println!("Exiting MediCare. Stay healthy!");
    Ok(())
}

async fn menu_choice() -> Result<usize> {
    tokio::task::spawn_blocking(|| {
        Select::new()
            .with_prompt("MediCare main menu")
            .items(MENU_ITEMS)
            .default(0)
            .interact()
    })
    .await?
    .map_err(Into::into)
}

/// Prompt for one line of input on the blocking pool, so the scheduler
/// keeps ticking while the user types.
async fn prompt(label: &str, allow_empty: bool) -> Result<String> {
    let label = label.to_string();
    tokio::task::spawn_blocking(move || {
        Input::<String>::new()
            .with_prompt(label)
            .allow_empty(allow_empty)
            .interact_text()
    })
    .await?
    .map_err(Into::into)
}

/// Show the list and ask for a 1-based position; `None` when the list is
/// empty or the input is not a usable number.
async fn pick_medication(care: &CareManager, action: &str) -> Result<Option<usize>> {
    let medications = care.medications().await;
    if medications.is_empty() {
        println!("No medications stored.");
        return Ok(None);
    }
    print_medication_list(&medications);
    let raw = prompt(
        &format!("Enter medication index to {action} (starting at 1)"),
        false,
    )
    .await?;
    match raw.trim().parse::<usize>() {
        Ok(n) if (1..=medications.len()).contains(&n) => Ok(Some(n - 1)),
        _ => {
            println!("Invalid index.");
            Ok(None)
        }
    }
}

fn print_medication_list(medications: &[Medication]) {
    println!("-----Medication List-----");
    for (i, medication) in medications.iter().enumerate() {
        println!("{}) {medication}", i + 1);
    }
}

fn blank_to_none(value: String) -> Option<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

async fn add_medication(care: &CareManager) -> Result<()> {
    let name = prompt("Medication name", false).await?;
    let dosage = prompt("Dosage (e.g. 500mg or 1 tablet)", false).await?;
    let schedules = prompt(
        "Schedules (comma-separated, e.g. 2026-10-01 08:00, 2026-10-01 14:00)",
        false,
    )
    .await?;
    let instructions = prompt("Instructions", false).await?;

    match care
        .add_medication(name.trim(), dosage.trim(), &schedules, instructions.trim())
        .await
    {
        Ok(_) => println!("Medication added successfully."),
        Err(e) => println!("[ERROR] {e}"),
    }
    Ok(())
}

async fn edit_medication(care: &CareManager) -> Result<()> {
    let Some(index) = pick_medication(care, "edit").await? else {
        return Ok(());
    };
    println!("Editing: {}", care.medication(index).await?.name);

    let name = blank_to_none(prompt("New name (leave blank to keep)", true).await?);
    let dosage = blank_to_none(prompt("New dosage (leave blank to keep)", true).await?);
    let schedules = blank_to_none(
        prompt("New schedules (comma-separated, leave blank to keep)", true).await?,
    );
    let instructions = blank_to_none(prompt("New instructions (leave blank to keep)", true).await?);

    match care
        .edit_medication(
            index,
            name.as_deref(),
            dosage.as_deref(),
            schedules.as_deref(),
            instructions.as_deref(),
        )
        .await
    {
        Ok(()) => println!("Medication has been updated."),
        Err(e) => println!("[ERROR] {e}"),
    }
    Ok(())
}

async fn delete_medication(care: &CareManager) -> Result<()> {
    let Some(index) = pick_medication(care, "delete").await? else {
        return Ok(());
    };
    match care.delete_medication(index).await {
        Ok(name) => println!("Medication has been deleted: {name}"),
        Err(e) => println!("[ERROR] {e}"),
    }
    Ok(())
}

async fn view_medications(care: &CareManager) {
    let medications = care.medications().await;
    if medications.is_empty() {
        println!("-----Medication List-----");
        println!("No medications stored.");
        return;
    }
    print_medication_list(&medications);
}

async fn view_reminders(care: &CareManager) {
    println!("-----Reminders-----");
    let upcoming = care.upcoming_reminders().await;
    if upcoming.is_empty() {
        println!("No upcoming reminders.");
        return;
    }
    for (i, doses) in upcoming.iter().enumerate() {
        let schedules = doses
            .schedules
            .iter()
            .map(|s| format_schedule(*s))
            .collect::<Vec<_>>()
            .join(", ");
        println!("{}) Take {} - {}", i + 1, doses.name, doses.dosage);
        println!("   Upcoming Schedules: {schedules}");
        println!("   Instructions: {}", doses.instructions);
    }
}

async fn log_intake(care: &CareManager) -> Result<()> {
    let Some(index) = pick_medication(care, "log").await? else {
        return Ok(());
    };
    let medication = care.medication(index).await?;
    if medication.schedules.is_empty() {
        println!("No schedules for this medication.");
        return Ok(());
    }

    println!("Select the schedule you took it for:");
    for (i, schedule) in medication.schedules.iter().enumerate() {
        println!("{}) {}", i + 1, format_schedule(*schedule));
    }
    let raw = prompt("Enter schedule index (starting at 1)", false).await?;
    let Some(schedule_index) = raw
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=medication.schedules.len()).contains(n))
        .map(|n| n - 1)
    else {
        println!("Invalid schedule index.");
        return Ok(());
    };

    let note = prompt("Additional note for medication intake", true).await?;
    match care
        .log_intake(index, schedule_index, blank_to_none(note).as_deref())
        .await
    {
        Ok(()) => println!(
            "Medication intake logged for {} at {}",
            medication.name,
            format_schedule(medication.schedules[schedule_index])
        ),
        Err(e) => println!("[ERROR] {e}"),
    }
    Ok(())
}

async fn view_history(care: &CareManager) {
    println!("\n-- Medication History / Records --");
    let records = care.history().await;
    if records.is_empty() {
        println!("No records available.");
        return;
    }
    for (i, record) in records.iter().enumerate() {
        println!("{}) {record}", i + 1);
    }
}

async fn add_feedback(care: &CareManager) -> Result<()> {
    println!("\n-- Wellness Feedback History --");
    let previous = care.feedback_history().await;
    if previous.is_empty() {
        println!("No feedback records available.");
    } else {
        for (i, record) in previous.iter().enumerate() {
            println!("{}) {record}", i + 1);
        }
    }

    let feeling = prompt("How are you feeling after taking the medication? (brief)", true).await?;
    let symptoms = prompt("Any symptoms or side effects? (brief)", true).await?;
    care.add_feedback(&feeling, &symptoms).await;
    println!("Feedback recorded. Thank you for reporting your wellness.");
    Ok(())
}
