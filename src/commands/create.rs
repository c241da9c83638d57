use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use dosecal_core::gateway::Authenticator;
use dosecal_core::medication::MedicationRecord;
use dosecal_core::service::ReminderService;
use dosecal_core::slot::CALENDAR_TZ;

use crate::config;
use crate::google::gateway::GoogleGateway;
use crate::google::session::GoogleAuth;

pub async fn run(file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let records: Vec<MedicationRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse medication records from {}", file.display()))?;

    if records.is_empty() {
        println!("No medication records in {}.", file.display());
        return Ok(());
    }

    let creds = config::load()?;
    let credential = GoogleAuth.credential().await?;
    let gateway = GoogleGateway::connect(&creds, credential);

    let today = Utc::now().with_timezone(&CALENDAR_TZ).date_naive();
    let summary = ReminderService::new(&gateway)
        .create_reminders(&records, today)
        .await?;

    println!(
        "Created {} reminder events in {} batches.",
        summary.succeeded(),
        summary.batches
    );
    for rejected in &summary.rejected {
        println!("  Skipped {}: {}", rejected.medicine, rejected.error);
    }
    for failure in &summary.failures {
        println!(
            "  Failed {}: {}",
            failure.id,
            failure.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(())
}
