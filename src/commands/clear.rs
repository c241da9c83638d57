use anyhow::Result;
use chrono::Utc;
use dosecal_core::gateway::Authenticator;
use dosecal_core::service::ReminderService;

use crate::config;
use crate::google::gateway::GoogleGateway;
use crate::google::session::GoogleAuth;

pub async fn run() -> Result<()> {
    let creds = config::load()?;
    let credential = GoogleAuth.credential().await?;
    let gateway = GoogleGateway::connect(&creds, credential);

    let summary = ReminderService::new(&gateway)
        .clear_reminders(Utc::now())
        .await?;

    if summary.attempted == 0 {
        println!("No reminder events found.");
        return Ok(());
    }

    println!(
        "Deleted {} reminder events in {} batches.",
        summary.succeeded(),
        summary.batches
    );
    for failure in &summary.failures {
        println!(
            "  Failed {}: {}",
            failure.id,
            failure.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(())
}
