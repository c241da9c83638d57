//! Orchestration of creation and deletion runs.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::batch::{BatchDispatcher, ItemOutcome};
use crate::error::{ReminderError, ReminderResult};
use crate::gateway::{BatchOperation, CalendarGateway};
use crate::medication::MedicationRecord;
use crate::schedule::{self, TITLE_PREFIX};
use crate::slot::CALENDAR_TZ;

/// Deletion considers events from this many days back...
const DELETE_LOOKBACK_DAYS: i64 = 1;
/// ...to this many days ahead of "now".
const DELETE_LOOKAHEAD_DAYS: i64 = 30;

/// Server-side text filter for the deletion query. Coarser than the real
/// title prefix; a client-side prefix check narrows the matches afterwards.
const DELETE_QUERY: &str = "Take";

/// Cap on how many events one deletion run will consider.
const DELETE_MAX_RESULTS: usize = 2500;

/// A record that could not be expanded; reported, never silently dropped.
#[derive(Debug)]
pub struct RejectedRecord {
    pub medicine: String,
    pub error: ReminderError,
}

/// What a creation or deletion run did.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Operations handed to the dispatcher.
    pub attempted: usize,
    /// Round trips made.
    pub batches: usize,
    /// Individual operations the service reported as failed.
    pub failures: Vec<ItemOutcome>,
    /// Records skipped because their frequency or duration did not parse.
    pub rejected: Vec<RejectedRecord>,
}

impl RunSummary {
    /// Operations that went through.
    pub fn succeeded(&self) -> usize {
        self.attempted - self.failures.len()
    }
}

/// Drives schedule expansion and the deletion pipeline through one shared
/// dispatcher per run.
pub struct ReminderService<'a, G> {
    gateway: &'a G,
    tz: Tz,
}

impl<'a, G: CalendarGateway + Sync> ReminderService<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        ReminderService {
            gateway,
            tz: CALENDAR_TZ,
        }
    }

    /// Create reminder events for every record, anchored at `anchor`.
    ///
    /// One dispatcher is shared across all records, so trailing events of one
    /// medication and leading events of the next fill the same batch.
    /// Re-running with identical input creates duplicate events; nothing here
    /// deduplicates.
    pub async fn create_reminders(
        &self,
        records: &[MedicationRecord],
        anchor: NaiveDate,
    ) -> ReminderResult<RunSummary> {
        let mut dispatcher: BatchDispatcher<BatchOperation, _> =
            BatchDispatcher::new(self.gateway);
        let mut summary = RunSummary::default();

        for record in records {
            // Parse failures surface here, before any network call for this
            // record, and skip only this record.
            let events = match schedule::expand(record, anchor, self.tz) {
                Ok(events) => events,
                Err(error) => {
                    tracing::warn!(
                        medicine = %record.medicine,
                        %error,
                        "Skipping record that does not parse"
                    );
                    summary.rejected.push(RejectedRecord {
                        medicine: record.medicine.clone(),
                        error,
                    });
                    continue;
                }
            };

            for event in events {
                dispatcher.add(BatchOperation::Create(event)).await?;
                summary.attempted += 1;
            }
        }

        dispatcher.flush().await?;

        summary.batches = dispatcher.batches_submitted();
        summary.failures = dispatcher.into_failures();
        tracing::info!(
            attempted = summary.attempted,
            batches = summary.batches,
            failed = summary.failures.len(),
            skipped = summary.rejected.len(),
            "Creation run finished"
        );
        Ok(summary)
    }

    /// Delete every reminder event in the deletion window.
    ///
    /// The server-side text query is only a coarse match; a surviving event
    /// must also carry the full reminder title prefix, so e.g. a "Takedown
    /// notice" event the text query catches is left alone.
    pub async fn clear_reminders(&self, now: DateTime<Utc>) -> ReminderResult<RunSummary> {
        let time_min = now - Duration::days(DELETE_LOOKBACK_DAYS);
        let time_max = now + Duration::days(DELETE_LOOKAHEAD_DAYS);

        let events = self
            .gateway
            .list_events(time_min, time_max, DELETE_QUERY, DELETE_MAX_RESULTS)
            .await?;

        if events.is_empty() {
            tracing::info!("No reminder events found");
            return Ok(RunSummary::default());
        }

        let mut dispatcher: BatchDispatcher<BatchOperation, _> =
            BatchDispatcher::new(self.gateway);
        let mut summary = RunSummary::default();

        for event in events {
            if event.summary.starts_with(TITLE_PREFIX) {
                dispatcher
                    .add(BatchOperation::Delete { event_id: event.id })
                    .await?;
                summary.attempted += 1;
            }
        }

        dispatcher.flush().await?;

        summary.batches = dispatcher.batches_submitted();
        summary.failures = dispatcher.into_failures();
        tracing::info!(
            attempted = summary.attempted,
            batches = summary.batches,
            failed = summary.failures.len(),
            "Deletion run finished"
        );
        Ok(summary)
    }
}
