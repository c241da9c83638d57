//! Collaborator traits for the external calendar service.
//!
//! The core never talks to the network itself. Authentication and the
//! calendar API live behind these traits; the binary crate provides the
//! Google-backed implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::batch::{BatchSink, ItemOutcome};
use crate::error::ReminderResult;
use crate::schedule::ReminderEvent;

/// Access credential produced by an [`Authenticator`].
#[derive(Debug, Clone)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
}

/// Produces a valid calendar credential, running an interactive or refresh
/// flow if needed. May block on user interaction.
#[async_trait]
pub trait Authenticator {
    async fn credential(&self) -> ReminderResult<Credential>;
}

/// One create or delete request against the remote calendar.
#[derive(Debug, Clone)]
pub enum BatchOperation {
    Create(ReminderEvent),
    Delete { event_id: String },
}

/// A listed remote event, reduced to what the deletion filter needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRef {
    pub id: String,
    pub summary: String,
}

/// An authenticated calendar connection.
#[async_trait]
pub trait CalendarGateway {
    /// Submit one batch of operations in a single round trip.
    ///
    /// Returns one outcome per operation. `Err` means the round trip itself
    /// failed; per-operation failures belong in the outcomes.
    async fn submit_batch(
        &self,
        batch: Vec<BatchOperation>,
    ) -> ReminderResult<Vec<ItemOutcome>>;

    /// List events overlapping `[time_min, time_max]` whose text matches
    /// `text_query`, up to `max_results`.
    async fn list_events(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        text_query: &str,
        max_results: usize,
    ) -> ReminderResult<Vec<EventRef>>;
}

// Any gateway reference doubles as a batch sink, so one dispatcher can be
// shared across everything a run produces.
#[async_trait]
impl<'g, G: CalendarGateway + Sync> BatchSink<BatchOperation> for &'g G {
    async fn submit(&mut self, batch: Vec<BatchOperation>) -> ReminderResult<Vec<ItemOutcome>> {
        (**self).submit_batch(batch).await
    }
}
