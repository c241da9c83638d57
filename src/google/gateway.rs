//! `CalendarGateway` implementation over the Google Calendar API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dosecal_core::batch::ItemOutcome;
use dosecal_core::error::{ReminderError, ReminderResult};
use dosecal_core::gateway::{BatchOperation, CalendarGateway, Credential, EventRef};
use dosecal_core::schedule::ReminderEvent;
use google_calendar::Client;
use google_calendar::types::{OrderBy, SendUpdates};

use crate::config::Credentials;
use crate::google::convert::to_google_event;

pub struct GoogleGateway {
    client: Client,
    calendar_id: String,
}

impl GoogleGateway {
    pub fn connect(creds: &Credentials, credential: Credential) -> Self {
        let client = Client::new(
            creds.client_id.clone(),
            creds.client_secret.clone(),
            String::new(),
            credential.access_token,
            credential.refresh_token,
        );
        GoogleGateway {
            client,
            calendar_id: creds.calendar_id.clone(),
        }
    }

    async fn create(&self, event: &ReminderEvent) -> Result<String, String> {
        let google_event = to_google_event(event);

        match self
            .client
            .events()
            .insert(
                &self.calendar_id,
                0,
                0,
                false,
                SendUpdates::None,
                false,
                &google_event,
            )
            .await
        {
            Ok(response) => Ok(response.body.id),
            Err(e) => Err(e.to_string()),
        }
    }

    async fn delete(&self, event_id: &str) -> Result<(), String> {
        let result = self
            .client
            .events()
            .delete(&self.calendar_id, event_id, false, SendUpdates::None)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let error = e.to_string();
                // Already gone counts as deleted
                if error.contains("410") || error.contains("Gone") {
                    Ok(())
                } else {
                    Err(error)
                }
            }
        }
    }
}

fn is_auth_error(error: &str) -> bool {
    error.contains("401") || error.contains("403") || error.contains("Unauthorized")
}

#[async_trait]
impl CalendarGateway for GoogleGateway {
    /// The client crate exposes no multi-operation batch endpoint, so a batch
    /// is issued as one request per operation over the same connection.
    /// Individual failures land in the outcomes; a revoked credential fails
    /// the whole round trip, since every remaining operation would fail the
    /// same way.
    async fn submit_batch(
        &self,
        batch: Vec<BatchOperation>,
    ) -> ReminderResult<Vec<ItemOutcome>> {
        let mut outcomes = Vec::with_capacity(batch.len());

        for operation in &batch {
            let (key, result) = match operation {
                BatchOperation::Create(event) => match self.create(event).await {
                    Ok(id) => (id, Ok(())),
                    Err(error) => (event.title.clone(), Err(error)),
                },
                BatchOperation::Delete { event_id } => {
                    (event_id.clone(), self.delete(event_id).await)
                }
            };

            match result {
                Ok(()) => outcomes.push(ItemOutcome::ok(key)),
                Err(error) if is_auth_error(&error) => {
                    return Err(ReminderError::BatchTransport(error));
                }
                Err(error) => outcomes.push(ItemOutcome::failed(key, error)),
            }
        }

        Ok(outcomes)
    }

    async fn list_events(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        text_query: &str,
        max_results: usize,
    ) -> ReminderResult<Vec<EventRef>> {
        let response = self
            .client
            .events()
            .list_all(
                &self.calendar_id,
                "",                 // i_cal_uid
                0,                  // max_attendees
                OrderBy::default(), // order_by
                &[],                // private_extended_property
                text_query,         // q
                &[],                // shared_extended_property
                false,              // show_deleted
                false,              // show_hidden_invitations
                true,               // single_events
                &time_max.to_rfc3339(),
                &time_min.to_rfc3339(),
                "",                 // time_zone
                "",                 // updated_min
            )
            .await
            .map_err(|e| ReminderError::Gateway(e.to_string()))?;

        Ok(response
            .body
            .into_iter()
            .filter(|e| !e.id.is_empty() && e.status != "cancelled")
            .take(max_results)
            .map(|e| EventRef {
                id: e.id,
                summary: e.summary,
            })
            .collect())
    }
}
