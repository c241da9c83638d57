//! ReminderEvent -> Google Calendar event payloads.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use dosecal_core::schedule::ReminderEvent;
use dosecal_core::slot::CALENDAR_TZ;
use google_calendar::types::{Event, EventDateTime, EventReminder, Reminders};

pub fn to_google_event(event: &ReminderEvent) -> Event {
    Event {
        summary: event.title.clone(),
        description: event.description.clone(),
        start: Some(to_google_time(&event.start)),
        end: Some(to_google_time(&event.end)),
        // Fixed popup lead instead of the calendar's default reminders
        reminders: Some(Reminders {
            use_default: false,
            overrides: vec![EventReminder {
                method: "popup".to_string(),
                minutes: event.reminder_lead_minutes,
            }],
        }),
        ..Default::default()
    }
}

fn to_google_time(time: &DateTime<Tz>) -> EventDateTime {
    EventDateTime {
        date: None,
        date_time: Some(time.with_timezone(&Utc)),
        time_zone: CALENDAR_TZ.name().to_string(),
    }
}
