//! Expansion of a medication record into dated reminder events.

use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use chrono_tz::Tz;

use crate::error::ReminderResult;
use crate::frequency;
use crate::medication::MedicationRecord;
use crate::slot::DoseSlot;

/// Every reminder title starts with this. The deletion path keys on it, so
/// it must never appear on events dosecal did not create.
pub const TITLE_PREFIX: &str = "Take ";

/// How long each reminder event blocks on the calendar.
pub const EVENT_MINUTES: i64 = 15;

/// Popup notification lead, minutes before the event start.
pub const REMINDER_LEAD_MINUTES: i64 = 15;

/// One dose occurrence, ready to be created on the calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderEvent {
    pub title: String,
    pub description: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub reminder_lead_minutes: i64,
}

/// Expand a record into its reminder events, starting at `anchor`.
///
/// Lazy and restartable: call again for a fresh pass. Day offsets iterate
/// outer, slots inner, and only slots with a non-zero dose emit an event,
/// so the total count is duration days x dosed slots. Both the duration and
/// the frequency code are parsed up front, before anything is emitted.
pub fn expand(
    record: &MedicationRecord,
    anchor: NaiveDate,
    tz: Tz,
) -> ReminderResult<impl Iterator<Item = ReminderEvent> + '_> {
    let days = record.duration_days()?;
    let doses = frequency::parse_frequency(&record.frequency)?;

    Ok((0..i64::from(days)).flat_map(move |offset| {
        let date = anchor + Duration::days(offset);
        let doses = doses.clone();
        DoseSlot::ALL.into_iter().filter_map(move |slot| {
            let dose = doses.dose(slot);
            (dose > 0.0).then(|| build_event(record, date, slot, dose, tz))
        })
    }))
}

fn build_event(
    record: &MedicationRecord,
    date: NaiveDate,
    slot: DoseSlot,
    dose: f64,
    tz: Tz,
) -> ReminderEvent {
    // Slot times never touch the 02:00 DST transition window.
    let start = tz
        .from_local_datetime(&date.and_time(slot.time()))
        .earliest()
        .expect("slot time fell in a DST gap");

    ReminderEvent {
        title: format!("{}{}", TITLE_PREFIX, record.medicine),
        description: format!(
            "Take {} of {}. {}",
            dose_text(dose),
            record.medicine,
            record.special_instructions
        ),
        start,
        end: start + Duration::minutes(EVENT_MINUTES),
        reminder_lead_minutes: REMINDER_LEAD_MINUTES,
    }
}

/// Human-readable dose amount. Anything other than the two special cases is
/// rendered with the numeric value as given.
fn dose_text(dose: f64) -> String {
    if dose == 0.5 {
        "half a tablet".to_string()
    } else if dose == 1.0 {
        "1 tablet".to_string()
    } else {
        format!("{} tablets", dose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReminderError;
    use crate::slot::CALENDAR_TZ;
    use chrono::{Datelike, Timelike};

    fn record(frequency: &str, duration: &str) -> MedicationRecord {
        MedicationRecord {
            medicine: "Aspirin".to_string(),
            frequency: frequency.to_string(),
            duration: duration.to_string(),
            special_instructions: "After food".to_string(),
        }
    }

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_event_count_is_days_times_dosed_slots() {
        let record = record("1-0-1", "5 days");
        let events: Vec<_> = expand(&record, anchor(), CALENDAR_TZ).unwrap().collect();

        // 2 dosed slots (morning, night) x 5 days.
        assert_eq!(events.len(), 10);
        assert!(events.iter().all(|e| e.start.hour() == 8 || e.start.hour() == 22));
    }

    #[test]
    fn test_days_iterate_outer_slots_inner() {
        let record = record("1-0-1", "2 days");
        let events: Vec<_> = expand(&record, anchor(), CALENDAR_TZ).unwrap().collect();

        let ordering: Vec<(u32, u32)> = events
            .iter()
            .map(|e| (e.start.date_naive().day(), e.start.hour()))
            .collect();
        assert_eq!(ordering, vec![(10, 8), (10, 22), (11, 8), (11, 22)]);
    }

    #[test]
    fn test_event_shape() {
        let record = record("1-0-0", "1 days");
        let event = expand(&record, anchor(), CALENDAR_TZ)
            .unwrap()
            .next()
            .unwrap();

        assert_eq!(event.title, "Take Aspirin");
        assert!(event.title.starts_with(TITLE_PREFIX));
        assert_eq!(event.description, "Take 1 tablet of Aspirin. After food");
        assert_eq!(event.end - event.start, Duration::minutes(15));
        assert_eq!(event.reminder_lead_minutes, 15);
        assert_eq!(event.start.hour(), 8);
        assert_eq!(event.start.minute(), 0);
        assert_eq!(event.start.date_naive(), anchor());
    }

    #[test]
    fn test_dose_text_rendering() {
        let record = record("0.5-1-2", "1 days");
        let descriptions: Vec<String> = expand(&record, anchor(), CALENDAR_TZ)
            .unwrap()
            .map(|e| e.description)
            .collect();

        assert_eq!(
            descriptions,
            vec![
                "Take half a tablet of Aspirin. After food",
                "Take 1 tablet of Aspirin. After food",
                "Take 2 tablets of Aspirin. After food",
            ]
        );
    }

    #[test]
    fn test_fractional_dose_rendered_as_given() {
        assert_eq!(dose_text(1.5), "1.5 tablets");
        assert_eq!(dose_text(0.5), "half a tablet");
        assert_eq!(dose_text(1.0), "1 tablet");
    }

    #[test]
    fn test_expansion_is_restartable() {
        let record = record("1-1-1-1", "3 days");
        let first: Vec<_> = expand(&record, anchor(), CALENDAR_TZ).unwrap().collect();
        let second: Vec<_> = expand(&record, anchor(), CALENDAR_TZ).unwrap().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 12);
    }

    #[test]
    fn test_bad_duration_fails_before_any_event() {
        let record = record("1-0-1", "soon");
        let err = expand(&record, anchor(), CALENDAR_TZ).map(|_| ()).unwrap_err();
        assert!(matches!(err, ReminderError::InvalidDurationFormat(_)));
    }

    #[test]
    fn test_bad_frequency_fails_before_any_event() {
        let record = record("1-x-1", "5 days");
        let err = expand(&record, anchor(), CALENDAR_TZ).map(|_| ()).unwrap_err();
        assert!(matches!(err, ReminderError::InvalidFrequencyFormat { .. }));
    }
}
