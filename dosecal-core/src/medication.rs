//! Medication schedule input records.

use serde::{Deserialize, Serialize};

use crate::error::{ReminderError, ReminderResult};

/// One row of the medication schedule, as supplied by the caller.
///
/// Field names match the JSON input format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationRecord {
    pub medicine: String,
    /// Dose-frequency code, e.g. "1-0-1". See [`crate::frequency`].
    pub frequency: String,
    /// Duration text, expected shape "<n> days".
    pub duration: String,
    #[serde(default)]
    pub special_instructions: String,
}

impl MedicationRecord {
    /// Number of days the schedule runs. Only the leading token of the
    /// duration text is read.
    pub fn duration_days(&self) -> ReminderResult<u32> {
        let leading = self.duration.split_whitespace().next().unwrap_or("");
        match leading.parse::<u32>() {
            Ok(days) if days > 0 => Ok(days),
            _ => Err(ReminderError::InvalidDurationFormat(self.duration.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(duration: &str) -> MedicationRecord {
        MedicationRecord {
            medicine: "Aspirin".to_string(),
            frequency: "1-0-1".to_string(),
            duration: duration.to_string(),
            special_instructions: String::new(),
        }
    }

    #[test]
    fn test_duration_days() {
        assert_eq!(record("5 days").duration_days().unwrap(), 5);
        assert_eq!(record("14 days").duration_days().unwrap(), 14);
    }

    #[test]
    fn test_duration_must_lead_with_positive_integer() {
        for bad in ["five days", "0 days", "-3 days", "2.5 days", "", "days 5"] {
            let err = record(bad).duration_days().unwrap_err();
            assert!(matches!(err, ReminderError::InvalidDurationFormat(_)));
        }
    }
}
