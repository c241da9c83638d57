//! Frequency-code parsing.
//!
//! A frequency code is a hyphen-joined list of per-slot dose counts, e.g.
//! "1-0-1" or "1-1-1-1". Fractional doses ("0.5") are allowed.
//!
//! Three-part codes conventionally mean morning-afternoon-night and never
//! carry an evening dose. That is a quirk of the data format, not a parse
//! failure, and is preserved here deliberately.

use crate::error::{ReminderError, ReminderResult};
use crate::slot::DoseSlot;

/// Dose amounts for the four daily slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyDoses {
    doses: [f64; 4],
}

impl DailyDoses {
    /// Dose amount for one slot; 0 means no event at that slot.
    pub fn dose(&self, slot: DoseSlot) -> f64 {
        self.doses[slot as usize]
    }

    /// (slot, dose) pairs in canonical slot order.
    pub fn iter(&self) -> impl Iterator<Item = (DoseSlot, f64)> + '_ {
        DoseSlot::ALL.iter().map(|&slot| (slot, self.dose(slot)))
    }

    /// Number of slots with a non-zero dose.
    pub fn dosed_slots(&self) -> usize {
        self.doses.iter().filter(|&&dose| dose > 0.0).count()
    }
}

/// Parse a frequency code into per-slot doses.
///
/// Codes with exactly three tokens map to morning/afternoon/night, leaving
/// evening at 0. Any other token count maps positionally onto the four slots:
/// missing trailing slots default to 0, tokens past the fourth are dropped.
pub fn parse_frequency(code: &str) -> ReminderResult<DailyDoses> {
    let mut values = Vec::new();
    for token in code.split('-') {
        let value: f64 = token
            .trim()
            .parse()
            .map_err(|_| invalid(code, token))?;
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(code, token));
        }
        values.push(value);
    }

    let mut doses = [0.0; 4];
    if values.len() == 3 {
        doses[DoseSlot::Morning as usize] = values[0];
        doses[DoseSlot::Afternoon as usize] = values[1];
        doses[DoseSlot::Night as usize] = values[2];
    } else {
        for (i, value) in values.into_iter().take(4).enumerate() {
            doses[i] = value;
        }
    }

    Ok(DailyDoses { doses })
}

fn invalid(code: &str, token: &str) -> ReminderError {
    ReminderError::InvalidFrequencyFormat {
        code: code.to_string(),
        token: token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_part_code_never_doses_evening() {
        let doses = parse_frequency("1-0.5-2").unwrap();
        assert_eq!(doses.dose(DoseSlot::Morning), 1.0);
        assert_eq!(doses.dose(DoseSlot::Afternoon), 0.5);
        assert_eq!(doses.dose(DoseSlot::Evening), 0.0);
        assert_eq!(doses.dose(DoseSlot::Night), 2.0);

        // Even an all-ones code leaves evening empty.
        let doses = parse_frequency("1-1-1").unwrap();
        assert_eq!(doses.dose(DoseSlot::Evening), 0.0);
        assert_eq!(doses.dosed_slots(), 3);
    }

    #[test]
    fn test_four_part_code_is_positional() {
        let doses = parse_frequency("1-2-3-4").unwrap();
        let decoded: Vec<f64> = doses.iter().map(|(_, dose)| dose).collect();
        assert_eq!(decoded, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_extra_tokens_are_discarded() {
        let doses = parse_frequency("1-2-3-4-5-6").unwrap();
        let decoded: Vec<f64> = doses.iter().map(|(_, dose)| dose).collect();
        assert_eq!(decoded, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_short_code_pads_missing_slots() {
        let doses = parse_frequency("2").unwrap();
        assert_eq!(doses.dose(DoseSlot::Morning), 2.0);
        assert_eq!(doses.dosed_slots(), 1);

        let doses = parse_frequency("1-2").unwrap();
        assert_eq!(doses.dose(DoseSlot::Afternoon), 2.0);
        assert_eq!(doses.dose(DoseSlot::Evening), 0.0);
        assert_eq!(doses.dose(DoseSlot::Night), 0.0);
    }

    #[test]
    fn test_non_numeric_token_is_rejected() {
        let err = parse_frequency("1-x-1").unwrap_err();
        match err {
            ReminderError::InvalidFrequencyFormat { code, token } => {
                assert_eq!(code, "1-x-1");
                assert_eq!(token, "x");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // An empty token (from a double hyphen) is not a number either.
        assert!(parse_frequency("1--1").is_err());
        assert!(parse_frequency("").is_err());
        assert!(parse_frequency("nan-0-0").is_err());
    }

    #[test]
    fn test_iteration_follows_slot_order() {
        let doses = parse_frequency("1-2-3-4").unwrap();
        let slots: Vec<DoseSlot> = doses.iter().map(|(slot, _)| slot).collect();
        assert_eq!(slots, DoseSlot::ALL.to_vec());
    }
}
