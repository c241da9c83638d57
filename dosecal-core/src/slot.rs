//! Fixed daily dose slots.

use chrono::NaiveTime;
use chrono_tz::Tz;

/// All schedule arithmetic happens in this zone. The slot times below are
/// wall-clock times here, well clear of the 02:00 DST transition window, so
/// no event can land on an ambiguous instant.
pub const CALENDAR_TZ: Tz = chrono_tz::America::New_York;

/// One of the four daily windows at which a dose may be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoseSlot {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DoseSlot {
    /// Canonical slot order, used everywhere doses are iterated.
    pub const ALL: [DoseSlot; 4] = [
        DoseSlot::Morning,
        DoseSlot::Afternoon,
        DoseSlot::Evening,
        DoseSlot::Night,
    ];

    /// Fixed wall-clock start time for this slot.
    pub fn time(self) -> NaiveTime {
        let (hour, minute) = match self {
            DoseSlot::Morning => (8, 0),
            DoseSlot::Afternoon => (13, 0),
            DoseSlot::Evening => (18, 0),
            DoseSlot::Night => (22, 0),
        };
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_slot_times() {
        let hours: Vec<u32> = DoseSlot::ALL.iter().map(|s| s.time().hour()).collect();
        assert_eq!(hours, vec![8, 13, 18, 22]);
        assert!(DoseSlot::ALL.iter().all(|s| s.time().minute() == 0));
    }
}
