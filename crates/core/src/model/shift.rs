use super::wire_enum;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Nursing shift.
///
/// Morning runs 06:00–14:00, afternoon 14:00–22:00 and night 22:00–06:00.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Afternoon,
    Night,
}

wire_enum!(Shift {
    Morning => "morning",
    Afternoon => "afternoon",
    Night => "night",
});

impl Shift {
    /// The shift covering the wall-clock time `time`.
    pub fn at(time: NaiveTime) -> Self {
        match time.hour() {
            6..=13 => Shift::Morning,
            14..=21 => Shift::Afternoon,
            _ => Shift::Night,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Shift::Morning => "Manhã",
            Shift::Afternoon => "Tarde",
            Shift::Night => "Noite",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn boundaries() {
        assert_eq!(Shift::at(hm(5, 59)), Shift::Night);
        assert_eq!(Shift::at(hm(6, 0)), Shift::Morning);
        assert_eq!(Shift::at(hm(13, 59)), Shift::Morning);
        assert_eq!(Shift::at(hm(14, 0)), Shift::Afternoon);
        assert_eq!(Shift::at(hm(21, 59)), Shift::Afternoon);
        assert_eq!(Shift::at(hm(22, 0)), Shift::Night);
        assert_eq!(Shift::at(hm(0, 0)), Shift::Night);
    }

    #[test]
    fn parses_wire_names() {
        assert_eq!("afternoon".parse::<Shift>().unwrap(), Shift::Afternoon);
        assert!("Afternoon".parse::<Shift>().is_err());
        assert_eq!(Shift::Night.to_string(), "night");
        assert_eq!(Shift::Morning.label(), "Manhã");
    }
}
