//! Wall clock shown in the header.
//!
//! The clock is display state only: it moves on the refresh ticker. Operations that record an
//! event are handed the event's own instant.

use crate::model::Shift;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

/// The shift covering `instant` in the ward's local time, unless one is pinned.
pub fn shift_at(instant: DateTime<Utc>, offset: FixedOffset, pinned: Option<Shift>) -> Shift {
    pinned.unwrap_or_else(|| Shift::at(instant.with_timezone(&offset).time()))
}

/// The ward's local calendar date at `instant`.
pub fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// The last observed wall-clock instant. Advanced by the refresh ticker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct WallClock {
    now: DateTime<Utc>,
}

impl WallClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Moves the clock to `now`. Earlier instants are ignored.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if now > self.now {
            self.now = now;
        }
    }

    pub fn current_shift(&self, offset: FixedOffset, pinned: Option<Shift>) -> Shift {
        shift_at(self.now, offset, pinned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Offset, TimeZone};

    fn brasilia() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    #[test]
    fn tick_only_moves_forward() {
        let start = Utc.with_ymd_and_hms(2024, 1, 20, 16, 0, 0).unwrap();
        let mut clock = WallClock::new(start);
        clock.tick(start - Duration::minutes(5));
        assert_eq!(clock.now(), start);
        clock.tick(start + Duration::seconds(60));
        assert_eq!(clock.now(), start + Duration::seconds(60));
    }

    #[test]
    fn shift_follows_clock_unless_pinned() {
        let utc = Utc.fix();
        let clock = WallClock::new(Utc.with_ymd_and_hms(2024, 1, 20, 23, 0, 0).unwrap());
        assert_eq!(clock.current_shift(utc, None), Shift::Night);
        assert_eq!(clock.current_shift(utc, Some(Shift::Morning)), Shift::Morning);
    }

    #[test]
    fn shift_and_date_use_local_time() {
        // 14:00 UTC is 11:00 in Brasília.
        let instant = Utc.with_ymd_and_hms(2024, 1, 20, 14, 0, 0).unwrap();
        assert_eq!(shift_at(instant, Utc.fix(), None), Shift::Afternoon);
        assert_eq!(shift_at(instant, brasilia(), None), Shift::Morning);

        let after_midnight_utc = Utc.with_ymd_and_hms(2024, 1, 21, 1, 0, 0).unwrap();
        assert_eq!(
            local_date(after_midnight_utc, brasilia()),
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()
        );
        assert_eq!(shift_at(after_midnight_utc, brasilia(), None), Shift::Night);
    }
}
