//! Sources of "now" for the store and CLI.
//!
//! Analytics functions never consult a clock. They take `today` as a plain
//! [`NaiveDate`] so one computation pass always agrees on the date.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

/// Provides the current instant and local calendar day.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current local calendar day.
    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one local day.
///
/// `now()` reports local noon of that day, which keeps the day stable across
/// DST transitions.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    day: NaiveDate,
}

impl FixedClock {
    pub fn new(day: NaiveDate) -> Self {
        Self { day }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let noon = self
            .day
            .and_hms_opt(12, 0, 0)
            .expect("12:00:00 is a valid time of day");
        Local
            .from_local_datetime(&noon)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| noon.and_utc())
    }

    fn today(&self) -> NaiveDate {
        self.day
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_stable() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let clock = FixedClock::new(day);
        assert_eq!(clock.today(), day);
        assert_eq!(clock.now().with_timezone(&Local).date_naive(), day);
    }
}
