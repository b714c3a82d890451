//! Wall-clock source for the time-of-day factor.

use chrono::{DateTime, Local};
#[cfg(any(test, feature = "test-util"))]
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone};
use std::fmt::Debug;

pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Local>;
}

/// The real local clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock frozen at one instant.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

#[cfg(any(test, feature = "test-util"))]
impl FixedClock {
    /// 2026-01-15 at `hour:00` local time; `hour` wraps modulo 24.
    /// January keeps clear of DST transitions, so the local hour is exact.
    pub fn at_hour(hour: u32) -> Self {
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap_or_default();
        let naive = date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(hour % 24));
        let instant = Local
            .from_local_datetime(&naive)
            .earliest()
            .unwrap_or_else(|| Local.from_utc_datetime(&naive));
        Self(instant)
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn fixed_clock_hour() {
        for h in [0, 9, 10, 23] {
            assert_eq!(FixedClock::at_hour(h).now().hour(), h);
        }
    }

    #[test]
    fn fixed_clock_hour_wraps() {
        assert_eq!(FixedClock::at_hour(24).now(), FixedClock::at_hour(0).now());
        assert_eq!(FixedClock::at_hour(49).now().hour(), 1);
        assert_eq!(FixedClock::at_hour(23).now().day(), 15);
    }
}
