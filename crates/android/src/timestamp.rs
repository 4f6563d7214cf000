//! Minute-granularity timestamps for archive file names
//!
//! Format is `DD_MM_YYYY_HH_MM` in local wall-clock time. Two builds in the
//! same minute produce the same timestamp.

use chrono::{Local, NaiveDateTime};

const FORMAT: &str = "%d_%m_%Y_%H_%M";

/// Format `instant` as `DD_MM_YYYY_HH_MM`
#[must_use]
pub fn format_timestamp(instant: &NaiveDateTime) -> String {
    instant.format(FORMAT).to_string()
}

/// Source of "now"
pub trait Clock {
    /// Current local wall-clock time
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Timelike};
    use proptest::prelude::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_format_zero_padded() {
        assert_eq!(format_timestamp(&at(2025, 1, 3, 9, 5)), "03_01_2025_09_05");
    }

    #[test]
    fn test_format_two_digit_fields() {
        assert_eq!(format_timestamp(&at(2024, 12, 31, 23, 59)), "31_12_2024_23_59");
    }

    #[test]
    fn test_seconds_ignored() {
        let instant = NaiveDate::from_ymd_opt(2025, 6, 7)
            .unwrap()
            .and_hms_opt(14, 30, 59)
            .unwrap();
        assert_eq!(format_timestamp(&instant), "07_06_2025_14_30");
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(at(2025, 1, 3, 9, 5));
        assert_eq!(clock.now(), clock.now());
        assert_eq!(format_timestamp(&clock.now()), "03_01_2025_09_05");
    }

    proptest! {
        #[test]
        fn prop_fields_round_trip(
            y in 1000i32..=9999,
            mo in 1u32..=12,
            d in 1u32..=28,
            h in 0u32..24,
            mi in 0u32..60,
        ) {
            let instant = at(y, mo, d, h, mi);
            let text = format_timestamp(&instant);
            prop_assert_eq!(text.len(), 16);

            let fields: Vec<u32> = text.split('_').map(|f| f.parse().unwrap()).collect();
            prop_assert_eq!(fields, vec![instant.day(), instant.month(), instant.year() as u32, instant.hour(), instant.minute()]);
        }
    }
}
