//! 12-hour labels for hourly forecast samples.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// Format one hourly sample's time as a 12-hour label.
///
/// A day's series carries the following midnight as its last sample; that
/// rollover sample gets the "(next day)" suffix, since it is otherwise
/// indistinguishable from the day's own midnight. `reference_day` is the
/// calendar date the series belongs to.
pub fn hour_label(time: NaiveDateTime, reference_day: NaiveDate) -> String {
    match time.hour() {
        0 if time.date() != reference_day => "12 AM (next day)".to_string(),
        0 => "12 AM".to_string(),
        12 => "12 PM".to_string(),
        h if h > 12 => format!("{} PM", h - 12),
        h => format!("{h} AM"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn at(date: NaiveDate, hour: u32) -> NaiveDateTime {
        date.and_hms_opt(hour, 0, 0).expect("valid time")
    }

    #[test]
    fn midnight_on_the_reference_day() {
        let d = day(2025, 3, 10);
        assert_eq!(hour_label(at(d, 0), d), "12 AM");
    }

    #[test]
    fn rollover_midnight_is_flagged_as_next_day() {
        let d = day(2025, 3, 10);
        let next = day(2025, 3, 11);
        assert_eq!(hour_label(at(next, 0), d), "12 AM (next day)");
    }

    #[test]
    fn noon() {
        let d = day(2025, 3, 10);
        assert_eq!(hour_label(at(d, 12), d), "12 PM");
    }

    #[test]
    fn afternoon_hours_wrap_to_pm() {
        let d = day(2025, 3, 10);
        assert_eq!(hour_label(at(d, 13), d), "1 PM");
        assert_eq!(hour_label(at(d, 23), d), "11 PM");
    }

    #[test]
    fn morning_hours_stay_am() {
        let d = day(2025, 3, 10);
        assert_eq!(hour_label(at(d, 9), d), "9 AM");
        assert_eq!(hour_label(at(d, 1), d), "1 AM");
    }
}
