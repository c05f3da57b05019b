//! Date and time labels used in the report.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

/// English ordinal suffix for a day of the month: 1st, 2nd, 3rd, 11th, 22nd.
pub fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// `3:04 PM`
pub fn time_12h(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// `Mon Oct 19th 3:04 PM`, used for the "Generated" line.
pub fn pretty_timestamp(dt: NaiveDateTime) -> String {
    format!(
        "{}{} {}",
        dt.format("%a %b %-d"),
        ordinal_suffix(dt.day()),
        time_12h(dt.time())
    )
}

/// `Mon Oct 19`, the day header.
pub fn day_short(day: NaiveDate) -> String {
    day.format("%a %b %-d").to_string()
}

/// `Monday, October 19th, 2026`, the outline title for a day.
pub fn day_long(day: NaiveDate) -> String {
    format!(
        "{}{}, {}",
        day.format("%A, %B %-d"),
        ordinal_suffix(day.day()),
        day.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals() {
        let cases = [
            (1, "st"),
            (2, "nd"),
            (3, "rd"),
            (4, "th"),
            (11, "th"),
            (12, "th"),
            (13, "th"),
            (21, "st"),
            (22, "nd"),
            (23, "rd"),
            (31, "st"),
        ];
        for (day, suffix) in cases {
            assert_eq!(ordinal_suffix(day), suffix, "day {}", day);
        }
    }

    #[test]
    fn twelve_hour_clock() {
        assert_eq!(time_12h(NaiveTime::from_hms_opt(0, 5, 0).unwrap()), "12:05 AM");
        assert_eq!(time_12h(NaiveTime::from_hms_opt(12, 0, 0).unwrap()), "12:00 PM");
        assert_eq!(time_12h(NaiveTime::from_hms_opt(15, 4, 0).unwrap()), "3:04 PM");
    }

    #[test]
    fn day_labels() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(day_short(day), "Mon Oct 19");
        assert_eq!(day_long(day), "Monday, October 19th, 2026");
        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(day_short(day), "Mon Mar 2");
    }

    #[test]
    fn generated_timestamp() {
        let dt = NaiveDate::from_ymd_opt(2026, 10, 22)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(pretty_timestamp(dt), "Thu Oct 22nd 9:30 AM");
    }
}
