//! # Report Window
//!
//! Selecting which entries go into a report and in what order: the
//! trailing N-day cutoff, bucketing by local calendar day, and the
//! ordering of days and of meals within a day.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::model::{DayGroup, DiaryEntry, EntryOrder};

/// Entries captured at or after `now - window_days`.
///
/// Only the lower bound is applied; an entry stamped later than `now` is
/// still reported.
pub fn filter_window<'a, Tz: TimeZone>(
    entries: &'a [DiaryEntry],
    window_days: u32,
    now: &DateTime<Tz>,
) -> Vec<&'a DiaryEntry> {
    // Windows reaching before the earliest representable instant keep
    // everything.
    let cutoff = now
        .with_timezone(&Utc)
        .checked_sub_signed(Duration::days(i64::from(window_days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    entries
        .iter()
        .filter(|entry| entry.captured_at >= cutoff)
        .collect()
}

/// Partition entries by their calendar date in `tz`.
///
/// Days come out newest first. Within a day, entries follow `order`; ties
/// keep their input order.
pub fn group_by_day<'a, Tz: TimeZone>(
    entries: Vec<&'a DiaryEntry>,
    tz: &Tz,
    order: EntryOrder,
) -> Vec<DayGroup<'a>> {
    let mut days: BTreeMap<NaiveDate, Vec<&'a DiaryEntry>> = BTreeMap::new();
    for entry in entries {
        let day = entry.captured_at.with_timezone(tz).date_naive();
        days.entry(day).or_default().push(entry);
    }

    days.into_iter()
        .rev()
        .map(|(day, mut entries)| {
            match order {
                EntryOrder::NewestFirst => entries.sort_by(|a, b| b.captured_at.cmp(&a.captured_at)),
                EntryOrder::OldestFirst => entries.sort_by(|a, b| a.captured_at.cmp(&b.captured_at)),
            }
            DayGroup { day, entries }
        })
        .collect()
}

/// `food-diary-7-days.pdf`
pub fn report_filename(window_days: u32) -> String {
    format!("food-diary-{}-days.pdf", window_days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, d, h, m, 0).unwrap()
    }

    fn entries(times: &[DateTime<Utc>]) -> Vec<DiaryEntry> {
        times.iter().map(|t| DiaryEntry::new(*t)).collect()
    }

    #[test]
    fn cutoff_is_inclusive() {
        let now = utc(19, 12, 0);
        let all = entries(&[utc(12, 12, 0), utc(12, 11, 59), utc(19, 11, 0)]);
        let kept = filter_window(&all, 7, &now);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|e| e.captured_at >= utc(12, 12, 0)));
    }

    #[test]
    fn zero_day_window_keeps_only_now_and_later() {
        let now = utc(19, 12, 0);
        let all = entries(&[utc(19, 11, 59), utc(19, 12, 0), utc(19, 13, 0)]);
        let kept = filter_window(&all, 0, &now);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn window_past_the_calendar_keeps_everything() {
        let now = utc(19, 12, 0);
        let mut all = entries(&[utc(19, 11, 0)]);
        all.push(DiaryEntry::new(Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(filter_window(&all, 200_000_000, &now).len(), 2);
        assert_eq!(filter_window(&all, u32::MAX, &now).len(), 2);
    }

    #[test]
    fn groups_newest_day_first_and_entries_newest_first() {
        let all = entries(&[utc(17, 8, 0), utc(19, 8, 0), utc(17, 19, 0), utc(19, 13, 0)]);
        let groups = group_by_day(all.iter().collect(), &Utc, EntryOrder::NewestFirst);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].day, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(groups[0].entries[0].captured_at, utc(19, 13, 0));
        assert_eq!(groups[0].entries[1].captured_at, utc(19, 8, 0));
        assert_eq!(groups[1].entries[0].captured_at, utc(17, 19, 0));
    }

    #[test]
    fn oldest_first_order_within_day() {
        let all = entries(&[utc(19, 13, 0), utc(19, 8, 0)]);
        let groups = group_by_day(all.iter().collect(), &Utc, EntryOrder::OldestFirst);
        assert_eq!(groups[0].entries[0].captured_at, utc(19, 8, 0));
    }

    #[test]
    fn grouping_uses_local_calendar_day() {
        // 02:30 UTC on the 19th is still the evening of the 18th in UTC-5.
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let all = entries(&[utc(19, 2, 30), utc(19, 14, 0)]);
        let groups = group_by_day(all.iter().collect(), &tz, EntryOrder::NewestFirst);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].day, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    }

    #[test]
    fn grouping_is_a_partition() {
        let all = entries(&[utc(15, 1, 0), utc(16, 2, 0), utc(16, 3, 0), utc(18, 4, 0), utc(18, 5, 0)]);
        let groups = group_by_day(all.iter().collect(), &Utc, EntryOrder::NewestFirst);
        let total: usize = groups.iter().map(|g| g.entries.len()).sum();
        assert_eq!(total, all.len());
        for group in &groups {
            assert!(!group.entries.is_empty());
            for entry in &group.entries {
                assert_eq!(entry.captured_at.date_naive(), group.day);
            }
        }
    }

    #[test]
    fn filename() {
        assert_eq!(report_filename(14), "food-diary-14-days.pdf");
    }
}
