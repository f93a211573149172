//! Work and break duration accounting.
//!
//! Durations are reported in whole minutes as `"<N>分"`, or as the `"-"`
//! sentinel when they cannot be known. None of these functions fail: every
//! combination of present and absent fields has a defined result.
//!
//! Worked time is not clamped. A record whose effective end precedes its
//! start, or whose breaks outlast the shift, reports a negative duration so
//! that the bad data stays visible to whoever reviews the sheet.

use crate::models::AttendanceRecord;

use super::effective::effective_times;

/// The sentinel shown for a duration that cannot be computed.
pub const UNKNOWN_DURATION: &str = "-";

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Rounds milliseconds to the nearest minute, halves rounding up.
///
/// `-30s` rounds to `0` and `-90s` to `-1`, matching `floor(x + 0.5)`.
///
/// # Examples
///
/// ```
/// use venue_backoffice::attendance::round_to_minutes;
///
/// assert_eq!(round_to_minutes(89_999), 1);
/// assert_eq!(round_to_minutes(90_000), 2);
/// assert_eq!(round_to_minutes(-90_000), -1);
/// ```
pub fn round_to_minutes(millis: i64) -> i64 {
    (millis + MILLIS_PER_MINUTE / 2).div_euclid(MILLIS_PER_MINUTE)
}

/// Formats a minute count as `"<N>分"`, or the sentinel when unknown.
pub fn format_minutes(minutes: Option<i64>) -> String {
    match minutes {
        Some(minutes) => format!("{minutes}分"),
        None => UNKNOWN_DURATION.to_string(),
    }
}

/// Returns the worked minutes of a record.
///
/// `None` when the effective start or end is missing. Complete breaks from
/// the effective break set are subtracted; incomplete ones subtract nothing.
pub fn work_minutes(record: &AttendanceRecord) -> Option<i64> {
    let times = effective_times(record);
    let (start, end) = (times.start?, times.end?);
    let worked = (end - start).num_milliseconds() - times.total_break_millis();
    Some(round_to_minutes(worked))
}

/// Returns the break minutes of a record.
///
/// `None` when the effective break set is empty, or when its complete
/// breaks add up to nothing.
pub fn break_minutes(record: &AttendanceRecord) -> Option<i64> {
    let times = effective_times(record);
    if times.breaks.is_empty() {
        return None;
    }
    let total = times.total_break_millis();
    (total > 0).then(|| round_to_minutes(total))
}

/// Formats a record's worked time.
///
/// # Examples
///
/// ```
/// use venue_backoffice::attendance::work_duration;
/// use venue_backoffice::models::{AttendanceRecord, PunchedBreak, parse_timestamp};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
/// let mut record = AttendanceRecord::new(1, "cast1", date);
/// assert_eq!(work_duration(&record), "-");
///
/// record.start = parse_timestamp("2024-12-01T09:00:00Z");
/// record.end = parse_timestamp("2024-12-01T10:30:00Z");
/// record.breaks.push(PunchedBreak {
///     start: parse_timestamp("2024-12-01T09:30:00Z").unwrap(),
///     end: parse_timestamp("2024-12-01T09:40:00Z"),
/// });
/// assert_eq!(work_duration(&record), "80分");
/// ```
pub fn work_duration(record: &AttendanceRecord) -> String {
    format_minutes(work_minutes(record))
}

/// Formats a record's break time.
pub fn break_duration(record: &AttendanceRecord) -> String {
    format_minutes(break_minutes(record))
}

/// Sums the known worked minutes of several records.
///
/// Records with unknown work time are skipped; negative values count. A
/// total that is not positive is `None`.
pub fn total_work_minutes<'a, I>(records: I) -> Option<i64>
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let total: i64 = records.into_iter().filter_map(work_minutes).sum();
    (total > 0).then_some(total)
}

/// Formats the summed worked time of several records.
pub fn total_work_duration<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    format_minutes(total_work_minutes(records))
}
