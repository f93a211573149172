//! Display rows for attendance records.
//!
//! Times are shown in the venue's local time as `HH:MM:SS`, with `"-"` for
//! anything unknown.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use crate::models::AttendanceRecord;

use super::duration::{UNKNOWN_DURATION, break_duration, total_work_duration, work_duration};

/// Formats a timestamp as venue-local `HH:MM:SS`, or `"-"` when absent.
pub fn format_local_time(value: Option<DateTime<Utc>>, offset: FixedOffset) -> String {
    value
        .map(|v| v.with_timezone(&offset).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| UNKNOWN_DURATION.to_string())
}

/// One row of the break table: the punched break beside its correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakRow {
    /// Punched break start.
    pub start: String,
    /// Punched break end.
    pub end: String,
    /// Corrected break start.
    pub manual_start: String,
    /// Corrected break end.
    pub manual_end: String,
}

/// The display form of one attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    /// Record id.
    pub id: i64,
    /// Owning user.
    pub user_id: String,
    /// Working date.
    pub date: NaiveDate,
    /// Punched clock-in time.
    pub start: String,
    /// Punched clock-out time.
    pub end: String,
    /// Corrected clock-in time, shown beside the punched one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_start: Option<String>,
    /// Corrected clock-out time, shown beside the punched one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_end: Option<String>,
    /// Planned shift as `"HH:MM - HH:MM"`.
    pub planned: String,
    /// Break time.
    pub break_duration: String,
    /// Worked time.
    pub work_duration: String,
    /// Whether a punched break is in progress.
    pub on_break: bool,
    /// Punched and corrected breaks side by side.
    pub breaks: Vec<BreakRow>,
}

impl AttendanceSummary {
    /// Builds the display row for a record.
    pub fn from_record(record: &AttendanceRecord, offset: FixedOffset) -> Self {
        let time = |value: Option<DateTime<Utc>>| format_local_time(value, offset);
        let manual = record.manual_breaks.as_deref().unwrap_or_default();
        let rows = record.breaks.len().max(manual.len());

        let breaks = (0..rows)
            .map(|i| {
                let punched = record.breaks.get(i);
                let corrected = manual.get(i);
                BreakRow {
                    start: time(punched.map(|b| b.start)),
                    end: time(punched.and_then(|b| b.end)),
                    manual_start: time(corrected.and_then(|b| b.start)),
                    manual_end: time(corrected.and_then(|b| b.end)),
                }
            })
            .collect();

        Self {
            id: record.id,
            user_id: record.user_id.clone(),
            date: record.date,
            start: time(record.start),
            end: time(record.end),
            manual_start: record.manual_start.map(|v| time(Some(v))),
            manual_end: record.manual_end.map(|v| time(Some(v))),
            planned: record
                .planned_range()
                .unwrap_or_else(|| UNKNOWN_DURATION.to_string()),
            break_duration: break_duration(record),
            work_duration: work_duration(record),
            on_break: record.is_on_break(),
            breaks,
        }
    }
}

/// One user's attendance: every record plus the total worked time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSheet {
    /// The user the sheet belongs to.
    pub user_id: String,
    /// Rows ordered by date.
    pub records: Vec<AttendanceSummary>,
    /// Sum of the known worked times.
    pub total_work_duration: String,
}

impl AttendanceSheet {
    /// Builds the sheet for `user_id` from a list that may hold other users' records.
    pub fn build(records: &[AttendanceRecord], user_id: &str, offset: FixedOffset) -> Self {
        let mut own: Vec<&AttendanceRecord> =
            records.iter().filter(|r| r.user_id == user_id).collect();
        own.sort_by_key(|r| (r.date, r.id));

        Self {
            user_id: user_id.to_string(),
            records: own
                .iter()
                .map(|r| AttendanceSummary::from_record(r, offset))
                .collect(),
            total_work_duration: total_work_duration(own.iter().copied()),
        }
    }
}
