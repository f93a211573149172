//! Clock and schedule actions over attendance records.
//!
//! Each action looks up the (user, date) record in the slice it is given,
//! checks the action is allowed, and returns the record to write back. The
//! caller owns persistence: one save of the returned record completes the
//! action.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;

use crate::error::{BackofficeError, BackofficeResult};
use crate::models::{AttendanceRecord, ManualBreak, PunchedBreak};

/// Finds the record for a user and date.
pub fn find_record<'a>(
    records: &'a [AttendanceRecord],
    user_id: &str,
    date: NaiveDate,
) -> Option<&'a AttendanceRecord> {
    records
        .iter()
        .find(|r| r.user_id == user_id && r.date == date)
}

/// Finds the record for a user and date that is clocked in but not out.
pub fn find_open_record<'a>(
    records: &'a [AttendanceRecord],
    user_id: &str,
    date: NaiveDate,
) -> Option<&'a AttendanceRecord> {
    records
        .iter()
        .find(|r| r.user_id == user_id && r.date == date && r.is_open())
}

fn open_record(
    records: &[AttendanceRecord],
    user_id: &str,
    date: NaiveDate,
) -> BackofficeResult<AttendanceRecord> {
    find_open_record(records, user_id, date)
        .cloned()
        .ok_or_else(|| BackofficeError::NotClockedIn {
            user_id: user_id.to_string(),
            date,
        })
}

/// Clocks a user in.
///
/// An existing record for the day is reused with its id, breaks, schedule
/// and manual overrides intact; its start becomes `now` and any end is
/// cleared. Otherwise a new record is created whose id is `now` in epoch
/// milliseconds.
///
/// # Errors
///
/// [`BackofficeError::AlreadyClockedIn`] if the day's record is open.
///
/// # Examples
///
/// ```
/// use venue_backoffice::attendance::clock_in;
/// use chrono::{NaiveDate, TimeZone, Utc};
///
/// let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
/// let now = Utc.with_ymd_and_hms(2024, 12, 1, 9, 0, 0).unwrap();
///
/// let record = clock_in(&[], "cast1", date, now)?;
/// assert_eq!(record.id, now.timestamp_millis());
/// assert!(record.is_open());
///
/// assert!(clock_in(&[record], "cast1", date, now).is_err());
/// # Ok::<(), venue_backoffice::error::BackofficeError>(())
/// ```
pub fn clock_in(
    records: &[AttendanceRecord],
    user_id: &str,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> BackofficeResult<AttendanceRecord> {
    if find_open_record(records, user_id, date).is_some() {
        return Err(BackofficeError::AlreadyClockedIn {
            user_id: user_id.to_string(),
            date,
        });
    }

    let mut record = find_record(records, user_id, date)
        .cloned()
        .unwrap_or_else(|| AttendanceRecord::new(now.timestamp_millis(), user_id, date));
    record.start = Some(now);
    record.end = None;
    Ok(record)
}

/// Starts a break on the user's open record.
///
/// # Errors
///
/// [`BackofficeError::NotClockedIn`] without an open record,
/// [`BackofficeError::AlreadyOnBreak`] if a break is already in progress.
pub fn start_break(
    records: &[AttendanceRecord],
    user_id: &str,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> BackofficeResult<AttendanceRecord> {
    let mut record = open_record(records, user_id, date)?;
    if record.is_on_break() {
        return Err(BackofficeError::AlreadyOnBreak {
            user_id: user_id.to_string(),
        });
    }
    record.breaks.push(PunchedBreak {
        start: now,
        end: None,
    });
    Ok(record)
}

/// Ends the break in progress on the user's open record.
///
/// # Errors
///
/// [`BackofficeError::NotClockedIn`] without an open record,
/// [`BackofficeError::NotOnBreak`] if no break is in progress.
pub fn end_break(
    records: &[AttendanceRecord],
    user_id: &str,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> BackofficeResult<AttendanceRecord> {
    let mut record = open_record(records, user_id, date)?;
    match record.breaks.last_mut() {
        Some(last) if last.end.is_none() => last.end = Some(now),
        _ => {
            return Err(BackofficeError::NotOnBreak {
                user_id: user_id.to_string(),
            });
        }
    }
    Ok(record)
}

/// Clocks a user out.
///
/// A break still in progress is left open; it contributes nothing to the
/// accounting until an editor closes it.
///
/// # Errors
///
/// [`BackofficeError::NotClockedIn`] without an open record.
pub fn clock_out(
    records: &[AttendanceRecord],
    user_id: &str,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> BackofficeResult<AttendanceRecord> {
    let mut record = open_record(records, user_id, date)?;
    record.end = Some(now);
    Ok(record)
}

/// Parses a wall-clock time written as `HH:MM` or `HH:MM:SS`.
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

fn require_clock_time(field: &str, value: &str) -> BackofficeResult<NaiveTime> {
    parse_clock_time(value)
        .ok_or_else(|| BackofficeError::validation(field, format!("expected HH:MM, got '{value}'")))
}

/// Sets the planned schedule for a user and date.
///
/// The day's record is updated in place, or created with id `now` in epoch
/// milliseconds when none exists.
///
/// # Errors
///
/// [`BackofficeError::Validation`] if either time is not `HH:MM`.
pub fn add_schedule(
    records: &[AttendanceRecord],
    user_id: &str,
    date: NaiveDate,
    planned_start: &str,
    planned_end: &str,
    now: DateTime<Utc>,
) -> BackofficeResult<AttendanceRecord> {
    require_clock_time("plannedStart", planned_start)?;
    require_clock_time("plannedEnd", planned_end)?;

    let mut record = find_record(records, user_id, date)
        .cloned()
        .unwrap_or_else(|| AttendanceRecord::new(now.timestamp_millis(), user_id, date));
    record.planned_start = Some(planned_start.trim().to_string());
    record.planned_end = Some(planned_end.trim().to_string());
    Ok(record)
}

/// One row of the break editor, as local wall-clock times.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ManualBreakEdit {
    /// Corrected break start (`HH:MM`); blank means unknown.
    #[serde(default)]
    pub start: Option<String>,
    /// Corrected break end (`HH:MM`); blank means unknown.
    #[serde(default)]
    pub end: Option<String>,
}

/// Corrections entered by an editor for one record.
///
/// Times are venue-local `HH:MM` values on the record's date. Absent or
/// blank fields leave the stored value unchanged, except `manual_breaks`,
/// which always replaces the stored list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualEdit {
    /// Corrected clock-in time.
    #[serde(default)]
    pub manual_start: Option<String>,
    /// Corrected clock-out time.
    #[serde(default)]
    pub manual_end: Option<String>,
    /// Planned start of the shift.
    #[serde(default)]
    pub planned_start: Option<String>,
    /// Planned end of the shift.
    #[serde(default)]
    pub planned_end: Option<String>,
    /// Corrected breaks, in order.
    #[serde(default)]
    pub manual_breaks: Vec<ManualBreakEdit>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn local_timestamp(
    field: &str,
    date: NaiveDate,
    value: &str,
    offset: FixedOffset,
) -> BackofficeResult<DateTime<Utc>> {
    let time = require_clock_time(field, value)?;
    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| BackofficeError::validation(field, format!("'{value}' is not a valid local time")))
}

/// Applies an editor's corrections to a record.
///
/// Local times are placed on the record's date in the venue's `offset`.
/// Break rows with both ends blank are dropped. The record is left
/// untouched when any field fails to parse.
///
/// # Examples
///
/// ```
/// use venue_backoffice::attendance::{ManualEdit, apply_manual_edit};
/// use venue_backoffice::models::{AttendanceRecord, parse_timestamp};
/// use chrono::{FixedOffset, NaiveDate};
///
/// let jst = FixedOffset::east_opt(9 * 3600).unwrap();
/// let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
/// let mut record = AttendanceRecord::new(1, "cast1", date);
///
/// let edit = ManualEdit {
///     manual_start: Some("09:00".into()),
///     ..ManualEdit::default()
/// };
/// apply_manual_edit(&mut record, &edit, jst)?;
/// assert_eq!(record.manual_start, parse_timestamp("2024-12-01T00:00:00Z"));
/// # Ok::<(), venue_backoffice::error::BackofficeError>(())
/// ```
pub fn apply_manual_edit(
    record: &mut AttendanceRecord,
    edit: &ManualEdit,
    offset: FixedOffset,
) -> BackofficeResult<()> {
    let date = record.date;
    let at = |field: &str, value: Option<&str>| -> BackofficeResult<Option<DateTime<Utc>>> {
        value
            .map(|v| local_timestamp(field, date, v, offset))
            .transpose()
    };

    let manual_start = at("manualStart", non_blank(&edit.manual_start))?;
    let manual_end = at("manualEnd", non_blank(&edit.manual_end))?;

    let planned_start = non_blank(&edit.planned_start);
    let planned_end = non_blank(&edit.planned_end);
    if let Some(value) = planned_start {
        require_clock_time("plannedStart", value)?;
    }
    if let Some(value) = planned_end {
        require_clock_time("plannedEnd", value)?;
    }

    let mut manual_breaks = Vec::with_capacity(edit.manual_breaks.len());
    for row in &edit.manual_breaks {
        let start = at("manualBreaks.start", non_blank(&row.start))?;
        let end = at("manualBreaks.end", non_blank(&row.end))?;
        if start.is_some() || end.is_some() {
            manual_breaks.push(ManualBreak { start, end });
        }
    }

    if manual_start.is_some() {
        record.manual_start = manual_start;
    }
    if manual_end.is_some() {
        record.manual_end = manual_end;
    }
    if let Some(value) = planned_start {
        record.planned_start = Some(value.to_string());
    }
    if let Some(value) = planned_end {
        record.planned_end = Some(value.to_string());
    }
    record.manual_breaks = Some(manual_breaks);
    Ok(())
}
