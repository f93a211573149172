//! Attendance time accounting.
//!
//! This module holds the pure attendance logic: resolving effective times
//! from punched values and manual overrides, computing work and break
//! durations, the clock actions, and the display rows built from records.
//! Nothing here performs I/O.
//!
//! # Example
//!
//! ```
//! use venue_backoffice::attendance::{break_duration, work_duration};
//! use venue_backoffice::models::{AttendanceRecord, PunchedBreak, parse_timestamp};
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
//! let mut record = AttendanceRecord::new(1, "cast1", date);
//! record.start = parse_timestamp("2024-12-01T09:00:00Z");
//! record.end = parse_timestamp("2024-12-01T17:00:00Z");
//! record.breaks.push(PunchedBreak {
//!     start: parse_timestamp("2024-12-01T12:00:00Z").unwrap(),
//!     end: parse_timestamp("2024-12-01T12:45:00Z"),
//! });
//!
//! assert_eq!(break_duration(&record), "45分");
//! assert_eq!(work_duration(&record), "435分");
//! ```

mod duration;
mod effective;
mod punch;
mod summary;

pub use duration::{
    UNKNOWN_DURATION, break_duration, break_minutes, format_minutes, round_to_minutes,
    total_work_duration, total_work_minutes, work_duration, work_minutes,
};
pub use effective::{BreakSource, BreakSpan, EffectiveTimes, effective_times};
pub use punch::{
    ManualBreakEdit, ManualEdit, add_schedule, apply_manual_edit, clock_in, clock_out, end_break,
    find_open_record, find_record, parse_clock_time, start_break,
};
pub use summary::{AttendanceSheet, AttendanceSummary, BreakRow, format_local_time};
