//! Effective value resolution for attendance records.
//!
//! Manual overrides win over punched values field by field. The break set
//! is chosen as a whole: a non-empty `manual_breaks` replaces `breaks`
//! entirely, while an absent or empty one falls back to the punched breaks.

use chrono::{DateTime, Utc};

use crate::models::AttendanceRecord;

/// Which break list an [`EffectiveTimes`] was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakSource {
    /// The punched `breaks`.
    Punched,
    /// The editor-entered `manual_breaks`.
    Manual,
}

/// One break interval after override resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakSpan {
    /// Start of the break, if known.
    pub start: Option<DateTime<Utc>>,
    /// End of the break, if known.
    pub end: Option<DateTime<Utc>>,
}

impl BreakSpan {
    /// Returns the break length in milliseconds.
    ///
    /// Breaks missing either end contribute zero.
    pub fn millis(&self) -> i64 {
        match (self.start, self.end) {
            (Some(start), Some(end)) => (end - start).num_milliseconds(),
            _ => 0,
        }
    }
}

/// The start, end and breaks actually used for accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveTimes {
    /// `manual_start` if present, else `start`.
    pub start: Option<DateTime<Utc>>,
    /// `manual_end` if present, else `end`.
    pub end: Option<DateTime<Utc>>,
    /// The selected break set, in order.
    pub breaks: Vec<BreakSpan>,
    /// Where `breaks` came from.
    pub break_source: BreakSource,
}

impl EffectiveTimes {
    /// Returns the summed length of all complete breaks in milliseconds.
    pub fn total_break_millis(&self) -> i64 {
        self.breaks.iter().map(BreakSpan::millis).sum()
    }
}

/// Resolves a record's effective times.
///
/// # Examples
///
/// ```
/// use venue_backoffice::attendance::{BreakSource, effective_times};
/// use venue_backoffice::models::{AttendanceRecord, parse_timestamp};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
/// let mut record = AttendanceRecord::new(1, "cast1", date);
/// record.start = parse_timestamp("2024-12-01T09:00:00Z");
/// record.manual_start = parse_timestamp("2024-12-01T08:30:00Z");
/// record.manual_breaks = Some(vec![]);
///
/// let times = effective_times(&record);
/// assert_eq!(times.start, record.manual_start);
/// assert_eq!(times.break_source, BreakSource::Punched);
/// ```
pub fn effective_times(record: &AttendanceRecord) -> EffectiveTimes {
    let (breaks, break_source) = match record.manual_breaks.as_deref() {
        Some(manual) if !manual.is_empty() => (
            manual
                .iter()
                .map(|b| BreakSpan {
                    start: b.start,
                    end: b.end,
                })
                .collect(),
            BreakSource::Manual,
        ),
        _ => (
            record
                .breaks
                .iter()
                .map(|b| BreakSpan {
                    start: Some(b.start),
                    end: b.end,
                })
                .collect(),
            BreakSource::Punched,
        ),
    };

    EffectiveTimes {
        start: record.manual_start.or(record.start),
        end: record.manual_end.or(record.end),
        breaks,
        break_source,
    }
}
