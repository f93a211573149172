//! Attendance record model.
//!
//! One [`AttendanceRecord`] exists per (user, date). It carries the punched
//! clock times, the punched breaks, optional manual overrides entered by an
//! editor, and the planned schedule for the day.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::repository::Entity;

use super::timestamp;

/// A break recorded by the break-start and break-end actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunchedBreak {
    /// When the break started.
    #[serde(with = "timestamp")]
    pub start: DateTime<Utc>,
    /// When the break ended; absent while the break is in progress.
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

/// An editor-entered break that overrides the punched break at the same position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualBreak {
    /// The corrected start of the break.
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// The corrected end of the break.
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

/// A user's attendance for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Unique identifier, stable for the record's lifetime.
    pub id: i64,
    /// The owning user.
    pub user_id: String,
    /// The working date.
    pub date: NaiveDate,
    /// Punched clock-in time.
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// Punched clock-out time.
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    /// Punched breaks in the order they were taken.
    #[serde(default)]
    pub breaks: Vec<PunchedBreak>,
    /// Manual override of the clock-in time.
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub manual_start: Option<DateTime<Utc>>,
    /// Manual override of the clock-out time.
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub manual_end: Option<DateTime<Utc>>,
    /// Manual overrides of the breaks, by position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_breaks: Option<Vec<ManualBreak>>,
    /// Planned start of the shift (`HH:MM`, venue local time).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_start: Option<String>,
    /// Planned end of the shift (`HH:MM`, venue local time).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_end: Option<String>,
}

impl AttendanceRecord {
    /// Creates an empty record for a user and date.
    pub fn new(id: i64, user_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            date,
            start: None,
            end: None,
            breaks: Vec::new(),
            manual_start: None,
            manual_end: None,
            manual_breaks: None,
            planned_start: None,
            planned_end: None,
        }
    }

    /// Returns true if the user has clocked in and not yet clocked out.
    ///
    /// A record that only carries a schedule is not open.
    ///
    /// # Examples
    ///
    /// ```
    /// use venue_backoffice::models::{AttendanceRecord, parse_timestamp};
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
    /// let mut record = AttendanceRecord::new(1, "cast1", date);
    /// assert!(!record.is_open());
    ///
    /// record.start = parse_timestamp("2024-12-01T09:00:00Z");
    /// assert!(record.is_open());
    /// ```
    pub fn is_open(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }

    /// Returns true if the most recent punched break has not ended.
    pub fn is_on_break(&self) -> bool {
        self.breaks.last().is_some_and(|b| b.end.is_none())
    }

    /// Returns the planned shift as `"HH:MM - HH:MM"`, if a schedule exists.
    pub fn planned_range(&self) -> Option<String> {
        self.planned_start.as_ref().map(|start| {
            format!("{} - {}", start, self.planned_end.as_deref().unwrap_or(""))
        })
    }
}

impl Entity for AttendanceRecord {
    type Id = i64;
    const COLLECTION: &'static str = "attendances";

    fn id(&self) -> i64 {
        self.id
    }
}
