//! Request types for the back-office API.
//!
//! Entity drafts that double as request bodies live with their listings
//! (for example [`crate::listing::CustomerDraft`]); this module holds the
//! bodies and query strings specific to the HTTP surface.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::listing::CustomerSort;
use crate::models::Role;

/// Body of the clock-in, break-start, break-end and clock-out endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunchRequest {
    /// The user punching; must be the caller when present.
    #[serde(default)]
    pub user_id: Option<String>,
    /// The working date; today in the venue's time zone when absent.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Body of the schedule endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    /// The scheduled user; the caller when absent.
    #[serde(default)]
    pub user_id: Option<String>,
    /// The scheduled date.
    pub date: NaiveDate,
    /// Planned start (`HH:MM`); the venue default when absent.
    #[serde(default)]
    pub planned_start: Option<String>,
    /// Planned end (`HH:MM`); the venue default when absent.
    #[serde(default)]
    pub planned_end: Option<String>,
}

/// Query string of `GET /attendance`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQuery {
    /// Whose attendance to show; the caller when absent.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Query string of the plain list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    /// Free-text search.
    #[serde(default)]
    pub search: Option<String>,
}

/// Query string of `GET /customers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerQuery {
    /// Free-text search over name, tags and favourite drink.
    #[serde(default)]
    pub search: Option<String>,
    /// Ordering of the list.
    #[serde(default)]
    pub sort: CustomerSort,
}

/// Query string of `GET /users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    /// Only users with this role.
    #[serde(default)]
    pub role: Option<Role>,
}
