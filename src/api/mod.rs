//! HTTP API for the venue back office.
//!
//! Exposes attendance punching and summaries alongside the customer, bottle
//! keep, sales and user registers as JSON endpoints. The acting user is
//! identified by the [`USER_ID_HEADER`] header.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{USER_ID_HEADER, create_router};
pub use request::{
    AttendanceQuery, CustomerQuery, PunchRequest, ScheduleRequest, SearchQuery, UserQuery,
};
pub use response::{ApiError, ApiErrorResponse, BillView, HealthResponse, MonthlyTotalResponse};
pub use state::AppState;
