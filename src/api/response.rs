//! Response types for the back-office API.
//!
//! This module defines the response bodies, the error response structure,
//! and the mapping from [`BackofficeError`] to HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BackofficeError;
use crate::models::Bill;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<BackofficeError> for ApiErrorResponse {
    fn from(error: BackofficeError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            BackofficeError::ConfigNotFound { .. } | BackofficeError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            BackofficeError::Persistence { collection, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "PERSISTENCE_ERROR",
                    format!("Failed to access '{collection}'"),
                    message,
                ),
            ),
            BackofficeError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
            }
            BackofficeError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                ApiError::with_details(
                    "UNAUTHENTICATED",
                    message,
                    "Send the id of a registered user in the x-user-id header",
                ),
            ),
            BackofficeError::Forbidden { .. } => {
                (StatusCode::FORBIDDEN, ApiError::new("FORBIDDEN", message))
            }
            BackofficeError::Validation { field, .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details("VALIDATION_ERROR", message, field),
            ),
            BackofficeError::AlreadyClockedIn { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("ALREADY_CLOCKED_IN", message),
            ),
            BackofficeError::NotClockedIn { .. } => {
                (StatusCode::CONFLICT, ApiError::new("NOT_CLOCKED_IN", message))
            }
            BackofficeError::AlreadyOnBreak { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("ALREADY_ON_BREAK", message),
            ),
            BackofficeError::NotOnBreak { .. } => {
                (StatusCode::CONFLICT, ApiError::new("NOT_ON_BREAK", message))
            }
        };
        ApiErrorResponse { status, error }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// The configured venue name.
    pub venue: String,
    /// Crate version.
    pub version: String,
}

/// A bill as listed, with its total and customer label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillView {
    /// The stored bill.
    #[serde(flatten)]
    pub bill: Bill,
    /// `"<name> (<id>)"` of the billed customer, empty if unknown.
    pub customer: String,
    /// Sum of the bill lines.
    pub total: Decimal,
}

/// Body of `GET /bills/monthly-total`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotalResponse {
    /// The cast name the bills are credited to.
    pub cast: String,
    /// The month as `YYYY-MM` in venue time.
    pub month: String,
    /// Sum of the month's bills.
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (BackofficeError::Unauthenticated, StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            (BackofficeError::forbidden("no"), StatusCode::FORBIDDEN, "FORBIDDEN"),
            (
                BackofficeError::validation("name", "name is required"),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                BackofficeError::NotFound {
                    collection: "customers".to_string(),
                    id: "1".to_string(),
                },
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
            ),
            (
                BackofficeError::persistence("bills", "disk full"),
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_ERROR",
            ),
            (
                BackofficeError::AlreadyClockedIn {
                    user_id: "cast1".to_string(),
                    date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
                },
                StatusCode::CONFLICT,
                "ALREADY_CLOCKED_IN",
            ),
            (
                BackofficeError::NotOnBreak {
                    user_id: "cast1".to_string(),
                },
                StatusCode::CONFLICT,
                "NOT_ON_BREAK",
            ),
        ];

        for (error, status, code) in cases {
            let response: ApiErrorResponse = error.into();
            assert_eq!(response.status, status);
            assert_eq!(response.error.code, code);
        }
    }

    #[test]
    fn test_validation_details_name_the_field() {
        let response: ApiErrorResponse = BackofficeError::validation("email", "bad").into();
        assert_eq!(response.error.details.as_deref(), Some("email"));
    }
}
