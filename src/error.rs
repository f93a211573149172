//! Error types for the venue back-office service.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the service can report. Missing attendance data is not
//! an error: the accounting functions resolve it to the `"-"` sentinel.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the back-office service.
///
/// # Example
///
/// ```
/// use venue_backoffice::error::BackofficeError;
///
/// let error = BackofficeError::ConfigNotFound {
///     path: "/missing/backoffice.yaml".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Configuration file not found: /missing/backoffice.yaml"
/// );
/// ```
#[derive(Debug, Error)]
pub enum BackofficeError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A persistence adapter call failed.
    #[error("Persistence failure in '{collection}': {message}")]
    Persistence {
        /// The collection the call was made against.
        collection: String,
        /// A description of the failure.
        message: String,
    },

    /// A document with the given id does not exist.
    #[error("No document '{id}' in '{collection}'")]
    NotFound {
        /// The collection that was searched.
        collection: String,
        /// The id that was requested.
        id: String,
    },

    /// No identity accompanied the request.
    #[error("Authentication required")]
    Unauthenticated,

    /// The acting user lacks the role required for the action.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// What was refused.
        message: String,
    },

    /// An input field failed validation.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// Clock-in was requested while a record for the day is still open.
    #[error("User '{user_id}' is already clocked in on {date}")]
    AlreadyClockedIn {
        /// The user who tried to clock in.
        user_id: String,
        /// The working date.
        date: NaiveDate,
    },

    /// A break or clock-out was requested without an open record.
    #[error("User '{user_id}' is not clocked in on {date}")]
    NotClockedIn {
        /// The user who made the request.
        user_id: String,
        /// The working date.
        date: NaiveDate,
    },

    /// A break was started while another break is in progress.
    #[error("User '{user_id}' is already on a break")]
    AlreadyOnBreak {
        /// The user who made the request.
        user_id: String,
    },

    /// A break was ended while no break is in progress.
    #[error("User '{user_id}' is not on a break")]
    NotOnBreak {
        /// The user who made the request.
        user_id: String,
    },
}

impl BackofficeError {
    /// Shorthand for a [`BackofficeError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`BackofficeError::Persistence`] error.
    pub fn persistence(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persistence {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`BackofficeError::Forbidden`] error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return BackofficeError.
pub type BackofficeResult<T> = Result<T, BackofficeError>;
