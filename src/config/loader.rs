//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the service
//! configuration from a YAML file.

use chrono::{FixedOffset, NaiveTime};
use std::fs;
use std::path::Path;

use crate::error::{BackofficeError, BackofficeResult};

use super::types::{BackofficeConfig, ServerConfig, StorageConfig, VenueConfig};

/// Loads and provides access to the service configuration.
///
/// # File Layout
///
/// ```text
/// venue:
///   name: Club Example
///   utc_offset_minutes: 540
///   default_schedule_start: "09:00"
///   default_schedule_end: "18:00"
/// server:
///   bind_address: 127.0.0.1:8080
/// storage:
///   kind: json_file
///   data_dir: ./data
/// ```
///
/// # Example
///
/// ```no_run
/// use venue_backoffice::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/backoffice.yaml").unwrap();
/// println!("Loaded venue: {}", loader.venue().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: BackofficeConfig,
    offset: FixedOffset,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file is not valid YAML, lacks a required field, or holds an
    ///   out-of-range value (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> BackofficeResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| BackofficeError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Builds a loader from YAML text, for embedded or generated configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use venue_backoffice::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::from_yaml_str(
    ///     "venue:\n  name: Club Example\n  utc_offset_minutes: 540\n",
    /// )?;
    /// assert_eq!(loader.offset().local_minus_utc(), 9 * 3600);
    /// # Ok::<(), venue_backoffice::error::BackofficeError>(())
    /// ```
    pub fn from_yaml_str(content: &str) -> BackofficeResult<Self> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, path: &str) -> BackofficeResult<Self> {
        let parse_error = |message: String| BackofficeError::ConfigParseError {
            path: path.to_string(),
            message,
        };

        let config: BackofficeConfig =
            serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;

        let offset = config.venue.offset().ok_or_else(|| {
            parse_error(format!(
                "utc_offset_minutes out of range: {}",
                config.venue.utc_offset_minutes
            ))
        })?;

        for (field, value) in [
            ("default_schedule_start", &config.venue.default_schedule_start),
            ("default_schedule_end", &config.venue.default_schedule_end),
        ] {
            if NaiveTime::parse_from_str(value, "%H:%M").is_err() {
                return Err(parse_error(format!("{field} is not HH:MM: {value}")));
            }
        }

        Ok(Self { config, offset })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &BackofficeConfig {
        &self.config
    }

    /// Returns the venue settings.
    pub fn venue(&self) -> &VenueConfig {
        &self.config.venue
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerConfig {
        &self.config.server
    }

    /// Returns the storage settings.
    pub fn storage(&self) -> &StorageConfig {
        &self.config.storage
    }

    /// Returns the venue's local UTC offset.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}
