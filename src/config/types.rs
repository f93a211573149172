//! Configuration types for the back-office service.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file.

use chrono::FixedOffset;
use serde::Deserialize;
use std::path::PathBuf;

fn default_schedule_start() -> String {
    "09:00".to_string()
}

fn default_schedule_end() -> String {
    "18:00".to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

/// Settings describing the venue itself.
#[derive(Debug, Clone, Deserialize)]
pub struct VenueConfig {
    /// Display name of the venue.
    pub name: String,
    /// The venue's offset from UTC in minutes (Japan Standard Time is 540).
    pub utc_offset_minutes: i32,
    /// Planned start used when a schedule is added without one (`HH:MM`).
    #[serde(default = "default_schedule_start")]
    pub default_schedule_start: String,
    /// Planned end used when a schedule is added without one (`HH:MM`).
    #[serde(default = "default_schedule_end")]
    pub default_schedule_end: String,
}

impl VenueConfig {
    /// Returns the venue's UTC offset, or `None` if it is out of range.
    pub fn offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes.checked_mul(60)?)
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// Where documents are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageConfig {
    /// In process; contents are lost on restart.
    #[default]
    Memory,
    /// One JSON file per collection.
    JsonFile {
        /// Directory holding the collection files.
        data_dir: PathBuf,
    },
}

/// The complete configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct BackofficeConfig {
    /// Venue settings.
    pub venue: VenueConfig,
    /// Server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
}
