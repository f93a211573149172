//! Configuration loading and management for the back-office service.
//!
//! This module loads the service configuration from a YAML file: venue
//! settings (name, local UTC offset, default schedule), the HTTP bind
//! address, and the storage backend.
//!
//! # Example
//!
//! ```no_run
//! use venue_backoffice::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/backoffice.yaml").unwrap();
//! println!("Loaded venue: {}", config.venue().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{BackofficeConfig, ServerConfig, StorageConfig, VenueConfig};
