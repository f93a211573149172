//! Application state for the back-office API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use chrono::FixedOffset;

use crate::config::ConfigLoader;
use crate::repository::Store;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded configuration and one persistence adapter per collection.
#[derive(Clone)]
pub struct AppState {
    /// The loaded configuration.
    config: Arc<ConfigLoader>,
    /// The persistence adapters.
    store: Store,
}

impl AppState {
    /// Creates application state from a configuration and a store.
    pub fn new(config: ConfigLoader, store: Store) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Creates application state with the store described by the configuration.
    pub fn from_config(config: ConfigLoader) -> Self {
        let store = Store::from_config(config.storage());
        Self::new(config, store)
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the persistence adapters.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Returns the venue's local UTC offset.
    pub fn offset(&self) -> FixedOffset {
        self.config.offset()
    }
}
