//! Shared application state
//!
//! One `AppState` is built at startup and handed to every handler through
//! `web::Data`. It owns the storage backend and the change event publisher.

use std::sync::Arc;

use teamgrid_core::service::ScheduleChangeEventPublisher;
use teamgrid_persistence::ScheduleStore;

use super::config::Configuration;

/// Application state shared across all HTTP handlers
pub struct AppState {
    pub configuration: Configuration,
    pub store: Arc<dyn ScheduleStore>,
    pub publisher: Arc<ScheduleChangeEventPublisher>,
}

impl AppState {
    pub fn new(
        configuration: Configuration,
        store: Arc<dyn ScheduleStore>,
        publisher: Arc<ScheduleChangeEventPublisher>,
    ) -> Self {
        Self {
            configuration,
            store,
            publisher,
        }
    }

    /// The storage backend as a trait object
    pub fn store(&self) -> &dyn ScheduleStore {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("configuration", &self.configuration)
            .field("store", &self.store.storage_mode())
            .field("publisher", &"<ScheduleChangeEventPublisher>")
            .finish()
    }
}
