//! Application state for the shift accounting engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::repository::ShiftRepository;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded configuration and the injected shift repository.
#[derive(Clone)]
pub struct AppState {
    /// The loaded engine configuration.
    config: Arc<ConfigLoader>,
    /// The shift store the engine reads from and reconciles against.
    repository: Arc<dyn ShiftRepository>,
}

impl AppState {
    /// Creates a new application state from a configuration loader and a
    /// repository implementation.
    pub fn new(config: ConfigLoader, repository: Arc<dyn ShiftRepository>) -> Self {
        Self {
            config: Arc::new(config),
            repository,
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the shift repository.
    pub fn repository(&self) -> &dyn ShiftRepository {
        self.repository.as_ref()
    }

    /// Returns a cloneable handle to the shift repository, for spawning the
    /// reconciliation scheduler next to the server.
    pub fn repository_handle(&self) -> Arc<dyn ShiftRepository> {
        Arc::clone(&self.repository)
    }
}
