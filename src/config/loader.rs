//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::calendar::HolidayCalendar;
use crate::error::{EngineError, EngineResult};

use super::types::{CalendarFile, EngineConfig, PolicyFile, SchedulePolicy, TimePolicy};

/// Loads and provides access to the engine configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory,
/// validates them, and exposes the typed policy, schedule, and calendar.
///
/// # Directory Structure
///
/// ```text
/// config/engine/
/// ├── policy.yaml    # time policy + reconciliation schedule
/// └── calendar.yaml  # weekly rest day + fixed civil holidays
/// ```
///
/// # Example
///
/// ```no_run
/// use shift_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/engine").unwrap();
/// assert_eq!(loader.policy().base_shift_minutes, 480);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/engine")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Either required file is missing
    /// - Either file contains invalid YAML
    /// - Any field fails validation (unparsable time, unknown time zone or
    ///   weekday, inverted day window, non-positive durations)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy_path = path.join("policy.yaml");
        let policy_file = Self::load_yaml::<PolicyFile>(&policy_path)?;

        let calendar_path = path.join("calendar.yaml");
        let calendar_file = Self::load_yaml::<CalendarFile>(&calendar_path)?;

        let config = EngineConfig::from_raw(policy_file, calendar_file)?;

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying validated configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the time-accounting policy.
    pub fn policy(&self) -> &TimePolicy {
        self.config.policy()
    }

    /// Returns the reconciliation schedule.
    pub fn schedule(&self) -> &SchedulePolicy {
        self.config.schedule()
    }

    /// Returns the holiday calendar.
    pub fn calendar(&self) -> &HolidayCalendar {
        self.config.calendar()
    }
}
