//! Configuration loading and management for the shift accounting engine.
//!
//! This module provides functionality to load the engine configuration from
//! YAML files: the time policy (base quota, day window, default shift
//! duration), the reconciliation schedule, and the holiday calendar.
//!
//! # Example
//!
//! ```no_run
//! use shift_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/engine").unwrap();
//! println!("Base quota: {} minutes", config.policy().base_shift_minutes);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineConfig, SchedulePolicy, TimePolicy};
