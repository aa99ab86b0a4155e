//! Error types for the shift accounting engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during shift classification,
//! reporting, and reconciliation.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the shift accounting engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use shift_engine::error::EngineError;
///
/// let error = EngineError::InvalidTimeFormat {
///     value: "25:99".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid clock time: '25:99'");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A clock-in or clock-out value could not be parsed as a time of day.
    #[error("Invalid clock time: '{value}'")]
    InvalidTimeFormat {
        /// The raw value that failed to parse.
        value: String,
    },

    /// The shift has a clock-in but no clock-out.
    ///
    /// Recoverable: reporting treats the shift as zero worked minutes and
    /// counts it as incomplete, and the reconciliation job may later fill
    /// the clock-out in.
    #[error("Shift has no clock-out time")]
    IncompleteShift,

    /// The shift repository failed to read or write a record.
    #[error("Repository error: {message}")]
    Repository {
        /// A description of the store failure.
        message: String,
    },

    /// More than one open shift was found for an operator on one date.
    ///
    /// The ingestion layer is supposed to prevent this; reconciliation
    /// handles it defensively by correcting only the earliest clock-in.
    #[error("Found {count} open shifts for operator '{operator_id}' on {date}")]
    AmbiguousOpenShift {
        /// The operator with multiple open shifts.
        operator_id: String,
        /// The service date the open shifts belong to.
        date: NaiveDate,
        /// How many open shifts were found.
        count: usize,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse or validation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
