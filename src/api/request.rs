//! Request types for the shift accounting engine API.
//!
//! This module defines the JSON request structures for the reporting and
//! reconciliation endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Request body for the per-operator daily endpoints
/// (`/reports/hours`, `/reports/overtime`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReportRequest {
    /// The operator the report covers.
    pub operator_id: String,
    /// The civil calendar date the report covers.
    pub date: NaiveDate,
}

/// Request body for the `/reports/monthly` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReportRequest {
    /// First service date to include (inclusive).
    pub start_date: NaiveDate,
    /// Last service date to include (inclusive).
    pub end_date: NaiveDate,
    /// Optional operator filter; empty means all operators in range.
    #[serde(default)]
    pub operator_ids: Vec<String>,
}

/// Request body for the administrative `/reconcile` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileRequest {
    /// The date to reconcile; defaults to yesterday in the civil time zone.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}
