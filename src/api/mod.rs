//! HTTP API module for the shift accounting engine.
//!
//! This module provides the REST endpoints for the reporting surfaces and
//! the administrative reconciliation trigger.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{MonthlyReportResponse, ReconcileResponse, create_router};
pub use request::{DailyReportRequest, MonthlyReportRequest, ReconcileRequest};
pub use response::ApiError;
pub use state::AppState;
