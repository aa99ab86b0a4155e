//! HTTP request handlers for the shift accounting engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::DateRange;
use crate::reconciliation::{ReconciledShift, civil_today, reconcile_date};
use crate::reporting::{
    DailyHoursReport, MonthlySummary, OvertimeReport, daily_hours_report, monthly_summaries,
    overtime_report,
};

use super::request::{DailyReportRequest, MonthlyReportRequest, ReconcileRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Response body of the `/reports/monthly` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReportResponse {
    /// Per-operator, per-month summaries, ordered by operator then month.
    pub summaries: Vec<MonthlySummary>,
}

/// Response body of the `/reconcile` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileResponse {
    /// The date that was reconciled.
    pub date: NaiveDate,
    /// The records that received a synthetic clock-out.
    pub corrected: Vec<ReconciledShift>,
}

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/reports/hours", post(hours_handler))
        .route("/reports/overtime", post(overtime_handler))
        .route("/reports/monthly", post(monthly_handler))
        .route("/reconcile", post(reconcile_handler))
        .with_state(state)
}

/// Unwraps a JSON body, turning axum rejections into the API error shape.
fn parse_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, Response> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // Get the body text which contains the detailed error from serde
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => ApiError::new(
                    "MISSING_CONTENT_TYPE",
                    "Content-Type must be application/json",
                ),
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err((
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response())
        }
    }
}

fn engine_error_response(err: crate::error::EngineError, correlation_id: Uuid) -> Response {
    warn!(correlation_id = %correlation_id, error = %err, "Request failed");
    let api_error: ApiErrorResponse = err.into();
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

fn ok_json<T: Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Handler for POST /reports/hours.
///
/// Returns worked hours for one operator and date from both time sources
/// (operator-entered and device-captured), after the fixed reporting
/// deduction.
async fn hours_handler(
    State(state): State<AppState>,
    payload: Result<Json<DailyReportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing daily hours request");

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let records = match state
        .repository()
        .list_shifts(&request.operator_id, DateRange::single(request.date))
        .await
    {
        Ok(records) => records,
        Err(err) => return engine_error_response(err, correlation_id),
    };

    match daily_hours_report(
        &records,
        &request.operator_id,
        request.date,
        state.config().config(),
    ) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                operator_id = %report.operator_id,
                worked_hours_user = %report.worked_hours_user,
                worked_hours_system = %report.worked_hours_system,
                incomplete = report.incomplete,
                "Daily hours report built"
            );
            ok_json::<DailyHoursReport>(report)
        }
        Err(err) => engine_error_response(err, correlation_id),
    }
}

/// Handler for POST /reports/overtime.
///
/// Returns the extra-hour buckets for one operator and date.
async fn overtime_handler(
    State(state): State<AppState>,
    payload: Result<Json<DailyReportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing overtime request");

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let records = match state
        .repository()
        .list_shifts(&request.operator_id, DateRange::single(request.date))
        .await
    {
        Ok(records) => records,
        Err(err) => return engine_error_response(err, correlation_id),
    };

    match overtime_report(
        &records,
        &request.operator_id,
        request.date,
        state.config().config(),
    ) {
        Ok(report) => ok_json::<OvertimeReport>(report),
        Err(err) => engine_error_response(err, correlation_id),
    }
}

/// Handler for POST /reports/monthly.
///
/// Returns per-operator monthly summaries for a date range, optionally
/// filtered to specific operators.
async fn monthly_handler(
    State(state): State<AppState>,
    payload: Result<Json<MonthlyReportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let start_time = Instant::now();
    info!(correlation_id = %correlation_id, "Processing monthly summary request");

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    if request.start_date > request.end_date {
        warn!(
            correlation_id = %correlation_id,
            start_date = %request.start_date,
            end_date = %request.end_date,
            "Invalid date range"
        );
        return (
            StatusCode::BAD_REQUEST,
            [(header::CONTENT_TYPE, "application/json")],
            Json(ApiError::validation_error(format!(
                "start_date {} is after end_date {}",
                request.start_date, request.end_date
            ))),
        )
            .into_response();
    }

    let range = DateRange::new(request.start_date, request.end_date);
    let records = if request.operator_ids.is_empty() {
        state.repository().list_shifts_in_range(range).await
    } else {
        let mut all = Vec::new();
        let mut failure = None;
        for operator_id in &request.operator_ids {
            match state.repository().list_shifts(operator_id, range).await {
                Ok(records) => all.extend(records),
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }
        match failure {
            Some(err) => Err(err),
            None => Ok(all),
        }
    };

    let records = match records {
        Ok(records) => records,
        Err(err) => return engine_error_response(err, correlation_id),
    };

    match monthly_summaries(&records, state.config().config()) {
        Ok(summaries) => {
            info!(
                correlation_id = %correlation_id,
                operator_count = summaries.len(),
                shifts_count = records.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Monthly summaries built"
            );
            ok_json(MonthlyReportResponse { summaries })
        }
        Err(err) => engine_error_response(err, correlation_id),
    }
}

/// Handler for POST /reconcile.
///
/// Administrative trigger into the same idempotent reconciliation operation
/// the scheduler uses. The date defaults to yesterday in the civil time
/// zone.
async fn reconcile_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReconcileRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing reconcile request");

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let date = request
        .date
        .unwrap_or_else(|| civil_today(state.config().schedule()) - Duration::days(1));

    match reconcile_date(state.repository(), date, state.config().policy()).await {
        Ok(corrected) => {
            info!(
                correlation_id = %correlation_id,
                %date,
                corrected_count = corrected.len(),
                "Reconciliation completed"
            );
            ok_json(ReconcileResponse { date, corrected })
        }
        Err(err) => engine_error_response(err, correlation_id),
    }
}
