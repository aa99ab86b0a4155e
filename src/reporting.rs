//! Report assembly.
//!
//! Pure builders that turn raw shift records into the wire shapes of the
//! reporting endpoints: daily user/system hours, daily overtime buckets, and
//! per-operator monthly summaries. Everything here is fed from
//! [`ShiftRepository::list_shifts`](crate::repository::ShiftRepository) by
//! the API layer; nothing in this module performs I/O.
//!
//! Shifts without a clock-out never fail a report: they contribute zero
//! minutes and an explicit `incomplete` count.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregation::monthly_totals;
use crate::calculation::classify_shift;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{HourTotals, OperatorShift, ShiftRecord, minutes_to_hours};

/// Which pair of raw clock times feeds the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    /// The operator-entered `clock_in`/`clock_out` pair.
    Operator,
    /// The device-captured `captured_in`/`captured_out` pair.
    Capture,
}

/// Classifies a batch of records from one time source.
///
/// A record missing its clock-out becomes an [`OperatorShift`] with no
/// classification (counted as incomplete downstream). An unparsable clock
/// time is a real error and propagates.
pub fn classify_records(
    records: &[ShiftRecord],
    source: TimeSource,
    config: &EngineConfig,
) -> EngineResult<Vec<OperatorShift>> {
    let mut shifts = Vec::with_capacity(records.len());

    for record in records {
        let (clock_in, clock_out) = match source {
            TimeSource::Operator => (record.clock_in.as_str(), record.clock_out.as_deref()),
            TimeSource::Capture => (record.captured_in.as_str(), record.captured_out.as_deref()),
        };

        let classified = match classify_shift(
            clock_in,
            clock_out,
            record.break_minutes,
            record.service_date,
            config.calendar(),
            config.policy(),
        ) {
            Ok(classified) => Some(classified),
            Err(EngineError::IncompleteShift) => None,
            Err(err) => return Err(err),
        };

        shifts.push(OperatorShift {
            operator_id: record.operator_id.clone(),
            service_date: record.service_date,
            classified,
        });
    }

    Ok(shifts)
}

/// Worked hours for one operator on one date, from both time sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyHoursReport {
    /// The operator the report covers.
    pub operator_id: String,
    /// The civil calendar date the report covers.
    pub date: NaiveDate,
    /// Hours derived from the operator-entered clock times, after the fixed
    /// reporting deduction.
    pub worked_hours_user: Decimal,
    /// Hours derived from the device-captured timestamps, after the fixed
    /// reporting deduction.
    pub worked_hours_system: Decimal,
    /// Hours beyond the configured overtime threshold, computed from the
    /// deducted system total.
    pub overtime_hours: Decimal,
    /// Shifts on the date that have no clock-out.
    pub incomplete: u32,
}

/// Builds the daily hours report for one operator and date.
///
/// Both totals pass through the same classifier, merely fed different raw
/// times. The fixed across-the-board deduction
/// (`reporting_deduction_minutes`) is subtracted from each total, floored at
/// zero, before the overtime threshold is applied; the deduction is a
/// reporting-boundary policy constant, not part of classification.
pub fn daily_hours_report(
    records: &[ShiftRecord],
    operator_id: &str,
    date: NaiveDate,
    config: &EngineConfig,
) -> EngineResult<DailyHoursReport> {
    let policy = config.policy();

    let user_shifts = classify_records(records, TimeSource::Operator, config)?;
    let system_shifts = classify_records(records, TimeSource::Capture, config)?;

    let user_minutes: i64 = worked_minutes(&user_shifts);
    let system_minutes: i64 = worked_minutes(&system_shifts);
    let incomplete = user_shifts.iter().filter(|s| s.classified.is_none()).count() as u32;

    let deduction = policy.reporting_deduction_minutes;
    let user_deducted = (user_minutes - deduction).max(0);
    let system_deducted = (system_minutes - deduction).max(0);

    let threshold_minutes = i64::from(policy.overtime_threshold_hours) * 60;
    let overtime_minutes = (system_deducted - threshold_minutes).max(0);

    Ok(DailyHoursReport {
        operator_id: operator_id.to_string(),
        date,
        worked_hours_user: minutes_to_hours(user_deducted),
        worked_hours_system: minutes_to_hours(system_deducted),
        overtime_hours: minutes_to_hours(overtime_minutes),
        incomplete,
    })
}

/// Extra-hour buckets for one operator on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeReport {
    /// The operator the report covers.
    pub operator_id: String,
    /// The civil calendar date the report covers.
    pub date: NaiveDate,
    /// Extra hours inside the day window.
    pub extra_day_hours: Decimal,
    /// Extra hours outside the day window.
    pub extra_night_hours: Decimal,
    /// Worked hours on a holiday service date.
    pub extra_holiday_hours: Decimal,
    /// Weekday of the date (e.g. "Mon").
    pub day_of_week: String,
    /// Whether the date is a rest day per the holiday calendar.
    pub is_holiday: bool,
    /// Shifts on the date that have no clock-out.
    pub incomplete: u32,
}

/// Builds the overtime report for one operator and date from the
/// operator-entered clock times.
pub fn overtime_report(
    records: &[ShiftRecord],
    operator_id: &str,
    date: NaiveDate,
    config: &EngineConfig,
) -> EngineResult<OvertimeReport> {
    use chrono::Datelike;

    let shifts = classify_records(records, TimeSource::Operator, config)?;

    let mut day_extra = 0;
    let mut night_extra = 0;
    let mut holiday_extra = 0;
    let mut incomplete = 0;
    for shift in &shifts {
        match &shift.classified {
            Some(classified) => {
                day_extra += classified.day_extra_minutes;
                night_extra += classified.night_extra_minutes;
                holiday_extra += classified.holiday_extra_minutes;
            }
            None => incomplete += 1,
        }
    }

    Ok(OvertimeReport {
        operator_id: operator_id.to_string(),
        date,
        extra_day_hours: minutes_to_hours(day_extra),
        extra_night_hours: minutes_to_hours(night_extra),
        extra_holiday_hours: minutes_to_hours(holiday_extra),
        day_of_week: date.weekday().to_string(),
        is_holiday: config.calendar().is_holiday(date),
        incomplete,
    })
}

/// One operator's totals for one civil month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// The operator the summary covers.
    pub operator_id: String,
    /// The civil year-month, formatted `YYYY-MM`.
    pub month: String,
    /// The operator's totals for the month, in hours.
    pub totals: HourTotals,
}

/// Builds per-operator monthly summaries from the operator-entered clock
/// times, grouped by the service date's civil year-month.
pub fn monthly_summaries(
    records: &[ShiftRecord],
    config: &EngineConfig,
) -> EngineResult<Vec<MonthlySummary>> {
    let shifts = classify_records(records, TimeSource::Operator, config)?;

    Ok(monthly_totals(&shifts)
        .into_iter()
        .map(|monthly| MonthlySummary {
            operator_id: monthly.operator_id,
            month: monthly.month.to_string(),
            totals: monthly.totals.to_hours(),
        })
        .collect())
}

fn worked_minutes(shifts: &[OperatorShift]) -> i64 {
    shifts
        .iter()
        .filter_map(|s| s.classified.as_ref())
        .map(|c| c.worked_minutes)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use std::str::FromStr;

    fn config() -> EngineConfig {
        ConfigLoader::load("./config/engine")
            .expect("Failed to load config")
            .config()
            .clone()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(
        operator_id: &str,
        service_date: &str,
        clock_in: &str,
        clock_out: Option<&str>,
    ) -> ShiftRecord {
        ShiftRecord {
            id: format!("rec_{}_{}", operator_id, service_date),
            operator_id: operator_id.to_string(),
            service_date: date(service_date),
            clock_in: clock_in.to_string(),
            clock_out: clock_out.map(str::to_string),
            captured_in: format!("{}:00", clock_in),
            captured_out: clock_out.map(|c| format!("{}:00", c)),
            break_minutes: 0,
        }
    }

    // ==========================================================================
    // RP-001: user and system hours agree when both sources agree
    // ==========================================================================
    #[test]
    fn test_rp_001_daily_hours_with_matching_sources() {
        let cfg = config();
        // Monday 06:00-18:00: 720 worked minutes, minus the 60-minute
        // deduction = 660 -> 11.00 hours.
        let records = vec![record("op_001", "2026-03-09", "06:00", Some("18:00"))];

        let report = daily_hours_report(&records, "op_001", date("2026-03-09"), &cfg).unwrap();
        assert_eq!(report.worked_hours_user, dec("11.00"));
        assert_eq!(report.worked_hours_system, dec("11.00"));
        // 660 deducted minutes against the 480-minute threshold: 3 hours.
        assert_eq!(report.overtime_hours, dec("3.00"));
        assert_eq!(report.incomplete, 0);
    }

    // ==========================================================================
    // RP-002: sources diverge when the entered times differ from captures
    // ==========================================================================
    #[test]
    fn test_rp_002_daily_hours_with_diverging_sources() {
        let cfg = config();
        let mut rec = record("op_001", "2026-03-09", "07:00", Some("16:00"));
        // The device captured a later arrival than the operator entered.
        rec.captured_in = "07:30:00".to_string();

        let report = daily_hours_report(&[rec], "op_001", date("2026-03-09"), &cfg).unwrap();
        // User: 540 - 60 = 480 min. System: 510 - 60 = 450 min.
        assert_eq!(report.worked_hours_user, dec("8.00"));
        assert_eq!(report.worked_hours_system, dec("7.50"));
    }

    // ==========================================================================
    // RP-003: deduction floors at zero
    // ==========================================================================
    #[test]
    fn test_rp_003_deduction_floors_at_zero() {
        let cfg = config();
        let records = vec![record("op_001", "2026-03-09", "08:00", Some("08:30"))];

        let report = daily_hours_report(&records, "op_001", date("2026-03-09"), &cfg).unwrap();
        assert_eq!(report.worked_hours_user, dec("0.00"));
        assert_eq!(report.overtime_hours, dec("0.00"));
    }

    // ==========================================================================
    // RP-004: open shift yields a partial report, not an error
    // ==========================================================================
    #[test]
    fn test_rp_004_open_shift_counts_as_incomplete() {
        let cfg = config();
        let records = vec![
            record("op_001", "2026-03-09", "06:00", Some("14:00")),
            record("op_001", "2026-03-09", "15:00", None),
        ];

        let report = daily_hours_report(&records, "op_001", date("2026-03-09"), &cfg).unwrap();
        // Only the closed shift contributes: 480 - 60 = 420 min.
        assert_eq!(report.worked_hours_user, dec("7.00"));
        assert_eq!(report.incomplete, 1);
    }

    // ==========================================================================
    // RP-005: unparsable time is surfaced, not swallowed
    // ==========================================================================
    #[test]
    fn test_rp_005_invalid_time_propagates() {
        let cfg = config();
        let records = vec![record("op_001", "2026-03-09", "6 en punto", Some("18:00"))];

        let result = daily_hours_report(&records, "op_001", date("2026-03-09"), &cfg);
        assert!(matches!(result, Err(EngineError::InvalidTimeFormat { .. })));
    }

    #[test]
    fn test_overtime_report_buckets() {
        let cfg = config();
        // Tuesday 10:00-23:00: 480 normal, 180 day extra, 120 night extra.
        let records = vec![record("op_001", "2026-03-10", "10:00", Some("23:00"))];

        let report = overtime_report(&records, "op_001", date("2026-03-10"), &cfg).unwrap();
        assert_eq!(report.extra_day_hours, dec("3.00"));
        assert_eq!(report.extra_night_hours, dec("2.00"));
        assert_eq!(report.extra_holiday_hours, dec("0.00"));
        assert_eq!(report.day_of_week, "Tue");
        assert!(!report.is_holiday);
        assert_eq!(report.incomplete, 0);
    }

    #[test]
    fn test_overtime_report_on_holiday() {
        let cfg = config();
        // 2026-07-20 (Independence Day) falls on a Monday.
        let records = vec![record("op_001", "2026-07-20", "08:00", Some("12:00"))];

        let report = overtime_report(&records, "op_001", date("2026-07-20"), &cfg).unwrap();
        assert_eq!(report.extra_holiday_hours, dec("4.00"));
        assert_eq!(report.extra_day_hours, dec("0.00"));
        assert!(report.is_holiday);
        assert_eq!(report.day_of_week, "Mon");
    }

    #[test]
    fn test_overtime_report_empty_day_is_zeroes() {
        let cfg = config();
        let report = overtime_report(&[], "op_001", date("2026-03-09"), &cfg).unwrap();
        assert_eq!(report.extra_day_hours, dec("0.00"));
        assert_eq!(report.incomplete, 0);
    }

    #[test]
    fn test_monthly_summaries_group_and_convert() {
        let cfg = config();
        let records = vec![
            record("op_001", "2026-03-09", "06:00", Some("18:00")),
            record("op_001", "2026-03-10", "06:00", Some("14:00")),
            record("op_001", "2026-04-01", "06:00", Some("14:00")),
            record("op_002", "2026-03-09", "07:00", None),
        ];

        let summaries = monthly_summaries(&records, &cfg).unwrap();
        assert_eq!(summaries.len(), 3);

        let march_op1 = &summaries[0];
        assert_eq!(march_op1.operator_id, "op_001");
        assert_eq!(march_op1.month, "2026-03");
        // 720 + 480 worked minutes = 20 hours.
        assert_eq!(march_op1.totals.worked_hours, dec("20.00"));
        assert_eq!(march_op1.totals.extra_day_hours, dec("4.00"));
        assert_eq!(march_op1.totals.total_extra_hours, dec("4.00"));

        let april_op1 = &summaries[1];
        assert_eq!(april_op1.month, "2026-04");
        assert_eq!(april_op1.totals.worked_hours, dec("8.00"));

        let march_op2 = &summaries[2];
        assert_eq!(march_op2.operator_id, "op_002");
        assert_eq!(march_op2.totals.incomplete, 1);
        assert_eq!(march_op2.totals.worked_hours, dec("0.00"));
    }

    #[test]
    fn test_classify_records_capture_source_uses_captured_times() {
        let cfg = config();
        let mut rec = record("op_001", "2026-03-09", "06:00", Some("18:00"));
        rec.captured_out = None;

        let user = classify_records(std::slice::from_ref(&rec), TimeSource::Operator, &cfg).unwrap();
        let system = classify_records(std::slice::from_ref(&rec), TimeSource::Capture, &cfg).unwrap();

        assert!(user[0].classified.is_some());
        assert!(system[0].classified.is_none());
    }
}
