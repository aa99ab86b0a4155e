//! Aggregation of classified shifts.
//!
//! Pure reductions from classified shifts to per-operator and grand totals,
//! and to daily/monthly groupings. All sums run in integer minutes; hour
//! conversion happens in the reporting layer. Shifts without a clock-out
//! contribute zero minutes and an incremented incomplete count rather than
//! an error, so reports stay partial instead of failing.

use std::collections::BTreeMap;

use crate::models::{
    DailyOperatorTotal, MinuteTotals, MonthlyOperatorTotal, OperatorShift, YearMonth,
};

/// Per-operator and overall totals for one set of shifts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    /// Totals keyed by operator id.
    pub per_operator: BTreeMap<String, MinuteTotals>,
    /// Totals over all operators.
    pub grand: MinuteTotals,
}

/// Folds classified shifts into per-operator and grand totals.
///
/// The grand total is the recomputed sum of the per-operator minute totals,
/// so it is exact for any partition of the same shift set. An empty input
/// yields empty totals, not an error.
///
/// # Example
///
/// ```
/// use shift_engine::aggregation::aggregate;
///
/// let report = aggregate(&[]);
/// assert!(report.per_operator.is_empty());
/// assert_eq!(report.grand.worked_minutes, 0);
/// ```
pub fn aggregate(shifts: &[OperatorShift]) -> AggregateReport {
    let mut per_operator: BTreeMap<String, MinuteTotals> = BTreeMap::new();

    for shift in shifts {
        let totals = per_operator.entry(shift.operator_id.clone()).or_default();
        match &shift.classified {
            Some(classified) => totals.record(classified),
            None => totals.record_incomplete(),
        }
    }

    let mut grand = MinuteTotals::default();
    for totals in per_operator.values() {
        grand.merge(totals);
    }

    AggregateReport {
        per_operator,
        grand,
    }
}

/// Groups shifts into per-operator daily totals, ordered by operator then
/// date.
pub fn daily_totals(shifts: &[OperatorShift]) -> Vec<DailyOperatorTotal> {
    let mut grouped: BTreeMap<(String, chrono::NaiveDate), MinuteTotals> = BTreeMap::new();

    for shift in shifts {
        let totals = grouped
            .entry((shift.operator_id.clone(), shift.service_date))
            .or_default();
        match &shift.classified {
            Some(classified) => totals.record(classified),
            None => totals.record_incomplete(),
        }
    }

    grouped
        .into_iter()
        .map(|((operator_id, date), totals)| DailyOperatorTotal {
            operator_id,
            date,
            totals,
        })
        .collect()
}

/// Groups shifts into per-operator monthly totals, ordered by operator then
/// month.
///
/// The month key is the shift's service date truncated to year-month in the
/// civil calendar.
pub fn monthly_totals(shifts: &[OperatorShift]) -> Vec<MonthlyOperatorTotal> {
    let mut grouped: BTreeMap<(String, YearMonth), MinuteTotals> = BTreeMap::new();

    for shift in shifts {
        let totals = grouped
            .entry((
                shift.operator_id.clone(),
                YearMonth::from_date(shift.service_date),
            ))
            .or_default();
        match &shift.classified {
            Some(classified) => totals.record(classified),
            None => totals.record_incomplete(),
        }
    }

    grouped
        .into_iter()
        .map(|((operator_id, month), totals)| MonthlyOperatorTotal {
            operator_id,
            month,
            totals,
        })
        .collect()
}
