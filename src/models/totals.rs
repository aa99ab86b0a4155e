//! Aggregated shift totals.
//!
//! Totals are accumulated in integer minutes ([`MinuteTotals`]) and converted
//! to decimal hours ([`HourTotals`]) only at the reporting boundary, so no
//! rounding error can accumulate across shifts. Hour values are rounded to
//! two decimal places using round-half-up.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::classified_shift::ClassifiedShift;

/// Converts a minute count to hours rounded to two decimal places.
///
/// Rounding uses round-half-up (midpoint away from zero), applied once at
/// the reporting boundary.
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    let mut hours = (Decimal::new(minutes, 0) / Decimal::new(60, 0))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // Exact quotients come back at a smaller scale; pin two decimals so the
    // wire format is uniform.
    hours.rescale(2);
    hours
}

/// Running totals for a set of shifts, in integer minutes.
///
/// The unit of accumulation for the aggregator. `incomplete` counts shifts
/// that had no clock-out and therefore contributed zero minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinuteTotals {
    /// Total worked minutes.
    pub worked_minutes: i64,
    /// Minutes inside the base quota.
    pub normal_minutes: i64,
    /// Extra minutes inside the day window.
    pub day_extra_minutes: i64,
    /// Extra minutes outside the day window.
    pub night_extra_minutes: i64,
    /// Worked minutes on holiday service dates.
    pub holiday_extra_minutes: i64,
    /// Shifts with a clock-in but no clock-out.
    pub incomplete: u32,
}

impl MinuteTotals {
    /// Folds one classified shift into the totals.
    pub fn record(&mut self, shift: &ClassifiedShift) {
        self.worked_minutes += shift.worked_minutes;
        self.normal_minutes += shift.normal_minutes;
        self.day_extra_minutes += shift.day_extra_minutes;
        self.night_extra_minutes += shift.night_extra_minutes;
        self.holiday_extra_minutes += shift.holiday_extra_minutes;
    }

    /// Counts one shift that lacked a clock-out.
    pub fn record_incomplete(&mut self) {
        self.incomplete += 1;
    }

    /// Folds another totals value into this one.
    pub fn merge(&mut self, other: &MinuteTotals) {
        self.worked_minutes += other.worked_minutes;
        self.normal_minutes += other.normal_minutes;
        self.day_extra_minutes += other.day_extra_minutes;
        self.night_extra_minutes += other.night_extra_minutes;
        self.holiday_extra_minutes += other.holiday_extra_minutes;
        self.incomplete += other.incomplete;
    }

    /// Converts to hour totals, rounding each value at this boundary only.
    pub fn to_hours(&self) -> HourTotals {
        let extra_day_hours = minutes_to_hours(self.day_extra_minutes);
        let extra_night_hours = minutes_to_hours(self.night_extra_minutes);
        let extra_holiday_hours = minutes_to_hours(self.holiday_extra_minutes);
        HourTotals {
            worked_hours: minutes_to_hours(self.worked_minutes),
            normal_hours: minutes_to_hours(self.normal_minutes),
            extra_day_hours,
            extra_night_hours,
            extra_holiday_hours,
            // Sum of the rounded parts, so total == sum(parts) holds exactly
            // on the wire.
            total_extra_hours: extra_day_hours + extra_night_hours + extra_holiday_hours,
            incomplete: self.incomplete,
        }
    }
}

/// Shift totals converted to decimal hours for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourTotals {
    /// Total worked hours.
    pub worked_hours: Decimal,
    /// Hours inside the base quota.
    pub normal_hours: Decimal,
    /// Extra hours inside the day window.
    pub extra_day_hours: Decimal,
    /// Extra hours outside the day window.
    pub extra_night_hours: Decimal,
    /// Worked hours on holiday service dates.
    pub extra_holiday_hours: Decimal,
    /// Sum of the three extra buckets, computed from their rounded values.
    pub total_extra_hours: Decimal,
    /// Shifts with a clock-in but no clock-out.
    pub incomplete: u32,
}

/// A civil year-month, the grouping key for monthly summaries.
///
/// Always derived from the shift's `service_date` in the civil calendar,
/// never from UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
}

impl YearMonth {
    /// Truncates a civil date to its year-month.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Totals for one operator on one civil calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyOperatorTotal {
    /// The operator.
    pub operator_id: String,
    /// The civil calendar date.
    pub date: NaiveDate,
    /// The summed minutes for that operator and date.
    pub totals: MinuteTotals,
}

/// Totals for one operator over one civil calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyOperatorTotal {
    /// The operator.
    pub operator_id: String,
    /// The civil year-month.
    pub month: YearMonth,
    /// The summed minutes for that operator and month.
    pub totals: MinuteTotals,
}
