//! Classified shift values.
//!
//! A [`ClassifiedShift`] is the output of the shift classifier: the worked
//! minutes of one shift split into normal, day-extra, night-extra, and
//! holiday-extra buckets. It is derived from a single record plus the holiday
//! calendar, carries no cross-record state, and is never persisted by this
//! engine.

use chrono::{NaiveDate, Weekday};

/// The classification of one shift's worked minutes.
///
/// Invariant: `normal_minutes + day_extra_minutes + night_extra_minutes +
/// holiday_extra_minutes == worked_minutes`, and every field is non-negative.
/// On a holiday service date all worked minutes land in
/// `holiday_extra_minutes` and the other buckets are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedShift {
    /// Weekday of the service date.
    pub day_of_week: Weekday,
    /// Whether the service date is a rest day per the holiday calendar.
    pub is_holiday: bool,
    /// Total worked minutes after subtracting unpaid breaks.
    pub worked_minutes: i64,
    /// Minutes inside the base quota.
    pub normal_minutes: i64,
    /// Extra minutes whose wall-clock hour falls in the day window.
    pub day_extra_minutes: i64,
    /// Extra minutes outside the day window.
    pub night_extra_minutes: i64,
    /// Worked minutes on a holiday service date.
    pub holiday_extra_minutes: i64,
}

impl ClassifiedShift {
    /// Total extra minutes across the day, night, and holiday buckets.
    pub fn extra_minutes(&self) -> i64 {
        self.day_extra_minutes + self.night_extra_minutes + self.holiday_extra_minutes
    }
}

/// One operator's shift with its classification outcome, the unit the
/// aggregator folds over.
///
/// `classified` is `None` for an incomplete shift (no clock-out): the
/// aggregator counts it instead of dropping it or failing the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorShift {
    /// The operator who worked the shift.
    pub operator_id: String,
    /// The civil calendar date the shift is keyed to.
    pub service_date: NaiveDate,
    /// The classification, or `None` when the shift has no clock-out.
    pub classified: Option<ClassifiedShift>,
}
