//! Holiday calendar for rest-day detection.
//!
//! This module determines whether a civil calendar date is a rest day: either
//! the weekly rest day (Sunday in the shipped configuration) or one of a
//! configured set of fixed civil holidays. The calendar is a pure, total
//! function over [`NaiveDate`] values; it never consults UTC, so shifts near
//! midnight cannot land on the wrong day.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A recurring month-day (e.g. `07-20` for July 20), used for fixed civil
/// holidays that fall on the same date every year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthDay {
    /// Month component, 1-12.
    pub month: u32,
    /// Day component, 1-31.
    pub day: u32,
}

impl MonthDay {
    /// Creates a month-day, validating the ranges.
    ///
    /// Day validity is checked against the longest month (31 days); whether
    /// the day exists in a given year is irrelevant because a `Feb 30` entry
    /// simply never matches any real date.
    pub fn new(month: u32, day: u32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(EngineError::ConfigParseError {
                path: "calendar.fixed_holidays".to_string(),
                message: format!("month-day '{:02}-{:02}' is out of range", month, day),
            });
        }
        Ok(Self { month, day })
    }

    /// Returns true if `date` falls on this month-day.
    pub fn matches(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.day() == self.day
    }
}

impl FromStr for MonthDay {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::ConfigParseError {
            path: "calendar.fixed_holidays".to_string(),
            message: format!("invalid month-day '{}', expected MM-DD", s),
        };
        let (month, day) = s.split_once('-').ok_or_else(invalid)?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let day: u32 = day.parse().map_err(|_| invalid())?;
        Self::new(month, day).map_err(|_| invalid())
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl Serialize for MonthDay {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MonthDay {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|_| {
            serde::de::Error::custom(format!("invalid month-day '{}', expected MM-DD", raw))
        })
    }
}

/// Determines whether a civil calendar date is a rest day.
///
/// A date is a holiday if its weekday is the configured weekly rest day, or
/// its month-day falls in the configured fixed set. The fixed set is a
/// configuration input rather than hardwired policy so that yearly or legal
/// updates do not require a code change.
///
/// # Example
///
/// ```
/// use shift_engine::calendar::{HolidayCalendar, MonthDay};
/// use chrono::{NaiveDate, Weekday};
///
/// let calendar = HolidayCalendar::new(
///     Weekday::Sun,
///     vec!["01-01".parse().unwrap(), "07-20".parse().unwrap()],
/// );
///
/// // 2026-07-20 is a Monday, but Colombian Independence Day.
/// assert!(calendar.is_holiday(NaiveDate::from_ymd_opt(2026, 7, 20).unwrap()));
/// // 2026-03-08 is a Sunday.
/// assert!(calendar.is_holiday(NaiveDate::from_ymd_opt(2026, 3, 8).unwrap()));
/// // 2026-03-09 is an ordinary Monday.
/// assert!(!calendar.is_holiday(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayCalendar {
    weekly_rest_day: Weekday,
    fixed_holidays: Vec<MonthDay>,
}

impl HolidayCalendar {
    /// Creates a calendar from a weekly rest day and a set of fixed holidays.
    pub fn new(weekly_rest_day: Weekday, fixed_holidays: Vec<MonthDay>) -> Self {
        Self {
            weekly_rest_day,
            fixed_holidays,
        }
    }

    /// Returns the configured weekly rest day.
    pub fn weekly_rest_day(&self) -> Weekday {
        self.weekly_rest_day
    }

    /// Returns the configured fixed holidays.
    pub fn fixed_holidays(&self) -> &[MonthDay] {
        &self.fixed_holidays
    }

    /// Returns true if `date` is a rest day.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        date.weekday() == self.weekly_rest_day
            || self.fixed_holidays.iter().any(|h| h.matches(date))
    }
}
