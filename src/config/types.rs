//! Configuration types for the shift accounting engine.
//!
//! This module contains the raw structures deserialized from the YAML
//! configuration files and the validated forms the engine actually runs on.
//! Validation happens once at load time so the rest of the engine never sees
//! an unparsed time, an unresolved time zone, or an inverted day window.

use std::str::FromStr;

use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::calculation::DayWindow;
use crate::calendar::{HolidayCalendar, MonthDay};
use crate::error::{EngineError, EngineResult};

/// Raw shape of `policy.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PolicyFile {
    /// Time-accounting policy constants.
    pub policy: PolicyRaw,
    /// Reconciliation schedule settings.
    pub schedule: ScheduleRaw,
}

/// The `policy` section of `policy.yaml`, as written.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PolicyRaw {
    pub base_shift_minutes: i64,
    pub overtime_threshold_hours: u32,
    pub day_window: DayWindowRaw,
    pub default_shift_duration_minutes: i64,
    pub reporting_deduction_minutes: i64,
}

/// The `day_window` mapping, as written (`"HH:MM"` strings).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DayWindowRaw {
    pub start: String,
    pub end: String,
}

/// The `schedule` section of `policy.yaml`, as written.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ScheduleRaw {
    pub civil_time_zone: String,
    pub reconcile_at: String,
}

/// Raw shape of `calendar.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CalendarFile {
    /// Holiday calendar settings.
    pub calendar: CalendarRaw,
}

/// The `calendar` section of `calendar.yaml`, as written.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CalendarRaw {
    pub weekly_rest_day: String,
    pub fixed_holidays: Vec<MonthDay>,
}

/// Validated time-accounting policy constants.
///
/// These are policy inputs, not hardwired law: the legal overtime threshold
/// and the day window can be updated in configuration without a code change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimePolicy {
    /// Minutes of a shift paid at the normal rate before extras begin.
    pub base_shift_minutes: i64,
    /// Overtime threshold in hours, used at the reporting boundary.
    pub overtime_threshold_hours: u32,
    /// The civil wall-clock window that counts as daytime for extras.
    pub day_window: DayWindow,
    /// Length assigned to a reconciled shift that is missing its clock-out.
    pub default_shift_duration_minutes: i64,
    /// Fixed across-the-board deduction applied to daily reported totals.
    pub reporting_deduction_minutes: i64,
}

impl Default for TimePolicy {
    /// The shipped policy: 480-minute quota, 8-hour threshold, day window
    /// `[06:00, 21:00)`, 7 h 20 m default shift, 60-minute reporting
    /// deduction.
    fn default() -> Self {
        Self {
            base_shift_minutes: 480,
            overtime_threshold_hours: 8,
            day_window: DayWindow::new(
                NaiveTime::from_hms_opt(6, 0, 0).expect("valid window start"),
                NaiveTime::from_hms_opt(21, 0, 0).expect("valid window end"),
            )
            .expect("valid default day window"),
            default_shift_duration_minutes: 440,
            reporting_deduction_minutes: 60,
        }
    }
}

/// Validated reconciliation schedule: the civil time zone all date
/// arithmetic runs in, and the daily trigger time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulePolicy {
    /// The fixed civil time zone (DST-free in the shipped configuration).
    pub time_zone: Tz,
    /// Local time of day at which the daily reconciliation run fires.
    pub reconcile_at: NaiveTime,
}

/// The complete validated engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Time-accounting policy constants.
    policy: TimePolicy,
    /// Reconciliation schedule.
    schedule: SchedulePolicy,
    /// Holiday calendar.
    calendar: HolidayCalendar,
}

impl EngineConfig {
    /// Validates the raw file shapes into a runnable configuration.
    pub(crate) fn from_raw(policy_file: PolicyFile, calendar_file: CalendarFile) -> EngineResult<Self> {
        let raw = policy_file.policy;

        if raw.base_shift_minutes <= 0 {
            return Err(config_error(
                "policy.base_shift_minutes",
                "must be positive",
            ));
        }
        if raw.default_shift_duration_minutes <= 0 {
            return Err(config_error(
                "policy.default_shift_duration_minutes",
                "must be positive",
            ));
        }
        if raw.reporting_deduction_minutes < 0 {
            return Err(config_error(
                "policy.reporting_deduction_minutes",
                "must not be negative",
            ));
        }

        let day_window = DayWindow::new(
            parse_config_time("policy.day_window.start", &raw.day_window.start)?,
            parse_config_time("policy.day_window.end", &raw.day_window.end)?,
        )?;

        let policy = TimePolicy {
            base_shift_minutes: raw.base_shift_minutes,
            overtime_threshold_hours: raw.overtime_threshold_hours,
            day_window,
            default_shift_duration_minutes: raw.default_shift_duration_minutes,
            reporting_deduction_minutes: raw.reporting_deduction_minutes,
        };

        let raw_schedule = policy_file.schedule;
        let time_zone = Tz::from_str(&raw_schedule.civil_time_zone).map_err(|_| {
            config_error(
                "schedule.civil_time_zone",
                &format!("unknown time zone '{}'", raw_schedule.civil_time_zone),
            )
        })?;
        let reconcile_at = parse_config_time("schedule.reconcile_at", &raw_schedule.reconcile_at)?;
        let schedule = SchedulePolicy {
            time_zone,
            reconcile_at,
        };

        let raw_calendar = calendar_file.calendar;
        let weekly_rest_day = Weekday::from_str(&raw_calendar.weekly_rest_day).map_err(|_| {
            config_error(
                "calendar.weekly_rest_day",
                &format!("unknown weekday '{}'", raw_calendar.weekly_rest_day),
            )
        })?;
        let calendar = HolidayCalendar::new(weekly_rest_day, raw_calendar.fixed_holidays);

        Ok(Self {
            policy,
            schedule,
            calendar,
        })
    }

    /// Returns the time-accounting policy.
    pub fn policy(&self) -> &TimePolicy {
        &self.policy
    }

    /// Returns the reconciliation schedule.
    pub fn schedule(&self) -> &SchedulePolicy {
        &self.schedule
    }

    /// Returns the holiday calendar.
    pub fn calendar(&self) -> &HolidayCalendar {
        &self.calendar
    }
}

fn parse_config_time(field: &str, raw: &str) -> EngineResult<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| config_error(field, &format!("invalid time '{}', expected HH:MM", raw)))
}

fn config_error(field: &str, message: &str) -> EngineError {
    EngineError::ConfigParseError {
        path: field.to_string(),
        message: message.to_string(),
    }
}
