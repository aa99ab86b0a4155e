//! Shift classification.
//!
//! This module derives worked minutes from one shift's raw clock times and
//! splits them into normal, day-extra, night-extra, and holiday-extra
//! buckets. Classification is a pure function of one record plus the holiday
//! calendar; all arithmetic stays in integer minutes.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use crate::calendar::HolidayCalendar;
use crate::config::TimePolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::ClassifiedShift;

/// Parses a raw clock time as captured from the form.
///
/// Accepts `HH:MM:SS` (device captures) and `HH:MM` (operator entries).
///
/// # Example
///
/// ```
/// use shift_engine::calculation::parse_clock_time;
/// use chrono::NaiveTime;
///
/// assert_eq!(
///     parse_clock_time("07:30").unwrap(),
///     NaiveTime::from_hms_opt(7, 30, 0).unwrap()
/// );
/// assert!(parse_clock_time("25:99").is_err());
/// ```
pub fn parse_clock_time(raw: &str) -> EngineResult<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| EngineError::InvalidTimeFormat {
            value: raw.to_string(),
        })
}

/// Classifies one shift's worked minutes.
///
/// The clock-in is anchored to `service_date`; a clock-out that would land
/// before it is moved to the following day (overnight-shift rule). Worked
/// minutes are the shift duration rounded to the nearest minute, minus unpaid
/// break minutes, floored at zero.
///
/// On a holiday service date every worked minute is holiday-extra. Otherwise
/// the first `base_shift_minutes` chronological minutes from clock-in are
/// normal, and each minute beyond the quota is day-extra when its wall-clock
/// instant falls inside the day window and night-extra when it does not. The
/// split is computed by cutting the extra interval at the window boundaries;
/// the resulting counts are identical to walking the interval one minute at
/// a time.
///
/// # Errors
///
/// - [`EngineError::InvalidTimeFormat`] when either clock time fails to
///   parse.
/// - [`EngineError::IncompleteShift`] when `clock_out` is absent. Recoverable:
///   callers either report the shift as zero minutes with an incomplete
///   count, or leave it for reconciliation.
///
/// # Example
///
/// ```
/// use shift_engine::calculation::classify_shift;
/// use shift_engine::calendar::HolidayCalendar;
/// use shift_engine::config::TimePolicy;
/// use chrono::{NaiveDate, Weekday};
///
/// let calendar = HolidayCalendar::new(Weekday::Sun, vec![]);
/// let policy = TimePolicy::default();
/// // Monday, 06:00 to 18:00, no break.
/// let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
/// let shift = classify_shift("06:00", Some("18:00"), 0, date, &calendar, &policy).unwrap();
///
/// assert_eq!(shift.worked_minutes, 720);
/// assert_eq!(shift.normal_minutes, 480);
/// assert_eq!(shift.day_extra_minutes, 240);
/// assert_eq!(shift.night_extra_minutes, 0);
/// ```
pub fn classify_shift(
    clock_in: &str,
    clock_out: Option<&str>,
    break_minutes: i64,
    service_date: NaiveDate,
    calendar: &HolidayCalendar,
    policy: &TimePolicy,
) -> EngineResult<ClassifiedShift> {
    let in_time = parse_clock_time(clock_in)?;
    let out_raw = clock_out.ok_or(EngineError::IncompleteShift)?;
    let out_time = parse_clock_time(out_raw)?;

    let start = service_date.and_time(in_time);
    let mut end = service_date.and_time(out_time);
    if end < start {
        end += Duration::days(1);
    }

    // Duration rounded to the nearest minute; device captures carry seconds.
    let duration_minutes = ((end - start).num_seconds() + 30) / 60;
    let worked_minutes = (duration_minutes - break_minutes.max(0)).max(0);

    let day_of_week = service_date.weekday();
    let is_holiday = calendar.is_holiday(service_date);

    if is_holiday {
        return Ok(ClassifiedShift {
            day_of_week,
            is_holiday,
            worked_minutes,
            normal_minutes: 0,
            day_extra_minutes: 0,
            night_extra_minutes: 0,
            holiday_extra_minutes: worked_minutes,
        });
    }

    let normal_minutes = worked_minutes.min(policy.base_shift_minutes);

    // The worked interval is [clock_in, clock_in + worked_minutes): the
    // unpaid break shortens the tail. Extra minutes start where the quota
    // runs out.
    let mut day_extra_minutes = 0;
    let mut night_extra_minutes = 0;
    let mut cursor = start + Duration::minutes(normal_minutes);
    let extra_end = start + Duration::minutes(worked_minutes);

    while cursor < extra_end {
        let boundary = policy.day_window.next_boundary_after(cursor);
        // The cursor advances in whole minutes from clock_in, which may not
        // be aligned to the boundary's :00 seconds: count the minutes whose
        // instant is still on this side of the boundary.
        let minutes_to_boundary = ((boundary - cursor).num_seconds() as u64).div_ceil(60) as i64;
        let remaining = (extra_end - cursor).num_minutes();
        let segment = minutes_to_boundary.min(remaining);
        if policy.day_window.is_day(cursor) {
            day_extra_minutes += segment;
        } else {
            night_extra_minutes += segment;
        }
        cursor += Duration::minutes(segment);
    }

    Ok(ClassifiedShift {
        day_of_week,
        is_holiday,
        worked_minutes,
        normal_minutes,
        day_extra_minutes,
        night_extra_minutes,
        holiday_extra_minutes: 0,
    })
}
