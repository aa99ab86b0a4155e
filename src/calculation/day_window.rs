//! Day/night window for extra-minute bucketing.
//!
//! Extra minutes (beyond the base quota) are paid at a daytime or nighttime
//! surcharge depending on where their wall-clock instant falls. The window is
//! `[06:00, 21:00)` in the shipped configuration but is a configuration
//! input.

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::error::{EngineError, EngineResult};

/// The civil wall-clock window that counts as daytime.
///
/// An instant is "day" when its time of day is in `[start, end)`; everything
/// else is "night". The window must not wrap midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl DayWindow {
    /// Creates a window, rejecting one that wraps midnight or is empty.
    pub fn new(start: NaiveTime, end: NaiveTime) -> EngineResult<Self> {
        if start >= end {
            return Err(EngineError::ConfigParseError {
                path: "policy.day_window".to_string(),
                message: format!("window start {} must be before end {}", start, end),
            });
        }
        Ok(Self { start, end })
    }

    /// The inclusive start of the daytime window.
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// The exclusive end of the daytime window.
    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Returns true if the instant's time of day falls in the daytime window.
    pub fn is_day(&self, instant: NaiveDateTime) -> bool {
        let time = instant.time();
        time >= self.start && time < self.end
    }

    /// Returns the next instant strictly after `instant` at which the
    /// day/night classification can change.
    ///
    /// Boundaries are the window start and end on the instant's date and the
    /// window start on the following date; because the window cannot wrap
    /// midnight, these are already in chronological order.
    pub fn next_boundary_after(&self, instant: NaiveDateTime) -> NaiveDateTime {
        let date = instant.date();
        let candidates = [
            date.and_time(self.start),
            date.and_time(self.end),
            (date + Duration::days(1)).and_time(self.start),
        ];
        for candidate in candidates {
            if candidate > instant {
                return candidate;
            }
        }
        // Unreachable: the last candidate is always on the next day.
        (date + Duration::days(1)).and_time(self.start)
    }
}
