//! Calculation logic for the shift accounting engine.
//!
//! This module contains the shift classifier: clock-time parsing, overnight
//! anchoring, worked-minute derivation, and the split of worked minutes into
//! normal, day-extra, night-extra, and holiday-extra buckets.

mod classify;
mod day_window;

pub use classify::{classify_shift, parse_clock_time};
pub use day_window::DayWindow;
