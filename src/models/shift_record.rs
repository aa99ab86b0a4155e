//! Raw attendance records and date ranges.
//!
//! This module defines the [`ShiftRecord`] struct for representing one raw
//! attendance row as the shift repository stores it, and the [`DateRange`]
//! used when listing records for reporting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One raw attendance row.
///
/// A record is created when an operator clocks in and mutated exactly once,
/// by either the operator clocking out or the reconciliation job, to set the
/// clock-out. Records are never deleted by this engine.
///
/// Clock times are kept as the raw text captured from the form (`"HH:MM"` or
/// `"HH:MM:SS"`); the classifier owns parsing and reports unparsable values
/// as errors instead of the ingestion path guessing. The `captured_*` pair
/// holds the authoritative device timestamps, as opposed to the
/// operator-entered `clock_*` pair; both feed the same classifier.
///
/// The ingestion collaborator guarantees at most one *open* record (no
/// clock-out) per `(operator_id, service_date)`; this engine consumes that
/// invariant as a precondition and does not enforce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRecord {
    /// Stable identifier of the record.
    pub id: String,
    /// Stable identifier of the operator who worked the shift.
    pub operator_id: String,
    /// The civil calendar date the shift is keyed to.
    pub service_date: NaiveDate,
    /// Operator-entered clock-in time of day, raw text.
    pub clock_in: String,
    /// Operator-entered clock-out time of day; absent for an open shift.
    pub clock_out: Option<String>,
    /// Device-captured clock-in time of day, raw text.
    pub captured_in: String,
    /// Device-captured clock-out time of day; absent for an open shift.
    pub captured_out: Option<String>,
    /// Unpaid break minutes to subtract from worked time.
    #[serde(default)]
    pub break_minutes: i64,
}

impl ShiftRecord {
    /// Returns true if the record has a clock-in but no clock-out.
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }
}

/// An inclusive range of civil calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// The first date of the range (inclusive).
    pub start: NaiveDate,
    /// The last date of the range (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range; `start` and `end` may be equal for a single day.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Creates a range covering exactly one date.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Checks if a given date falls within this range, inclusive of both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn open_record() -> ShiftRecord {
        ShiftRecord {
            id: "rec_001".to_string(),
            operator_id: "op_001".to_string(),
            service_date: make_date("2026-03-09"),
            clock_in: "07:00".to_string(),
            clock_out: None,
            captured_in: "07:02:14".to_string(),
            captured_out: None,
            break_minutes: 0,
        }
    }

    /// SR-001: record without clock-out is open
    #[test]
    fn test_record_without_clock_out_is_open() {
        assert!(open_record().is_open());
    }

    /// SR-002: record with clock-out is closed
    #[test]
    fn test_record_with_clock_out_is_closed() {
        let mut record = open_record();
        record.clock_out = Some("16:30".to_string());
        assert!(!record.is_open());
    }

    #[test]
    fn test_record_serialization_round_trip() {
        let mut record = open_record();
        record.clock_out = Some("16:30".to_string());
        record.captured_out = Some("16:31:05".to_string());
        record.break_minutes = 45;

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: ShiftRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deserialized);
    }

    #[test]
    fn test_record_deserialization_defaults_break_minutes() {
        let json = r#"{
            "id": "rec_002",
            "operator_id": "op_002",
            "service_date": "2026-03-10",
            "clock_in": "06:30",
            "clock_out": null,
            "captured_in": "06:30:41",
            "captured_out": null
        }"#;

        let record: ShiftRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.break_minutes, 0);
        assert!(record.is_open());
    }

    #[test]
    fn test_date_range_contains_bounds() {
        let range = DateRange::new(make_date("2026-03-01"), make_date("2026-03-31"));
        assert!(range.contains(make_date("2026-03-01")));
        assert!(range.contains(make_date("2026-03-15")));
        assert!(range.contains(make_date("2026-03-31")));
        assert!(!range.contains(make_date("2026-02-28")));
        assert!(!range.contains(make_date("2026-04-01")));
    }

    #[test]
    fn test_date_range_single_day() {
        let range = DateRange::single(make_date("2026-03-09"));
        assert!(range.contains(make_date("2026-03-09")));
        assert!(!range.contains(make_date("2026-03-10")));
    }
}
