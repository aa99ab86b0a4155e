//! The shift repository boundary.
//!
//! Persistence technology belongs to a collaborator; the engine is written
//! against the narrow [`ShiftRepository`] trait and receives an
//! implementation by dependency injection at its entry points. The crate
//! ships [`InMemoryShiftRepository`] as the reference implementation used by
//! tests and the default service runtime.

mod memory;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use crate::error::EngineResult;
use crate::models::{DateRange, ShiftRecord};

pub use memory::InMemoryShiftRepository;

/// Read/update operations the engine needs from the shift store.
///
/// The store exclusively owns persisted [`ShiftRecord`]s, including the
/// invariant that at most one open shift exists per operator and service
/// date; the engine never assumes it owns that invariant.
#[async_trait]
pub trait ShiftRepository: Send + Sync {
    /// Returns the shifts for `date` that have no clock-out.
    async fn find_open_shifts(&self, date: NaiveDate) -> EngineResult<Vec<ShiftRecord>>;

    /// Sets the clock-out of one record.
    ///
    /// Fills both the operator-entered and the device-captured clock-out
    /// columns, so reports derived from either time source agree after
    /// reconciliation.
    async fn set_clock_out(&self, record_id: &str, time: NaiveTime) -> EngineResult<()>;

    /// Returns one operator's shifts whose service date falls in `range`.
    async fn list_shifts(
        &self,
        operator_id: &str,
        range: DateRange,
    ) -> EngineResult<Vec<ShiftRecord>>;

    /// Returns every operator's shifts whose service date falls in `range`.
    ///
    /// Used by the monthly report when no operator filter is supplied.
    async fn list_shifts_in_range(&self, range: DateRange) -> EngineResult<Vec<ShiftRecord>>;
}
