//! In-memory shift repository.
//!
//! The reference [`ShiftRepository`] implementation: a `RwLock`-guarded
//! vector of records. Used by the test suites and as the default store of
//! the service binary; a production deployment substitutes its own
//! implementation at the same trait boundary.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{DateRange, ShiftRecord};

use super::ShiftRepository;

/// An in-memory shift store.
#[derive(Debug, Default)]
pub struct InMemoryShiftRepository {
    records: RwLock<Vec<ShiftRecord>>,
}

impl InMemoryShiftRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, enforcing the one-open-shift invariant the
    /// ingestion layer guarantees in production.
    ///
    /// Returns the id assigned to the record (the record's own id, or a
    /// fresh UUID when empty).
    pub async fn add_record(&self, mut record: ShiftRecord) -> EngineResult<String> {
        let mut records = self.records.write().await;

        if record.is_open()
            && records.iter().any(|r| {
                r.is_open()
                    && r.operator_id == record.operator_id
                    && r.service_date == record.service_date
            })
        {
            return Err(EngineError::Repository {
                message: format!(
                    "operator '{}' already has an open shift on {}",
                    record.operator_id, record.service_date
                ),
            });
        }

        if record.id.is_empty() {
            record.id = Uuid::new_v4().to_string();
        }
        let id = record.id.clone();
        records.push(record);
        Ok(id)
    }

    /// Returns a snapshot of every stored record, for test assertions.
    pub async fn snapshot(&self) -> Vec<ShiftRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl ShiftRepository for InMemoryShiftRepository {
    async fn find_open_shifts(&self, date: NaiveDate) -> EngineResult<Vec<ShiftRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.service_date == date && r.is_open())
            .cloned()
            .collect())
    }

    async fn set_clock_out(&self, record_id: &str, time: NaiveTime) -> EngineResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| EngineError::Repository {
                message: format!("record '{}' not found", record_id),
            })?;

        record.clock_out = Some(time.format("%H:%M").to_string());
        record.captured_out = Some(time.format("%H:%M:%S").to_string());
        Ok(())
    }

    async fn list_shifts(
        &self,
        operator_id: &str,
        range: DateRange,
    ) -> EngineResult<Vec<ShiftRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.operator_id == operator_id && range.contains(r.service_date))
            .cloned()
            .collect())
    }

    async fn list_shifts_in_range(&self, range: DateRange) -> EngineResult<Vec<ShiftRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| range.contains(r.service_date))
            .cloned()
            .collect())
    }
}
