//! Reconciliation of open shifts.
//!
//! A worker who forgets to clock out leaves an open shift behind. For a
//! given date, reconciliation assigns each such shift a synthetic clock-out
//! of clock-in plus the configured default duration (7 h 20 m as shipped)
//! and persists it through the repository. The operation is idempotent:
//! corrected shifts disappear from the open selection, so a second run for
//! the same date performs no writes.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculation::parse_clock_time;
use crate::config::TimePolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::ShiftRecord;
use crate::repository::ShiftRepository;

/// One corrected record: the synthetic clock-out assigned to an open shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledShift {
    /// The corrected record.
    pub record_id: String,
    /// The operator the record belongs to.
    pub operator_id: String,
    /// The parsed clock-in the assignment was derived from.
    pub clock_in: NaiveTime,
    /// The assigned clock-out (clock-in + default duration, wrapping past
    /// midnight if needed).
    pub assigned_clock_out: NaiveTime,
}

/// Assigns a synthetic clock-out to every operator's earliest open shift on
/// `date` and persists it.
///
/// Per operator only the earliest open shift (smallest parsed clock-in) is
/// corrected; finding more than one open shift violates the repository
/// invariant and is logged as [`EngineError::AmbiguousOpenShift`] while the
/// earliest is still corrected. A persistence failure for one operator is
/// logged and skipped; the loop continues with the remaining operators, so
/// the job itself never aborts on a per-record error.
///
/// Returns the list of corrections that were actually persisted.
pub async fn reconcile_date(
    repo: &dyn ShiftRepository,
    date: NaiveDate,
    policy: &TimePolicy,
) -> EngineResult<Vec<ReconciledShift>> {
    let open_shifts = repo.find_open_shifts(date).await?;
    info!(%date, open_count = open_shifts.len(), "Reconciling open shifts");

    let mut by_operator: BTreeMap<String, Vec<ShiftRecord>> = BTreeMap::new();
    for record in open_shifts {
        by_operator
            .entry(record.operator_id.clone())
            .or_default()
            .push(record);
    }

    let mut corrected = Vec::new();

    for (operator_id, records) in by_operator {
        if records.len() > 1 {
            let ambiguity = EngineError::AmbiguousOpenShift {
                operator_id: operator_id.clone(),
                date,
                count: records.len(),
            };
            warn!(error = %ambiguity, "Correcting only the earliest open shift");
        }

        // Earliest parsed clock-in wins; records with an unparsable clock-in
        // cannot be assigned a clock-out and are left for manual correction.
        let earliest = records
            .iter()
            .filter_map(|record| match parse_clock_time(&record.clock_in) {
                Ok(clock_in) => Some((clock_in, record)),
                Err(err) => {
                    warn!(
                        record_id = %record.id,
                        operator_id = %record.operator_id,
                        error = %err,
                        "Skipping open shift with unparsable clock-in"
                    );
                    None
                }
            })
            .min_by_key(|(clock_in, _)| *clock_in);

        let Some((clock_in, record)) = earliest else {
            continue;
        };

        // NaiveTime addition wraps past midnight.
        let assigned = clock_in + Duration::minutes(policy.default_shift_duration_minutes);

        match repo.set_clock_out(&record.id, assigned).await {
            Ok(()) => {
                info!(
                    record_id = %record.id,
                    operator_id = %operator_id,
                    %clock_in,
                    clock_out = %assigned,
                    "Assigned synthetic clock-out"
                );
                corrected.push(ReconciledShift {
                    record_id: record.id.clone(),
                    operator_id,
                    clock_in,
                    assigned_clock_out: assigned,
                });
            }
            Err(err) => {
                warn!(
                    record_id = %record.id,
                    operator_id = %operator_id,
                    error = %err,
                    "Failed to persist clock-out, continuing with remaining operators"
                );
            }
        }
    }

    info!(%date, corrected_count = corrected.len(), "Reconciliation finished");
    Ok(corrected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryShiftRepository;
    use async_trait::async_trait;
    use crate::models::DateRange;

    fn policy() -> TimePolicy {
        TimePolicy::default()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn open_record(id: &str, operator_id: &str, service_date: &str, clock_in: &str) -> ShiftRecord {
        ShiftRecord {
            id: id.to_string(),
            operator_id: operator_id.to_string(),
            service_date: date(service_date),
            clock_in: clock_in.to_string(),
            clock_out: None,
            captured_in: format!("{}:00", clock_in),
            captured_out: None,
            break_minutes: 0,
        }
    }

    // ==========================================================================
    // RC-001: clock-in 08:00 is assigned clock-out 15:20
    // ==========================================================================
    #[tokio::test]
    async fn test_rc_001_default_duration_assignment() {
        let repo = InMemoryShiftRepository::new();
        repo.add_record(open_record("rec_1", "op_001", "2026-03-09", "08:00"))
            .await
            .unwrap();

        let corrected = reconcile_date(&repo, date("2026-03-09"), &policy())
            .await
            .unwrap();

        assert_eq!(corrected.len(), 1);
        assert_eq!(corrected[0].operator_id, "op_001");
        assert_eq!(corrected[0].assigned_clock_out, time("15:20"));

        let records = repo.snapshot().await;
        assert_eq!(records[0].clock_out.as_deref(), Some("15:20"));
    }

    // ==========================================================================
    // RC-002: assignment wraps past midnight
    // ==========================================================================
    #[tokio::test]
    async fn test_rc_002_assignment_wraps_past_midnight() {
        let repo = InMemoryShiftRepository::new();
        repo.add_record(open_record("rec_1", "op_001", "2026-03-09", "22:00"))
            .await
            .unwrap();

        let corrected = reconcile_date(&repo, date("2026-03-09"), &policy())
            .await
            .unwrap();

        assert_eq!(corrected[0].assigned_clock_out, time("05:20"));
    }

    // ==========================================================================
    // RC-003: idempotence
    // ==========================================================================
    #[tokio::test]
    async fn test_rc_003_second_run_is_a_no_op() {
        let repo = InMemoryShiftRepository::new();
        repo.add_record(open_record("rec_1", "op_001", "2026-03-09", "08:00"))
            .await
            .unwrap();

        let first = reconcile_date(&repo, date("2026-03-09"), &policy())
            .await
            .unwrap();
        let after_first = repo.snapshot().await;

        let second = reconcile_date(&repo, date("2026-03-09"), &policy())
            .await
            .unwrap();
        let after_second = repo.snapshot().await;

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(after_first, after_second);
    }

    // ==========================================================================
    // RC-004: only shifts of the target date are touched
    // ==========================================================================
    #[tokio::test]
    async fn test_rc_004_other_dates_untouched() {
        let repo = InMemoryShiftRepository::new();
        repo.add_record(open_record("rec_1", "op_001", "2026-03-09", "08:00"))
            .await
            .unwrap();
        repo.add_record(open_record("rec_2", "op_001", "2026-03-10", "08:00"))
            .await
            .unwrap();

        let corrected = reconcile_date(&repo, date("2026-03-09"), &policy())
            .await
            .unwrap();

        assert_eq!(corrected.len(), 1);
        assert_eq!(corrected[0].record_id, "rec_1");

        let records = repo.snapshot().await;
        let rec_2 = records.iter().find(|r| r.id == "rec_2").unwrap();
        assert!(rec_2.is_open());
    }

    // ==========================================================================
    // RC-005: multiple operators are corrected independently
    // ==========================================================================
    #[tokio::test]
    async fn test_rc_005_multiple_operators() {
        let repo = InMemoryShiftRepository::new();
        repo.add_record(open_record("rec_1", "op_001", "2026-03-09", "06:30"))
            .await
            .unwrap();
        repo.add_record(open_record("rec_2", "op_002", "2026-03-09", "13:00"))
            .await
            .unwrap();

        let corrected = reconcile_date(&repo, date("2026-03-09"), &policy())
            .await
            .unwrap();

        assert_eq!(corrected.len(), 2);
        assert_eq!(corrected[0].assigned_clock_out, time("13:50"));
        assert_eq!(corrected[1].assigned_clock_out, time("20:20"));
    }

    // ==========================================================================
    // RC-006: unparsable clock-in is skipped, the rest proceed
    // ==========================================================================
    #[tokio::test]
    async fn test_rc_006_unparsable_clock_in_skipped() {
        let repo = InMemoryShiftRepository::new();
        repo.add_record(open_record("rec_1", "op_001", "2026-03-09", "mañana"))
            .await
            .unwrap();
        repo.add_record(open_record("rec_2", "op_002", "2026-03-09", "08:00"))
            .await
            .unwrap();

        let corrected = reconcile_date(&repo, date("2026-03-09"), &policy())
            .await
            .unwrap();

        assert_eq!(corrected.len(), 1);
        assert_eq!(corrected[0].record_id, "rec_2");

        let records = repo.snapshot().await;
        let rec_1 = records.iter().find(|r| r.id == "rec_1").unwrap();
        assert!(rec_1.is_open());
    }

    /// A repository whose writes always fail, to exercise the best-effort
    /// loop.
    struct FailingWrites {
        inner: InMemoryShiftRepository,
    }

    #[async_trait]
    impl ShiftRepository for FailingWrites {
        async fn find_open_shifts(&self, date: NaiveDate) -> EngineResult<Vec<ShiftRecord>> {
            self.inner.find_open_shifts(date).await
        }

        async fn set_clock_out(&self, _record_id: &str, _time: NaiveTime) -> EngineResult<()> {
            Err(EngineError::Repository {
                message: "write refused".to_string(),
            })
        }

        async fn list_shifts(
            &self,
            operator_id: &str,
            range: DateRange,
        ) -> EngineResult<Vec<ShiftRecord>> {
            self.inner.list_shifts(operator_id, range).await
        }

        async fn list_shifts_in_range(&self, range: DateRange) -> EngineResult<Vec<ShiftRecord>> {
            self.inner.list_shifts_in_range(range).await
        }
    }

    /// A repository that serves a fixed open-shift list, bypassing the
    /// in-memory store's one-open-shift check, and records writes.
    struct StaticOpenShifts {
        records: Vec<ShiftRecord>,
        written: std::sync::Mutex<Vec<(String, NaiveTime)>>,
    }

    #[async_trait]
    impl ShiftRepository for StaticOpenShifts {
        async fn find_open_shifts(&self, date: NaiveDate) -> EngineResult<Vec<ShiftRecord>> {
            Ok(self
                .records
                .iter()
                .filter(|r| r.service_date == date && r.is_open())
                .cloned()
                .collect())
        }

        async fn set_clock_out(&self, record_id: &str, time: NaiveTime) -> EngineResult<()> {
            self.written
                .lock()
                .unwrap()
                .push((record_id.to_string(), time));
            Ok(())
        }

        async fn list_shifts(
            &self,
            _operator_id: &str,
            _range: DateRange,
        ) -> EngineResult<Vec<ShiftRecord>> {
            Ok(vec![])
        }

        async fn list_shifts_in_range(&self, _range: DateRange) -> EngineResult<Vec<ShiftRecord>> {
            Ok(vec![])
        }
    }

    // ==========================================================================
    // RC-008: violated invariant corrects only the earliest clock-in
    // ==========================================================================
    #[tokio::test]
    async fn test_rc_008_ambiguous_open_shifts_pick_earliest() {
        let repo = StaticOpenShifts {
            records: vec![
                open_record("rec_late", "op_001", "2026-03-09", "10:00"),
                open_record("rec_early", "op_001", "2026-03-09", "07:45"),
            ],
            written: std::sync::Mutex::new(vec![]),
        };

        let corrected = reconcile_date(&repo, date("2026-03-09"), &policy())
            .await
            .unwrap();

        assert_eq!(corrected.len(), 1);
        assert_eq!(corrected[0].record_id, "rec_early");
        assert_eq!(corrected[0].assigned_clock_out, time("15:05"));

        let written = repo.written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, "rec_early");
    }

    // ==========================================================================
    // RC-007: persistence failures do not abort the run
    // ==========================================================================
    #[tokio::test]
    async fn test_rc_007_write_failure_is_tolerated() {
        let inner = InMemoryShiftRepository::new();
        inner
            .add_record(open_record("rec_1", "op_001", "2026-03-09", "08:00"))
            .await
            .unwrap();
        inner
            .add_record(open_record("rec_2", "op_002", "2026-03-09", "09:00"))
            .await
            .unwrap();
        let repo = FailingWrites { inner };

        let corrected = reconcile_date(&repo, date("2026-03-09"), &policy())
            .await
            .unwrap();

        // Both writes failed, none were reported corrected, and the call
        // itself still succeeded.
        assert!(corrected.is_empty());
    }
}
