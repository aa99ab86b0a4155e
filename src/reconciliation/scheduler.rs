//! Recurring reconciliation trigger.
//!
//! Two call sites feed the same idempotent [`reconcile_date`] operation: a
//! daily trigger at a fixed civil time targeting "yesterday", and a startup
//! catch-up that targets the previous two calendar days to self-heal runs
//! missed while the service was down. All "today"/"yesterday" arithmetic is
//! done in the configured civil time zone, never in UTC.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tracing::{info, warn};

use crate::config::{EngineConfig, SchedulePolicy};
use crate::repository::ShiftRepository;

use super::reconcile::reconcile_date;

/// Returns today's date in the schedule's civil time zone.
pub fn civil_today(schedule: &SchedulePolicy) -> NaiveDate {
    Utc::now().with_timezone(&schedule.time_zone).date_naive()
}

/// Computes how long to sleep from a civil "now" until the next trigger.
///
/// The trigger fires at `trigger` today if that instant is still ahead,
/// otherwise at `trigger` tomorrow. An exact hit on the trigger instant
/// schedules the next day, so one firing cannot double up.
pub fn next_run_delay(now: NaiveDateTime, trigger: NaiveTime) -> StdDuration {
    let today_trigger = now.date().and_time(trigger);
    let next = if today_trigger > now {
        today_trigger
    } else {
        (now.date() + Duration::days(1)).and_time(trigger)
    };
    (next - now).to_std().unwrap_or(StdDuration::ZERO)
}

/// Startup catch-up: reconciles the previous two civil calendar days.
///
/// Open shifts from those dates would otherwise go unreconciled if the
/// service was not running at the fixed trigger time. Failures are logged
/// and do not prevent the other day from being processed.
pub async fn catch_up(repo: &dyn ShiftRepository, config: &EngineConfig) {
    let today = civil_today(config.schedule());
    for days_back in 1..=2 {
        let target = today - Duration::days(days_back);
        info!(date = %target, "Startup catch-up reconciliation");
        if let Err(err) = reconcile_date(repo, target, config.policy()).await {
            warn!(date = %target, error = %err, "Catch-up reconciliation failed");
        }
    }
}

/// Runs the recurring reconciliation task: startup catch-up, then a daily
/// run at the configured civil trigger time targeting yesterday.
///
/// Never returns; intended to be spawned on the runtime next to the HTTP
/// server.
pub async fn run_reconciliation_loop(repo: Arc<dyn ShiftRepository>, config: Arc<EngineConfig>) {
    catch_up(repo.as_ref(), &config).await;

    loop {
        let schedule = config.schedule();
        let now = Utc::now().with_timezone(&schedule.time_zone).naive_local();
        let delay = next_run_delay(now, schedule.reconcile_at);
        info!(
            delay_secs = delay.as_secs(),
            trigger = %schedule.reconcile_at,
            "Reconciliation scheduler sleeping until next trigger"
        );
        tokio::time::sleep(delay).await;

        let yesterday = civil_today(schedule) - Duration::days(1);
        if let Err(err) = reconcile_date(repo.as_ref(), yesterday, config.policy()).await {
            warn!(date = %yesterday, error = %err, "Scheduled reconciliation failed");
        }
    }
}
