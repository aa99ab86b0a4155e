//! Reconciliation of shifts missing a clock-out.
//!
//! [`reconcile_date`] is the single idempotent operation; the scheduler, the
//! startup catch-up hook, and the administrative endpoint are three call
//! sites into it.

mod reconcile;
mod scheduler;

pub use reconcile::{ReconciledShift, reconcile_date};
pub use scheduler::{catch_up, civil_today, next_run_delay, run_reconciliation_loop};
