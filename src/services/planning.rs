//! Planning runs: snapshot, plan, write back.
//!
//! A run reads one consistent snapshot, computes the plan in memory and
//! commits the resulting changes in a single transaction. Runs never overlap:
//! [`PlanGuard`] rejects a second run while one is in flight, so two full
//! re-plans cannot both compute against the same stale data.

use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::db::{self, try_lock, DbPool};
use crate::planner::{self, ExamOrder, PlanMode, PlanOptions, PlanOutcome};

/// Shared flag marking a planning run in progress
#[derive(Debug, Clone, Default)]
pub struct PlanGuard {
    busy: Arc<AtomicBool>,
}

/// Held for the duration of a run; releases the guard on drop
#[derive(Debug)]
pub struct PlanPermit {
    busy: Arc<AtomicBool>,
}

impl PlanGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the guard, or None if another run holds it
    pub fn try_begin(&self) -> Option<PlanPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PlanPermit {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for PlanPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub enum PlanRunError {
    /// Another planning run is in flight
    Busy,
    /// The database lock could not be taken
    Unavailable,
    /// Reading the snapshot failed; nothing was computed
    Snapshot(rusqlite::Error),
    /// Writing the plan failed; nothing was persisted
    Persistence(rusqlite::Error),
}

impl std::fmt::Display for PlanRunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanRunError::Busy => write!(f, "A planning run is already in progress"),
            PlanRunError::Unavailable => write!(f, "Database unavailable"),
            PlanRunError::Snapshot(e) => write!(f, "Could not read study data: {}", e),
            PlanRunError::Persistence(e) => write!(f, "Could not save the plan: {}", e),
        }
    }
}

impl PlanRunError {
    /// Returns a user-facing message without database details.
    pub fn user_message(&self) -> &str {
        match self {
            PlanRunError::Busy => "Planning is already running, try again in a moment",
            PlanRunError::Unavailable => "Database unavailable",
            PlanRunError::Snapshot(_) => "Could not read study data, please retry",
            PlanRunError::Persistence(_) => "The plan could not be saved, please retry",
        }
    }
}

impl std::error::Error for PlanRunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlanRunError::Snapshot(e) | PlanRunError::Persistence(e) => Some(e),
            _ => None,
        }
    }
}

/// Run the planner against the database and persist its changes.
pub fn run_plan(
    pool: &DbPool,
    guard: &PlanGuard,
    today: NaiveDate,
    mode: PlanMode,
    exam_order: ExamOrder,
) -> Result<PlanOutcome, PlanRunError> {
    let _permit = guard.try_begin().ok_or(PlanRunError::Busy)?;
    let mut conn = try_lock(pool).map_err(|_| PlanRunError::Unavailable)?;

    let snapshot = db::load_snapshot(&mut conn).map_err(PlanRunError::Snapshot)?;
    let options = PlanOptions {
        today,
        mode,
        exam_order,
    };
    let outcome = planner::plan(&snapshot, &options);

    let written = db::apply_schedule_changes(&mut conn, &outcome.changes).map_err(|e| {
        tracing::error!("Discarding plan of {} changes: {}", outcome.changes.len(), e);
        PlanRunError::Persistence(e)
    })?;

    tracing::info!(
        "Plan ({}, {}) from {}: {} topics placed, {} changes written, {} skipped",
        mode.as_str(),
        exam_order.as_str(),
        today,
        outcome.scheduled,
        written,
        outcome.skipped.len()
    );
    Ok(outcome)
}
