//! Reading the planner's input and writing its output.
//!
//! Both sides run inside a single transaction: the snapshot is one
//! consistent read of exams, topics and blocked dates, and the schedule
//! changes are committed together or not at all.

use rusqlite::{params, Connection, Result};

use crate::planner::{PlanSnapshot, ScheduleChange};

use super::{format_date, get_all_exams, get_all_topics, get_blocked_dates};

pub fn load_snapshot(conn: &mut Connection) -> Result<PlanSnapshot> {
    let tx = conn.transaction()?;
    let exams = get_all_exams(&tx)?;
    let topics = get_all_topics(&tx)?;
    let blocked_dates = get_blocked_dates(&tx)?.into_iter().collect();
    tx.commit()?;

    Ok(PlanSnapshot {
        exams,
        topics,
        blocked_dates,
    })
}

/// Write every change in one transaction. Only `scheduled_date` is touched,
/// and only on topics that are still unlocked and unfinished. Returns the
/// number of topics updated.
pub fn apply_schedule_changes(conn: &mut Connection, changes: &[ScheduleChange]) -> Result<usize> {
    if changes.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    let mut updated = 0;
    {
        let mut stmt = tx.prepare(
            "UPDATE topics SET scheduled_date = ?1 WHERE id = ?2 AND locked = 0 AND status = 'todo'",
        )?;
        for change in changes {
            updated += stmt.execute(params![change.scheduled_date.map(format_date), change.topic_id])?;
        }
    }
    tx.commit()?;
    Ok(updated)
}
