//! Turns the filled calendar into the set of topic date changes to persist.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::calendar::Calendar;
use crate::domain::Topic;

/// New `scheduled_date` for one topic. `None` clears the date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleChange {
    pub topic_id: i64,
    pub scheduled_date: Option<NaiveDate>,
}

/// Compare the calendar against the current topics and return exactly the
/// topics whose date changes, in the order they appear in `topics`.
///
/// In a full re-plan every plannable topic of a planned exam starts from a
/// blank date, so stale placements the calendar does not repeat are cleared.
/// Topics of exams outside `planned_exams` are left alone.
pub fn compile(
    calendar: &Calendar,
    topics: &[Topic],
    planned_exams: &HashSet<i64>,
    only_unscheduled: bool,
) -> Vec<ScheduleChange> {
    let allocated: HashMap<i64, NaiveDate> = calendar
        .assignments()
        .map(|(date, topic_id)| (topic_id, date))
        .collect();

    let mut changes = Vec::new();
    for topic in topics {
        if !topic.is_plannable() || !planned_exams.contains(&topic.exam_id) {
            continue;
        }

        let target = match allocated.get(&topic.id) {
            Some(date) => Some(*date),
            None if only_unscheduled => continue,
            None => None,
        };

        if target != topic.scheduled_date {
            changes.push(ScheduleChange {
                topic_id: topic.id,
                scheduled_date: target,
            });
        }
    }

    changes
}
