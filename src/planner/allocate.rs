//! Spreads an exam's pending topics over its eligible days.
//!
//! With slack (fewer topics than days) the sessions sit on the last days
//! before the exam, one per day. Without slack every day is used and the
//! topics are spread evenly, earlier days taking the extra topic.

use chrono::NaiveDate;

use super::calendar::Calendar;

/// Pair each chosen day with the topics studied on it.
///
/// `days` must be ascending and `topics` in priority order; the first topic
/// lands on the earliest chosen day.
pub fn distribute(days: &[NaiveDate], topics: &[i64]) -> Vec<(NaiveDate, Vec<i64>)> {
    if topics.is_empty() || days.is_empty() {
        return Vec::new();
    }

    let start = days.len().saturating_sub(topics.len());
    let chosen = &days[start..];

    let mut plan = Vec::with_capacity(chosen.len());
    let mut remaining = topics;
    for (i, day) in chosen.iter().enumerate() {
        if remaining.is_empty() {
            break;
        }
        let days_left = chosen.len() - i;
        let per_day = remaining.len().div_ceil(days_left);
        let (today, rest) = remaining.split_at(per_day);
        plan.push((*day, today.to_vec()));
        remaining = rest;
    }

    plan
}

/// Distribute `topics` over `days` and record the result in the calendar.
/// Returns the number of topics placed.
pub fn allocate(days: &[NaiveDate], topics: &[i64], calendar: &mut Calendar) -> usize {
    let mut placed = 0;
    for (day, ids) in distribute(days, topics) {
        for id in ids {
            if calendar.assign(day, id) {
                placed += 1;
            }
        }
    }
    placed
}
