//! Preparation windows and the days inside them that may hold study sessions.

use chrono::NaiveDate;
use std::collections::HashSet;

use super::calendar::Calendar;

/// Inclusive range of days in which an exam's topics may be studied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Resolve the preparation window for an exam sat on `exam_date`.
///
/// The window ends the day before the exam and starts at the nearest earlier
/// barrier day, or at `today` when no barrier lies in between. A barrier on
/// the last day itself yields a one-day window. Returns None when the exam is
/// today or already past.
pub fn resolve_window(exam_date: NaiveDate, calendar: &Calendar) -> Option<Window> {
    let today = calendar.today();
    let end = exam_date.pred_opt()?;
    if end < today {
        return None;
    }

    let start = if calendar.has_barrier(end) {
        end
    } else {
        calendar.barrier_before(end).unwrap_or(today)
    };

    Some(Window { start, end })
}

/// Eligible study days in `window`, ascending, keeping at most the `limit`
/// latest ones.
///
/// Blocked days are always dropped. A barrier day is usable only when it is
/// the window's own start (the earlier exam is over by then). The walk runs
/// backward from the window end and stops once `limit` days are found, so a
/// distant window costs no more than the days actually needed.
pub fn filter_days(
    window: Window,
    calendar: &Calendar,
    blocked: &HashSet<NaiveDate>,
    limit: usize,
) -> Vec<NaiveDate> {
    let first = window.start.max(calendar.today());
    let mut days = Vec::new();
    let mut day = window.end;

    while day >= first && days.len() < limit {
        let usable = !blocked.contains(&day) && (!calendar.has_barrier(day) || day == window.start);
        if usable {
            days.push(day);
        }
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }

    days.reverse();
    days
}
