//! Study-session planner.
//!
//! Assigns every pending topic to a day before its exam:
//! 1. [`Calendar::build`] lays out the days from today to the last exam and
//!    marks the days of barrier-enforcing exams.
//! 2. For each exam, [`resolve_window`] finds its preparation window and
//!    [`filter_days`] drops blocked days and inner barriers, keeping only as
//!    many of the latest days as the exam has topics.
//! 3. [`allocate`] spreads the exam's topics over the remaining days.
//! 4. [`compile`] diffs the calendar against the stored topics.
//!
//! The planner is pure: it reads a [`PlanSnapshot`] and returns the changes
//! without touching storage.

pub mod allocate;
pub mod calendar;
pub mod compile;
pub mod window;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::domain::{Exam, Topic};

pub use allocate::{allocate, distribute};
pub use calendar::{Calendar, DayEntry};
pub use compile::{compile, ScheduleChange};
pub use window::{filter_days, resolve_window, Window};

/// Consistent view of everything the planner reads
#[derive(Debug, Clone, Default)]
pub struct PlanSnapshot {
    pub exams: Vec<Exam>,
    pub topics: Vec<Topic>,
    pub blocked_dates: HashSet<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMode {
    /// Only place topics that have no date yet
    Unscheduled,
    /// Clear every unlocked, unfinished topic and plan from scratch
    Everything,
}

impl PlanMode {
    pub fn only_unscheduled(&self) -> bool {
        matches!(self, Self::Unscheduled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unscheduled => "unscheduled",
            Self::Everything => "everything",
        }
    }
}

/// Order in which exams claim their days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExamOrder {
    /// Ascending exam date, ties broken by id
    #[default]
    ByDate,
    /// As stored. Kept for comparing against older plans.
    Storage,
}

impl ExamOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ByDate => "by_date",
            Self::Storage => "storage",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "by_date" => Some(Self::ByDate),
            "storage" => Some(Self::Storage),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlanOptions {
    /// Local calendar day the plan starts from
    pub today: NaiveDate,
    pub mode: PlanMode,
    pub exam_order: ExamOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Exam has no usable date
    MissingDate,
    /// Topic belongs to an exam that does not exist
    UnknownExam,
    /// Exam is today or already past
    NoWindow,
    /// Every day in the window is blocked
    EmptyWindow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkippedItem {
    Exam { exam_id: i64, reason: SkipReason },
    Topic { topic_id: i64, exam_id: i64, reason: SkipReason },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanOutcome {
    /// Topics whose date changes, ready to be written in one batch
    pub changes: Vec<ScheduleChange>,
    pub skipped: Vec<SkippedItem>,
    /// Number of topics placed on a day this run
    pub scheduled: usize,
}

/// Compute a plan for `snapshot`. Problems with single exams or topics are
/// reported in [`PlanOutcome::skipped`] and never abort the run.
pub fn plan(snapshot: &PlanSnapshot, options: &PlanOptions) -> PlanOutcome {
    let only_unscheduled = options.mode.only_unscheduled();
    let mut skipped = Vec::new();

    let mut exams: Vec<&Exam> = Vec::with_capacity(snapshot.exams.len());
    for exam in &snapshot.exams {
        if exam.date.is_some() {
            exams.push(exam);
        } else {
            tracing::warn!("Exam {} ({}) has no date, skipping", exam.id, exam.title);
            skipped.push(SkippedItem::Exam {
                exam_id: exam.id,
                reason: SkipReason::MissingDate,
            });
        }
    }
    if options.exam_order == ExamOrder::ByDate {
        exams.sort_by_key(|e| (e.date, e.id));
    }

    let known: HashSet<i64> = snapshot.exams.iter().map(|e| e.id).collect();
    let mut pending: HashMap<i64, Vec<&Topic>> = HashMap::new();
    for topic in snapshot.topics.iter().filter(|t| t.is_pending(only_unscheduled)) {
        if known.contains(&topic.exam_id) {
            pending.entry(topic.exam_id).or_default().push(topic);
        } else {
            tracing::warn!("Topic {} references unknown exam {}", topic.id, topic.exam_id);
            skipped.push(SkippedItem::Topic {
                topic_id: topic.id,
                exam_id: topic.exam_id,
                reason: SkipReason::UnknownExam,
            });
        }
    }

    let mut calendar = Calendar::build(&snapshot.exams, options.today);
    let mut scheduled = 0;

    for exam in &exams {
        let Some(date) = exam.date else { continue };
        let Some(topics) = pending.get_mut(&exam.id) else { continue };
        topics.sort_by_key(|t| (t.position, t.id));
        let topic_ids: Vec<i64> = topics.iter().map(|t| t.id).collect();

        let Some(window) = resolve_window(date, &calendar) else {
            tracing::debug!("Exam {} on {} has no preparation window", exam.id, date);
            skipped.push(SkippedItem::Exam {
                exam_id: exam.id,
                reason: SkipReason::NoWindow,
            });
            continue;
        };

        let days = filter_days(window, &calendar, &snapshot.blocked_dates, topic_ids.len());
        if days.is_empty() {
            tracing::debug!(
                "Exam {} window {}..{} has no free day",
                exam.id,
                window.start,
                window.end
            );
            skipped.push(SkippedItem::Exam {
                exam_id: exam.id,
                reason: SkipReason::EmptyWindow,
            });
            continue;
        }

        let placed = allocate(&days, &topic_ids, &mut calendar);
        tracing::debug!(
            "Exam {}: {} topics over {} days in {}..{}",
            exam.id,
            placed,
            days.len(),
            window.start,
            window.end
        );
        scheduled += placed;
    }

    let planned: HashSet<i64> = exams.iter().map(|e| e.id).collect();
    let changes = compile(&calendar, &snapshot.topics, &planned, only_unscheduled);

    PlanOutcome {
        changes,
        skipped,
        scheduled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TopicStatus;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap() + chrono::Duration::days(n - 1)
    }

    fn exam(id: i64, date: i64) -> Exam {
        let mut e = Exam::new(format!("Exam {}", id), day(date));
        e.id = id;
        e
    }

    fn topic(id: i64, exam_id: i64) -> Topic {
        let mut t = Topic::new(exam_id, format!("Topic {}", id));
        t.id = id;
        t.position = id;
        t
    }

    fn options(today: i64, mode: PlanMode) -> PlanOptions {
        PlanOptions {
            today: day(today),
            mode,
            exam_order: ExamOrder::ByDate,
        }
    }

    fn apply(topics: &mut [Topic], changes: &[ScheduleChange]) {
        for change in changes {
            if let Some(t) = topics.iter_mut().find(|t| t.id == change.topic_id) {
                t.scheduled_date = change.scheduled_date;
            }
        }
    }

    fn date_of(changes: &[ScheduleChange], topic_id: i64) -> Option<NaiveDate> {
        changes
            .iter()
            .find(|c| c.topic_id == topic_id)
            .and_then(|c| c.scheduled_date)
    }

    /// Two exams, E1 on day 10 (topics 1-2) and E2 on day 15 (topics 3-7),
    /// with days 3 and 12 blocked.
    fn two_exam_snapshot() -> PlanSnapshot {
        PlanSnapshot {
            exams: vec![exam(1, 10), exam(2, 15)],
            topics: vec![
                topic(1, 1),
                topic(2, 1),
                topic(3, 2),
                topic(4, 2),
                topic(5, 2),
                topic(6, 2),
                topic(7, 2),
            ],
            blocked_dates: [day(3), day(12)].into_iter().collect(),
        }
    }

    #[test]
    fn test_two_exam_scenario() {
        let snapshot = two_exam_snapshot();
        let outcome = plan(&snapshot, &options(1, PlanMode::Unscheduled));

        assert_eq!(outcome.scheduled, 7);
        assert!(outcome.skipped.is_empty());
        assert_eq!(date_of(&outcome.changes, 1), Some(day(8)));
        assert_eq!(date_of(&outcome.changes, 2), Some(day(9)));
        assert_eq!(date_of(&outcome.changes, 3), Some(day(10)));
        assert_eq!(date_of(&outcome.changes, 4), Some(day(10)));
        assert_eq!(date_of(&outcome.changes, 5), Some(day(11)));
        assert_eq!(date_of(&outcome.changes, 6), Some(day(13)));
        assert_eq!(date_of(&outcome.changes, 7), Some(day(14)));
    }

    #[test]
    fn test_changes_follow_topic_order() {
        let outcome = plan(&two_exam_snapshot(), &options(1, PlanMode::Unscheduled));
        let ids: Vec<i64> = outcome.changes.iter().map(|c| c.topic_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_position_decides_priority() {
        let mut snapshot = PlanSnapshot {
            exams: vec![exam(1, 10)],
            topics: vec![topic(1, 1), topic(2, 1)],
            blocked_dates: HashSet::new(),
        };
        snapshot.topics[0].position = 5;
        snapshot.topics[1].position = 1;
        let outcome = plan(&snapshot, &options(1, PlanMode::Unscheduled));
        assert_eq!(date_of(&outcome.changes, 2), Some(day(8)));
        assert_eq!(date_of(&outcome.changes, 1), Some(day(9)));
    }

    #[test]
    fn test_blocked_dates_respected() {
        let snapshot = two_exam_snapshot();
        let outcome = plan(&snapshot, &options(1, PlanMode::Everything));
        for change in &outcome.changes {
            let date = change.scheduled_date.unwrap();
            assert!(!snapshot.blocked_dates.contains(&date));
        }
    }

    #[test]
    fn test_deadline_and_today_respected() {
        let mut snapshot = two_exam_snapshot();
        snapshot.topics.extend((8..30).map(|id| topic(id, 1 + id % 2)));
        let outcome = plan(&snapshot, &options(1, PlanMode::Everything));
        for change in &outcome.changes {
            let t = snapshot.topics.iter().find(|t| t.id == change.topic_id).unwrap();
            let e = snapshot.exams.iter().find(|e| e.id == t.exam_id).unwrap();
            let date = change.scheduled_date.unwrap();
            assert!(date < e.date.unwrap());
            assert!(date >= day(1));
        }
    }

    #[test]
    fn test_no_double_booking_on_barrier_days() {
        let mut snapshot = PlanSnapshot {
            exams: vec![exam(1, 5), exam(2, 8), exam(3, 12)],
            topics: (1..=24).map(|id| topic(id, 1 + id % 3)).collect(),
            blocked_dates: [day(6)].into_iter().collect(),
        };
        let mut quiz = exam(4, 10);
        quiz.ignores_barrier = true;
        snapshot.exams.push(quiz);
        snapshot.topics.extend((25..=28).map(|id| topic(id, 4)));

        let today = 1;
        let outcome = plan(&snapshot, &options(today, PlanMode::Everything));
        let calendar = Calendar::build(&snapshot.exams, day(today));

        let exam_of = |topic_id: i64| {
            let t = snapshot.topics.iter().find(|t| t.id == topic_id).unwrap();
            snapshot.exams.iter().find(|e| e.id == t.exam_id).unwrap()
        };
        for a in &outcome.changes {
            for b in &outcome.changes {
                if a.topic_id == b.topic_id || a.scheduled_date != b.scheduled_date {
                    continue;
                }
                let date = a.scheduled_date.unwrap();
                if !calendar.has_barrier(date) {
                    continue;
                }
                for e in [exam_of(a.topic_id), exam_of(b.topic_id)] {
                    let window = resolve_window(e.date.unwrap(), &calendar).unwrap();
                    assert_eq!(window.start, date);
                }
            }
        }
    }

    #[test]
    fn test_completeness_under_slack() {
        let snapshot = PlanSnapshot {
            exams: vec![exam(1, 12)],
            topics: (1..=4).map(|id| topic(id, 1)).collect(),
            blocked_dates: [day(10)].into_iter().collect(),
        };
        let outcome = plan(&snapshot, &options(1, PlanMode::Unscheduled));
        let dates: Vec<NaiveDate> = outcome
            .changes
            .iter()
            .map(|c| c.scheduled_date.unwrap())
            .collect();
        assert_eq!(dates, vec![day(7), day(8), day(9), day(11)]);
    }

    #[test]
    fn test_lock_inviolability() {
        let mut snapshot = two_exam_snapshot();
        snapshot.topics[0].locked = true;
        snapshot.topics[0].scheduled_date = Some(day(2));
        snapshot.topics[3].locked = true;

        for mode in [PlanMode::Unscheduled, PlanMode::Everything] {
            let outcome = plan(&snapshot, &options(1, mode));
            assert!(outcome.changes.iter().all(|c| c.topic_id != 1 && c.topic_id != 4));
        }
    }

    #[test]
    fn test_done_topics_ignored() {
        let mut snapshot = two_exam_snapshot();
        snapshot.topics[1].status = TopicStatus::Done;
        let outcome = plan(&snapshot, &options(1, PlanMode::Everything));
        assert!(outcome.changes.iter().all(|c| c.topic_id != 2));
        assert_eq!(date_of(&outcome.changes, 1), Some(day(9)));
    }

    #[test]
    fn test_unscheduled_mode_is_idempotent() {
        let mut snapshot = two_exam_snapshot();
        let opts = options(1, PlanMode::Unscheduled);

        let first = plan(&snapshot, &opts);
        assert_eq!(first.changes.len(), 7);
        apply(&mut snapshot.topics, &first.changes);

        let second = plan(&snapshot, &opts);
        assert!(second.changes.is_empty());
        assert_eq!(second.scheduled, 0);
    }

    #[test]
    fn test_full_replan_is_stable() {
        let mut snapshot = two_exam_snapshot();
        let opts = options(1, PlanMode::Everything);
        let first = plan(&snapshot, &opts);
        apply(&mut snapshot.topics, &first.changes);
        assert!(plan(&snapshot, &opts).changes.is_empty());
    }

    #[test]
    fn test_unscheduled_mode_keeps_manual_placement() {
        let mut snapshot = two_exam_snapshot();
        snapshot.topics[0].scheduled_date = Some(day(4));
        let outcome = plan(&snapshot, &options(1, PlanMode::Unscheduled));
        assert!(outcome.changes.iter().all(|c| c.topic_id != 1));
        assert_eq!(date_of(&outcome.changes, 2), Some(day(9)));
    }

    #[test]
    fn test_full_replan_clears_stale_placement() {
        let mut snapshot = PlanSnapshot {
            exams: vec![exam(1, 10)],
            topics: vec![topic(1, 1)],
            blocked_dates: HashSet::new(),
        };
        snapshot.topics[0].scheduled_date = Some(day(4));
        // Exam already past: nothing can be allocated, but the stale date still goes
        let outcome = plan(&snapshot, &options(11, PlanMode::Everything));
        assert_eq!(
            outcome.changes,
            vec![ScheduleChange { topic_id: 1, scheduled_date: None }]
        );
        assert_eq!(
            outcome.skipped,
            vec![SkippedItem::Exam { exam_id: 1, reason: SkipReason::NoWindow }]
        );
    }

    #[test]
    fn test_full_replan_moves_stale_placement() {
        let mut snapshot = two_exam_snapshot();
        snapshot.topics[0].scheduled_date = Some(day(4));
        let outcome = plan(&snapshot, &options(1, PlanMode::Everything));
        assert_eq!(date_of(&outcome.changes, 1), Some(day(8)));
    }

    #[test]
    fn test_empty_window_reported() {
        let snapshot = PlanSnapshot {
            exams: vec![exam(1, 3)],
            topics: vec![topic(1, 1)],
            blocked_dates: [day(1), day(2)].into_iter().collect(),
        };
        let outcome = plan(&snapshot, &options(1, PlanMode::Unscheduled));
        assert!(outcome.changes.is_empty());
        assert_eq!(
            outcome.skipped,
            vec![SkippedItem::Exam { exam_id: 1, reason: SkipReason::EmptyWindow }]
        );
    }

    #[test]
    fn test_exam_without_topics_not_reported() {
        let snapshot = PlanSnapshot {
            exams: vec![exam(1, 1)],
            ..Default::default()
        };
        let outcome = plan(&snapshot, &options(1, PlanMode::Everything));
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_missing_exam_date_skipped() {
        let mut snapshot = two_exam_snapshot();
        snapshot.exams[0].date = None;
        snapshot.topics[0].scheduled_date = Some(day(4));
        let outcome = plan(&snapshot, &options(1, PlanMode::Everything));

        assert!(outcome.skipped.contains(&SkippedItem::Exam {
            exam_id: 1,
            reason: SkipReason::MissingDate
        }));
        assert!(outcome.changes.iter().all(|c| c.topic_id != 1 && c.topic_id != 2));
        // Without the first exam's barrier the second window reaches back to today
        assert_eq!(date_of(&outcome.changes, 3), Some(day(9)));
    }

    #[test]
    fn test_unknown_exam_topic_skipped() {
        let mut snapshot = two_exam_snapshot();
        snapshot.topics.push(topic(99, 42));
        let outcome = plan(&snapshot, &options(1, PlanMode::Everything));
        assert_eq!(
            outcome.skipped,
            vec![SkippedItem::Topic { topic_id: 99, exam_id: 42, reason: SkipReason::UnknownExam }]
        );
        assert_eq!(outcome.scheduled, 7);
    }

    #[test]
    fn test_no_exams_nothing_planned() {
        let outcome = plan(&PlanSnapshot::default(), &options(1, PlanMode::Everything));
        assert!(outcome.changes.is_empty());
        assert_eq!(outcome.scheduled, 0);
    }

    #[test]
    fn test_storage_order_produces_same_dates() {
        let mut snapshot = two_exam_snapshot();
        snapshot.exams.reverse();
        let by_date = plan(&snapshot, &options(1, PlanMode::Everything));
        let mut opts = options(1, PlanMode::Everything);
        opts.exam_order = ExamOrder::Storage;
        let storage = plan(&snapshot, &opts);
        assert_eq!(by_date.changes, storage.changes);
    }

    #[test]
    fn test_exam_order_from_str() {
        assert_eq!(ExamOrder::from_str("by_date"), Some(ExamOrder::ByDate));
        assert_eq!(ExamOrder::from_str("storage"), Some(ExamOrder::Storage));
        assert_eq!(ExamOrder::from_str("random"), None);
        assert_eq!(ExamOrder::default(), ExamOrder::ByDate);
    }

    #[test]
    fn test_skipped_item_serialization() {
        let item = SkippedItem::Exam {
            exam_id: 3,
            reason: SkipReason::EmptyWindow,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "exam", "exam_id": 3, "reason": "empty_window"})
        );
    }

    #[test]
    fn test_far_future_exam_plans_last_days() {
        let far = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        let mut distant = exam(2, 1);
        distant.date = Some(far);
        let snapshot = PlanSnapshot {
            exams: vec![exam(1, 10), distant],
            topics: vec![topic(1, 1), topic(2, 2), topic(3, 2)],
            blocked_dates: [far.pred_opt().unwrap()].into_iter().collect(),
        };

        let outcome = plan(&snapshot, &options(1, PlanMode::Everything));
        assert_eq!(outcome.scheduled, 3);
        assert_eq!(date_of(&outcome.changes, 1), Some(day(9)));
        assert_eq!(date_of(&outcome.changes, 2), Some(far - chrono::Duration::days(3)));
        assert_eq!(date_of(&outcome.changes, 3), Some(far - chrono::Duration::days(2)));
    }

    #[test]
    fn test_far_future_exam_without_topics() {
        let mut distant = exam(1, 1);
        distant.date = NaiveDate::from_ymd_opt(9999, 12, 31);
        let snapshot = PlanSnapshot {
            exams: vec![distant],
            ..Default::default()
        };
        let outcome = plan(&snapshot, &options(1, PlanMode::Everything));
        assert!(outcome.changes.is_empty());
        assert!(outcome.skipped.is_empty());
    }
}
