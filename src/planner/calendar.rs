//! Day-by-day whiteboard shared by every exam in a planning run.
//!
//! The calendar spans `today` through the furthest exam date. Only days that
//! carry something are stored: a barrier marker when a barrier-enforcing exam
//! is sat that day, and the ids of the topics allocated to it so far. Days in
//! the span with no entry are free.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::domain::Exam;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayEntry {
    Barrier,
    Topic(i64),
}

#[derive(Debug, Clone)]
pub struct Calendar {
    today: NaiveDate,
    last_day: NaiveDate,
    days: BTreeMap<NaiveDate, Vec<DayEntry>>,
}

impl Calendar {
    /// Build an empty calendar over `[today, latest exam date]` and mark barriers.
    ///
    /// Exams without a date are ignored. When no exam lies on or after `today`
    /// the calendar holds `today` alone.
    pub fn build(exams: &[Exam], today: NaiveDate) -> Self {
        let last_day = exams
            .iter()
            .filter_map(|e| e.date)
            .filter(|d| *d >= today)
            .max()
            .unwrap_or(today);

        let mut calendar = Self {
            today,
            last_day,
            days: BTreeMap::new(),
        };
        for exam in exams.iter().filter(|e| e.is_barrier(today)) {
            if let Some(date) = exam.date {
                calendar.mark_barrier(date);
            }
        }
        calendar
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// Number of days in the span, both ends included
    pub fn span_days(&self) -> i64 {
        (self.last_day - self.today).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.today <= date && date <= self.last_day
    }

    pub fn has_barrier(&self, date: NaiveDate) -> bool {
        self.days
            .get(&date)
            .is_some_and(|entries| entries.contains(&DayEntry::Barrier))
    }

    /// Latest barrier day in `[today, before)`
    pub fn barrier_before(&self, before: NaiveDate) -> Option<NaiveDate> {
        if before <= self.today {
            return None;
        }
        self.days
            .range(self.today..before)
            .rev()
            .find(|(_, entries)| entries.contains(&DayEntry::Barrier))
            .map(|(date, _)| *date)
    }

    pub fn entries(&self, date: NaiveDate) -> &[DayEntry] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    fn mark_barrier(&mut self, date: NaiveDate) {
        if !self.contains(date) {
            return;
        }
        let entries = self.days.entry(date).or_default();
        if !entries.contains(&DayEntry::Barrier) {
            entries.push(DayEntry::Barrier);
        }
    }

    /// Record a topic on a day. Returns false (and records nothing) when the
    /// day lies outside the calendar span.
    pub fn assign(&mut self, date: NaiveDate, topic_id: i64) -> bool {
        if !self.contains(date) {
            tracing::warn!("Topic {} allocated outside calendar span on {}", topic_id, date);
            return false;
        }
        self.days.entry(date).or_default().push(DayEntry::Topic(topic_id));
        true
    }

    /// Every (day, topic) pair in ascending day order
    pub fn assignments(&self) -> impl Iterator<Item = (NaiveDate, i64)> + '_ {
        self.days.iter().flat_map(|(date, entries)| {
            entries.iter().filter_map(move |entry| match entry {
                DayEntry::Topic(id) => Some((*date, *id)),
                DayEntry::Barrier => None,
            })
        })
    }
}
