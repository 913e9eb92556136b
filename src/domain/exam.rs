use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub id: i64,
    pub subject_id: Option<i64>,
    pub title: String,
    /// None when the stored date is missing or unreadable; such exams are never planned
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    /// When true, this exam's date does not close other exams' preparation windows
    pub ignores_barrier: bool,
    pub note: Option<String>,
}

impl Exam {
    pub fn new(title: String, date: NaiveDate) -> Self {
        Self {
            id: 0,
            subject_id: None,
            title,
            date: Some(date),
            time: None,
            ignores_barrier: false,
            note: None,
        }
    }

    /// True if this exam closes the preparation window of any exam after it.
    /// Exams before `today` never act as barriers.
    pub fn is_barrier(&self, today: NaiveDate) -> bool {
        match self.date {
            Some(date) => !self.ignores_barrier && date >= today,
            None => false,
        }
    }
}
