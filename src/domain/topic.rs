use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    #[default]
    Todo,
    Done,
}

impl TopicStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Done => "done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(Self::Todo),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub exam_id: i64,
    pub name: String,
    pub status: TopicStatus,
    /// Set when the topic was pinned to a day by hand; the planner never touches locked topics
    pub locked: bool,
    pub scheduled_date: Option<NaiveDate>,
    pub note: Option<String>,
    /// Creation sequence within the exam. Lower positions are studied first.
    pub position: i64,
}

impl Topic {
    pub fn new(exam_id: i64, name: String) -> Self {
        Self {
            id: 0,
            exam_id,
            name,
            status: TopicStatus::Todo,
            locked: false,
            scheduled_date: None,
            note: None,
            position: 0,
        }
    }

    /// True if the planner may write this topic's date at all
    pub fn is_plannable(&self) -> bool {
        self.status == TopicStatus::Todo && !self.locked
    }

    /// True if the planner should allocate this topic in the current run
    pub fn is_pending(&self, only_unscheduled: bool) -> bool {
        self.is_plannable() && !(only_unscheduled && self.scheduled_date.is_some())
    }
}
