use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::db::{self, try_lock, AgendaEntry};
use crate::state::AppState;
use crate::validation::{parse_iso_date, validate_range};

use super::error::AppError;
use super::local_today;

/// Days shown when the request gives no end date
const DEFAULT_AGENDA_DAYS: i64 = 14;

#[derive(Debug, Deserialize)]
pub struct AgendaQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AgendaDay {
    pub date: NaiveDate,
    pub topics: Vec<AgendaEntry>,
}

/// Group entries (already sorted by date) into one bucket per day
fn group_by_day(entries: Vec<AgendaEntry>) -> Vec<AgendaDay> {
    let mut days: Vec<AgendaDay> = Vec::new();
    for entry in entries {
        match days.last_mut() {
            Some(day) if day.date == entry.date => day.topics.push(entry),
            _ => days.push(AgendaDay {
                date: entry.date,
                topics: vec![entry],
            }),
        }
    }
    days
}

/// GET /agenda?from=YYYY-MM-DD&to=YYYY-MM-DD
///
/// Defaults to the next two weeks starting today.
pub async fn agenda(
    State(state): State<AppState>,
    Query(query): Query<AgendaQuery>,
) -> Result<Json<Vec<AgendaDay>>, AppError> {
    let from = match query.from.as_deref() {
        Some(raw) => parse_iso_date(raw)?,
        None => local_today(),
    };
    let to = match query.to.as_deref() {
        Some(raw) => parse_iso_date(raw)?,
        None => from + Duration::days(DEFAULT_AGENDA_DAYS - 1),
    };
    validate_range(from, to)?;

    let conn = try_lock(&state.db)?;
    let entries = db::get_agenda(&conn, from, to)?;
    Ok(Json(group_by_day(entries)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TopicStatus;

    fn entry(day: u32, topic_id: i64) -> AgendaEntry {
        AgendaEntry {
            date: NaiveDate::from_ymd_opt(2025, 5, day).unwrap(),
            topic_id,
            topic_name: format!("t{}", topic_id),
            status: TopicStatus::Todo,
            locked: false,
            exam_id: 1,
            exam_title: "Final".to_string(),
        }
    }

    #[test]
    fn test_group_by_day() {
        let days = group_by_day(vec![entry(1, 1), entry(1, 2), entry(3, 3)]);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].topics.len(), 2);
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2025, 5, 3).unwrap());
    }

    #[test]
    fn test_group_empty() {
        assert!(group_by_day(Vec::new()).is_empty());
    }
}
