//! Topic CRUD and query operations

use chrono::NaiveDate;
use rusqlite::{params, Connection, Result};
use serde::Serialize;

use crate::domain::{Topic, TopicStatus};

use super::{decode_date, format_date};

const TOPIC_COLUMNS: &str = "id, exam_id, name, status, locked, scheduled_date, note, position";

/// Insert a topic at the end of its exam's list. `topic.position` is ignored;
/// the next free position within the exam is assigned.
pub fn insert_topic(conn: &Connection, topic: &Topic) -> Result<i64> {
    conn.execute(
        r#"
        INSERT INTO topics (exam_id, name, status, locked, scheduled_date, note, position)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6,
                (SELECT COALESCE(MAX(position), 0) + 1 FROM topics WHERE exam_id = ?1))
        "#,
        params![
            topic.exam_id,
            topic.name,
            topic.status.as_str(),
            topic.locked,
            topic.scheduled_date.map(format_date),
            topic.note,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_topic_by_id(conn: &Connection, id: i64) -> Result<Option<Topic>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM topics WHERE id = ?1", TOPIC_COLUMNS))?;

    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(row) => row_to_topic(row),
        None => Ok(None),
    }
}

pub fn get_topics_for_exam(conn: &Connection, exam_id: i64) -> Result<Vec<Topic>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM topics WHERE exam_id = ?1 ORDER BY position, id",
        TOPIC_COLUMNS
    ))?;
    let topics = stmt
        .query_map(params![exam_id], |row| row_to_topic(row))?
        .collect::<Result<Vec<_>>>()?;
    Ok(topics.into_iter().flatten().collect())
}

pub fn get_all_topics(conn: &Connection) -> Result<Vec<Topic>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM topics ORDER BY exam_id, position, id",
        TOPIC_COLUMNS
    ))?;
    let topics = stmt
        .query_map([], |row| row_to_topic(row))?
        .collect::<Result<Vec<_>>>()?;
    Ok(topics.into_iter().flatten().collect())
}

pub fn set_topic_status(conn: &Connection, id: i64, status: TopicStatus) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE topics SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(updated > 0)
}

/// Pin a topic to a day by hand. Pinned topics are locked so the planner
/// leaves them where they are.
pub fn pin_topic(conn: &Connection, id: i64, date: NaiveDate) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE topics SET scheduled_date = ?1, locked = 1 WHERE id = ?2",
        params![format_date(date), id],
    )?;
    Ok(updated > 0)
}

/// Hand a topic back to the planner. The current date is kept until the
/// next planning run.
pub fn unlock_topic(conn: &Connection, id: i64) -> Result<bool> {
    let updated = conn.execute("UPDATE topics SET locked = 0 WHERE id = ?1", params![id])?;
    Ok(updated > 0)
}

/// Count of topics still waiting for a day
pub fn get_unscheduled_count(conn: &Connection) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM topics WHERE status = 'todo' AND scheduled_date IS NULL",
        [],
        |row| row.get(0),
    )
}

/// One scheduled topic as shown in the agenda
#[derive(Debug, Clone, Serialize)]
pub struct AgendaEntry {
    pub date: NaiveDate,
    pub topic_id: i64,
    pub topic_name: String,
    pub status: TopicStatus,
    pub locked: bool,
    pub exam_id: i64,
    pub exam_title: String,
}

/// Scheduled topics between `from` and `to` inclusive, by day then exam order
pub fn get_agenda(conn: &Connection, from: NaiveDate, to: NaiveDate) -> Result<Vec<AgendaEntry>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT t.scheduled_date, t.id, t.name, t.status, t.locked, e.id, e.title
        FROM topics t
        JOIN exams e ON e.id = t.exam_id
        WHERE t.scheduled_date >= ?1 AND t.scheduled_date <= ?2
        ORDER BY t.scheduled_date, e.exam_date, t.position, t.id
        "#,
    )?;

    let rows = stmt
        .query_map(params![format_date(from), format_date(to)], |row| {
            let date_str: String = row.get(0)?;
            let status_str: String = row.get(3)?;
            Ok((
                date_str,
                status_str,
                AgendaEntry {
                    date: from,
                    topic_id: row.get(1)?,
                    topic_name: row.get(2)?,
                    status: TopicStatus::Todo,
                    locked: row.get(4)?,
                    exam_id: row.get(5)?,
                    exam_title: row.get(6)?,
                },
            ))
        })?
        .collect::<Result<Vec<_>>>()?;

    let entries = rows
        .into_iter()
        .filter_map(|(date_str, status_str, mut entry)| {
            entry.status = decode_status(entry.topic_id, &status_str)?;
            entry.date = decode_date(Some(date_str), &format!("topic {}", entry.topic_id))?;
            Some(entry)
        })
        .collect();
    Ok(entries)
}

/// Parse a stored status. Unknown values are logged and the row is skipped.
fn decode_status(id: i64, raw: &str) -> Option<TopicStatus> {
    let status = TopicStatus::from_str(raw);
    if status.is_none() {
        tracing::warn!("topic {}: unknown status '{}', skipping", id, raw);
    }
    status
}

/// Map a topic row. Rows with an unreadable status come back as None.
fn row_to_topic(row: &rusqlite::Row) -> Result<Option<Topic>> {
    let id: i64 = row.get(0)?;
    let status_str: String = row.get(3)?;
    let scheduled_str: Option<String> = row.get(5)?;

    let Some(status) = decode_status(id, &status_str) else {
        return Ok(None);
    };

    Ok(Some(Topic {
        id,
        exam_id: row.get(1)?,
        name: row.get(2)?,
        status,
        locked: row.get(4)?,
        scheduled_date: decode_date(scheduled_str, &format!("topic {}", id)),
        note: row.get(6)?,
        position: row.get(7)?,
    }))
}
