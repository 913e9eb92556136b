//! Exam CRUD operations

use chrono::NaiveTime;
use rusqlite::{params, Connection, Result};

use crate::domain::Exam;

use super::{decode_date, format_date};

const TIME_FORMAT: &str = "%H:%M";

const EXAM_COLUMNS: &str = "id, subject_id, title, exam_date, exam_time, ignores_barrier, note";

pub fn insert_exam(conn: &Connection, exam: &Exam) -> Result<i64> {
    conn.execute(
        r#"
        INSERT INTO exams (subject_id, title, exam_date, exam_time, ignores_barrier, note)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            exam.subject_id,
            exam.title,
            exam.date.map(format_date),
            exam.time.map(|t| t.format(TIME_FORMAT).to_string()),
            exam.ignores_barrier,
            exam.note,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_exam_by_id(conn: &Connection, id: i64) -> Result<Option<Exam>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM exams WHERE id = ?1", EXAM_COLUMNS))?;

    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_exam(row)?))
    } else {
        Ok(None)
    }
}

/// All exams in storage order
pub fn get_all_exams(conn: &Connection) -> Result<Vec<Exam>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM exams ORDER BY id", EXAM_COLUMNS))?;
    let exams = stmt
        .query_map([], |row| row_to_exam(row))?
        .collect::<Result<Vec<_>>>()?;
    Ok(exams)
}

/// Delete an exam together with its topics
pub fn delete_exam(conn: &mut Connection, id: i64) -> Result<bool> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM topics WHERE exam_id = ?1", params![id])?;
    let deleted = tx.execute("DELETE FROM exams WHERE id = ?1", params![id])?;
    tx.commit()?;
    Ok(deleted > 0)
}

pub fn get_exam_count(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM exams", [], |row| row.get(0))
}

fn row_to_exam(row: &rusqlite::Row) -> Result<Exam> {
    let id: i64 = row.get(0)?;
    let date_str: Option<String> = row.get(3)?;
    let time_str: Option<String> = row.get(4)?;

    Ok(Exam {
        id,
        subject_id: row.get(1)?,
        title: row.get(2)?,
        date: decode_date(date_str, &format!("exam {}", id)),
        time: time_str.and_then(|s| NaiveTime::parse_from_str(&s, TIME_FORMAT).ok()),
        ignores_barrier: row.get(5)?,
        note: row.get(6)?,
    })
}
