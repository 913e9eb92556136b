//! Days the user is not available for study

use chrono::NaiveDate;
use rusqlite::{params, Connection, Result};

use super::{decode_date, format_date};

/// Mark a day as blocked. Returns false if it already was.
pub fn add_blocked_date(conn: &Connection, date: NaiveDate) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO blocked_dates (blocked_date) VALUES (?1)",
        params![format_date(date)],
    )?;
    Ok(inserted > 0)
}

pub fn remove_blocked_date(conn: &Connection, date: NaiveDate) -> Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM blocked_dates WHERE blocked_date = ?1",
        params![format_date(date)],
    )?;
    Ok(deleted > 0)
}

/// All blocked days, ascending. Unreadable rows are skipped.
pub fn get_blocked_dates(conn: &Connection) -> Result<Vec<NaiveDate>> {
    let mut stmt = conn.prepare("SELECT blocked_date FROM blocked_dates ORDER BY blocked_date")?;
    let raw = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>>>()?;
    Ok(raw
        .into_iter()
        .filter_map(|s| decode_date(Some(s), "blocked date"))
        .collect())
}
