//! Subject CRUD operations

use rusqlite::{params, Connection, Result};

use crate::domain::Subject;

pub fn insert_subject(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute("INSERT INTO subjects (name) VALUES (?1)", params![name])?;
    Ok(conn.last_insert_rowid())
}

pub fn get_all_subjects(conn: &Connection) -> Result<Vec<Subject>> {
    let mut stmt = conn.prepare("SELECT id, name FROM subjects ORDER BY name COLLATE NOCASE, id")?;
    let subjects = stmt
        .query_map([], |row| {
            Ok(Subject {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;
    Ok(subjects)
}

pub fn subject_exists(conn: &Connection, id: i64) -> Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM subjects WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
}

/// Delete a subject. Its exams stay and lose their subject reference.
pub fn delete_subject(conn: &mut Connection, id: i64) -> Result<bool> {
    let tx = conn.transaction()?;
    tx.execute("UPDATE exams SET subject_id = NULL WHERE subject_id = ?1", params![id])?;
    let deleted = tx.execute("DELETE FROM subjects WHERE id = ?1", params![id])?;
    tx.commit()?;
    Ok(deleted > 0)
}
