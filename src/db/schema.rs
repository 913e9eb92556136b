use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
    // Create tables with COMPLETE schema for new databases
    // Migrations below handle upgrades for existing databases
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS subjects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS exams (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_id INTEGER,
            title TEXT NOT NULL,
            exam_date TEXT,
            exam_time TEXT,
            ignores_barrier INTEGER NOT NULL DEFAULT 0,
            note TEXT,
            FOREIGN KEY (subject_id) REFERENCES subjects(id)
        );

        CREATE TABLE IF NOT EXISTS topics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            exam_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'todo',
            locked INTEGER NOT NULL DEFAULT 0,
            scheduled_date TEXT,
            note TEXT,
            position INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (exam_id) REFERENCES exams(id)
        );

        CREATE TABLE IF NOT EXISTS blocked_dates (
            blocked_date TEXT PRIMARY KEY
        );

        -- Indexes
        CREATE INDEX IF NOT EXISTS idx_exams_date ON exams(exam_date);
        CREATE INDEX IF NOT EXISTS idx_topics_exam_id ON topics(exam_id);
        CREATE INDEX IF NOT EXISTS idx_topics_scheduled_date ON topics(scheduled_date);
        "#,
    )?;

    // ============================================================
    // MIGRATIONS FOR EXISTING DATABASES
    // These are no-ops for new databases (columns already exist)
    // ============================================================

    // Migration: explicit topic ordering (older databases relied on rowid order)
    let had_position = column_exists(conn, "topics", "position");
    add_column_if_missing(conn, "topics", "position", "INTEGER NOT NULL DEFAULT 0")?;
    if !had_position {
        conn.execute("UPDATE topics SET position = id", [])?;
    }

    add_column_if_missing(conn, "exams", "ignores_barrier", "INTEGER NOT NULL DEFAULT 0")?;

    Ok(())
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    conn.prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
        .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
    if !column_exists(conn, table, column) {
        conn.execute(
            &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
            [],
        )?;
    }
    Ok(())
}
