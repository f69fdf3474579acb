use anyhow::Context;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

pub const DB_FILE: &str = "center.sqlite3";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace).with_context(|| {
        format!(
            "failed to create workspace {}",
            workspace.to_string_lossy()
        )
    })?;
    let db_path = workspace.join(DB_FILE);
    let conn = Connection::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.to_string_lossy()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings(
            key TEXT PRIMARY KEY,
            value_json TEXT NOT NULL
        )",
        [],
    )?;

    // Resource registries share one shape.
    for table in ["teachers", "halls", "years", "subjects"] {
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {}(
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    code TEXT,
                    notes TEXT,
                    active INTEGER NOT NULL DEFAULT 1,
                    sort_order INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT
                )",
                table
            ),
            [],
        )?;
    }

    conn.execute(
        "CREATE TABLE IF NOT EXISTS schedules(
            id TEXT PRIMARY KEY,
            day_of_week TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            teacher_id TEXT,
            hall_id TEXT,
            year_id TEXT,
            subject_id TEXT,
            title TEXT NOT NULL,
            created_at TEXT,
            FOREIGN KEY(teacher_id) REFERENCES teachers(id),
            FOREIGN KEY(hall_id) REFERENCES halls(id),
            FOREIGN KEY(year_id) REFERENCES years(id),
            FOREIGN KEY(subject_id) REFERENCES subjects(id)
        )",
        [],
    )?;

    // Workspaces created before notes/updated_at existed gain the columns here.
    ensure_schedules_notes(&conn)?;
    ensure_schedules_updated_at(&conn)?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_schedules_day ON schedules(day_of_week)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_schedules_teacher ON schedules(teacher_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_schedules_hall ON schedules(hall_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_schedules_year ON schedules(year_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_schedules_subject ON schedules(subject_id)",
        [],
    )?;

    Ok(conn)
}

pub fn settings_get_json(
    conn: &Connection,
    key: &str,
) -> anyhow::Result<Option<serde_json::Value>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value_json FROM settings WHERE key = ?",
            [key],
            |r| r.get(0),
        )
        .optional()?;
    match raw {
        Some(text) => {
            let value = serde_json::from_str(&text)
                .with_context(|| format!("setting {} is not valid JSON", key))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

pub fn settings_set_json(
    conn: &Connection,
    key: &str,
    value: &serde_json::Value,
) -> anyhow::Result<()> {
    let text = serde_json::to_string(value)?;
    conn.execute(
        "INSERT INTO settings(key, value_json) VALUES(?, ?)
         ON CONFLICT(key) DO UPDATE SET value_json = excluded.value_json",
        (key, &text),
    )?;
    Ok(())
}

fn ensure_schedules_notes(conn: &Connection) -> anyhow::Result<()> {
    if table_has_column(conn, "schedules", "notes")? {
        return Ok(());
    }
    conn.execute("ALTER TABLE schedules ADD COLUMN notes TEXT", [])?;
    Ok(())
}

fn ensure_schedules_updated_at(conn: &Connection) -> anyhow::Result<()> {
    if table_has_column(conn, "schedules", "updated_at")? {
        return Ok(());
    }
    conn.execute("ALTER TABLE schedules ADD COLUMN updated_at TEXT", [])?;
    // Existing rows take their creation time.
    conn.execute(
        "UPDATE schedules SET updated_at = created_at WHERE updated_at IS NULL",
        [],
    )?;
    Ok(())
}

pub fn table_has_column(conn: &Connection, table: &str, column: &str) -> anyhow::Result<bool> {
    let sql = format!("PRAGMA table_info({})", table);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}
