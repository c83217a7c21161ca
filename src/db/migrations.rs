use rusqlite::Connection;

use crate::error::TodoError;

pub fn run_migrations(conn: &Connection) -> Result<(), TodoError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS lists (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS tasks (
            list_id TEXT NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
            id TEXT NOT NULL,
            position INTEGER NOT NULL,
            summary TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'needs_action'
                CHECK (status IN ('needs_action', 'completed')),
            due TEXT,
            description TEXT,
            PRIMARY KEY (list_id, id)
        );

        CREATE TABLE IF NOT EXISTS recurrence_rules (
            list_id TEXT NOT NULL,
            task_id TEXT NOT NULL,
            repeat_interval INTEGER NOT NULL DEFAULT 1,
            unit TEXT NOT NULL DEFAULT 'days'
                CHECK (unit IN ('days', 'weeks', 'months', 'years')),
            end_enabled INTEGER NOT NULL DEFAULT 0,
            end_type TEXT CHECK (end_type IS NULL OR end_type IN ('count', 'date')),
            end_count INTEGER,
            end_date TEXT,
            current_count INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (list_id, task_id),
            FOREIGN KEY (list_id, task_id) REFERENCES tasks(list_id, id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_list_position ON tasks(list_id, position);
        ",
    )?;
    Ok(())
}
