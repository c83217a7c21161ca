use std::collections::BTreeMap;

use rusqlite::{params, Connection};

use crate::error::TodoError;
use crate::models::{
    format_date, parse_date, EndCondition, EndType, RecurrenceRule, RecurrenceUnit, Task,
    TaskStatus,
};
use crate::store::{ListSnapshot, Storage};

/// [`Storage`] over the `tasks` and `recurrence_rules` tables.
pub struct SqliteStorage<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStorage<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl Storage for SqliteStorage<'_> {
    fn load(&self, list_id: &str) -> Result<Option<ListSnapshot>, TodoError> {
        load_snapshot(self.conn, list_id)
    }

    fn save(&self, list_id: &str, snapshot: &ListSnapshot) -> Result<(), TodoError> {
        save_snapshot(self.conn, list_id, snapshot)
    }
}

pub fn load_snapshot(conn: &Connection, list_id: &str) -> Result<Option<ListSnapshot>, TodoError> {
    let exists: i64 = conn.query_row(
        "SELECT COUNT(*) FROM lists WHERE id = ?1",
        params![list_id],
        |row| row.get(0),
    )?;
    if exists == 0 {
        return Ok(None);
    }

    let mut stmt = conn.prepare(
        "SELECT id, summary, status, due, description
         FROM tasks WHERE list_id = ?1 ORDER BY position ASC",
    )?;
    let tasks = stmt
        .query_map(params![list_id], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT task_id, repeat_interval, unit, end_enabled, end_type, end_count, end_date, current_count
         FROM recurrence_rules WHERE list_id = ?1",
    )?;
    let recurrence = stmt
        .query_map(params![list_id], |row| Ok((row.get::<_, String>(0)?, row_to_rule(row)?)))?
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    Ok(Some(ListSnapshot { tasks, recurrence }))
}

/// Replace the list's rows with the snapshot in one transaction.
pub fn save_snapshot(
    conn: &Connection,
    list_id: &str,
    snapshot: &ListSnapshot,
) -> Result<(), TodoError> {
    conn.execute_batch("BEGIN IMMEDIATE")?;
    let result = (|| -> Result<(), TodoError> {
        conn.execute("DELETE FROM recurrence_rules WHERE list_id = ?1", params![list_id])?;
        conn.execute("DELETE FROM tasks WHERE list_id = ?1", params![list_id])?;

        let mut insert_task = conn.prepare(
            "INSERT INTO tasks (list_id, id, position, summary, status, due, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for (position, task) in snapshot.tasks.iter().enumerate() {
            insert_task.execute(params![
                list_id,
                task.id,
                position as i64,
                task.summary,
                task.status.as_str(),
                task.due,
                task.description,
            ])?;
        }

        let mut insert_rule = conn.prepare(
            "INSERT INTO recurrence_rules
                (list_id, task_id, repeat_interval, unit, end_enabled, end_type, end_count, end_date, current_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        for (task_id, rule) in &snapshot.recurrence {
            insert_rule.execute(params![
                list_id,
                task_id,
                rule.interval,
                rule.unit.as_str(),
                rule.end.enabled,
                rule.end.kind.map(|k| k.as_str()),
                rule.end.count,
                rule.end.date.map(format_date),
                rule.current_count,
            ])?;
        }
        Ok(())
    })();

    match result {
        Ok(()) => {
            conn.execute_batch("COMMIT")?;
            Ok(())
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        summary: row.get(1)?,
        status: TaskStatus::from_str(&row.get::<_, String>(2)?).unwrap_or_default(),
        due: row.get(3)?,
        description: row.get(4)?,
    })
}

fn row_to_rule(row: &rusqlite::Row) -> rusqlite::Result<RecurrenceRule> {
    Ok(RecurrenceRule {
        enabled: true,
        interval: row.get(1)?,
        unit: RecurrenceUnit::from_str(&row.get::<_, String>(2)?).unwrap_or_default(),
        end: EndCondition {
            enabled: row.get(3)?,
            kind: row.get::<_, Option<String>>(4)?.as_deref().and_then(EndType::from_str),
            count: row.get(5)?,
            date: row.get::<_, Option<String>>(6)?.as_deref().and_then(parse_date),
        },
        current_count: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{connection::open_in_memory, list_repo};
    use crate::models::RecurrenceRequest;
    use crate::store::TodoListStore;

    fn setup() -> Connection {
        let conn = open_in_memory().unwrap();
        list_repo::create_list(&conn, "L1", "Tasks").unwrap();
        conn
    }

    #[test]
    fn test_unknown_list_loads_none() {
        let conn = setup();
        assert!(load_snapshot(&conn, "nope").unwrap().is_none());
        assert_eq!(load_snapshot(&conn, "L1").unwrap(), Some(ListSnapshot::default()));
    }

    #[test]
    fn test_store_persists_through_sqlite() {
        let conn = setup();
        let until = parse_date("2024-06-30").unwrap();
        {
            let mut store = TodoListStore::new("L1", SqliteStorage::new(&conn));
            let _ = store.create(Task::new("first").with_id("a").with_due("2024-01-02"));
            let _ = store.create(Task::new("second").with_id("b").with_description("notes"));
            let third = Task::new("third").with_id("c").with_status(TaskStatus::Completed);
            let _ = store.create(third);
            let _ = store.move_task("c", None);
            let _ = store.set_recurrence(
                "a",
                &RecurrenceRequest::every(1, RecurrenceUnit::Months).ending_on(until),
            );
        }

        let store = TodoListStore::load("L1", SqliteStorage::new(&conn)).unwrap();
        let ids: Vec<_> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
        assert_eq!(store.get_by_id("b").unwrap().description.as_deref(), Some("notes"));
        assert!(store.get_by_id("c").unwrap().is_completed());

        let rule = store.get_recurrence("a").unwrap();
        assert_eq!(rule.unit, RecurrenceUnit::Months);
        assert_eq!(rule.end.kind, Some(EndType::Date));
        assert_eq!(rule.end.date, Some(until));
    }

    #[test]
    fn test_delete_drops_rule_rows() {
        let conn = setup();
        let mut store = TodoListStore::new("L1", SqliteStorage::new(&conn));
        let _ = store.create(Task::new("x").with_id("x"));
        let _ = store.set_recurrence("x", &RecurrenceRequest::every(1, RecurrenceUnit::Days));
        store.delete(["x"]);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM recurrence_rules", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_save_for_missing_list_fails() {
        let conn = setup();
        let snapshot = ListSnapshot {
            tasks: vec![Task::new("orphan").with_id("o")],
            ..Default::default()
        };
        assert!(save_snapshot(&conn, "missing", &snapshot).is_err());
        assert!(save_snapshot(&conn, "L1", &snapshot).is_ok());
    }

    #[test]
    fn test_deleting_list_cascades() {
        let conn = setup();
        let snapshot = ListSnapshot {
            tasks: vec![Task::new("t").with_id("t")],
            ..Default::default()
        };
        save_snapshot(&conn, "L1", &snapshot).unwrap();
        list_repo::delete_list(&conn, "L1").unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
