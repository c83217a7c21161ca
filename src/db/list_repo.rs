use rusqlite::{params, Connection};

use crate::error::TodoError;
use crate::models::TodoList;

const LIST_COLUMNS: &str = "SELECT id, name, created_at FROM lists";

pub fn create_list(conn: &Connection, id: &str, name: &str) -> Result<TodoList, TodoError> {
    if find_list_by_name(conn, name)?.is_some() {
        return Err(TodoError::list_name_conflict(name));
    }

    conn.execute(
        "INSERT INTO lists (id, name) VALUES (?1, ?2)",
        params![id, name],
    )?;

    get_list_by_id(conn, id)
}

pub fn get_list_by_id(conn: &Connection, id: &str) -> Result<TodoList, TodoError> {
    conn.query_row(
        &format!("{LIST_COLUMNS} WHERE id = ?1"),
        params![id],
        row_to_list,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => TodoError::list_not_found(id),
        _ => TodoError::from(e),
    })
}

pub fn find_list_by_name(conn: &Connection, name: &str) -> Result<Option<TodoList>, TodoError> {
    let mut stmt = conn.prepare(&format!("{LIST_COLUMNS} WHERE name = ?1"))?;
    let mut rows = stmt.query(params![name])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_list(row)?)),
        None => Ok(None),
    }
}

/// Resolve a list reference: exact name → ULID prefix → name partial match.
pub fn resolve_list(conn: &Connection, reference: &str) -> Result<TodoList, TodoError> {
    if let Some(list) = find_list_by_name(conn, reference)? {
        return Ok(list);
    }

    let by_prefix = query_lists(conn, "WHERE id LIKE ?1", &format!("{reference}%"))?;
    if !by_prefix.is_empty() {
        return single(reference, by_prefix);
    }

    let by_name = query_lists(conn, "WHERE name LIKE ?1", &format!("%{reference}%"))?;
    single(reference, by_name)
}

fn single(reference: &str, mut lists: Vec<TodoList>) -> Result<TodoList, TodoError> {
    match lists.len() {
        0 => Err(TodoError::list_not_found(reference)),
        1 => Ok(lists.remove(0)),
        _ => {
            let candidates: Vec<String> = lists
                .iter()
                .map(|l| format!("{} ({})", l.name, l.id))
                .collect();
            Err(TodoError::ambiguous_ref(reference, &candidates))
        }
    }
}

fn query_lists(conn: &Connection, clause: &str, arg: &str) -> Result<Vec<TodoList>, TodoError> {
    let mut stmt = conn.prepare(&format!("{LIST_COLUMNS} {clause} ORDER BY created_at, name"))?;
    let lists = stmt
        .query_map(params![arg], row_to_list)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lists)
}

pub fn list_lists(conn: &Connection) -> Result<Vec<TodoList>, TodoError> {
    let mut stmt = conn.prepare(&format!("{LIST_COLUMNS} ORDER BY created_at, name"))?;
    let lists = stmt
        .query_map([], row_to_list)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lists)
}

pub fn delete_list(conn: &Connection, id: &str) -> Result<(), TodoError> {
    let changed = conn.execute("DELETE FROM lists WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(TodoError::list_not_found(id));
    }
    Ok(())
}

fn row_to_list(row: &rusqlite::Row) -> rusqlite::Result<TodoList> {
    Ok(TodoList {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::open_in_memory;
    use crate::error::ErrorCode;

    #[test]
    fn test_list_crud() {
        let conn = open_in_memory().unwrap();
        let list = create_list(&conn, "01HLIST000000000000000000A", "Tasks").unwrap();
        assert_eq!(list.name, "Tasks");
        assert_eq!(list_lists(&conn).unwrap().len(), 1);

        delete_list(&conn, &list.id).unwrap();
        assert!(list_lists(&conn).unwrap().is_empty());
        assert_eq!(delete_list(&conn, &list.id).unwrap_err().code, ErrorCode::ListNotFound);
    }

    #[test]
    fn test_name_conflict() {
        let conn = open_in_memory().unwrap();
        create_list(&conn, "id-1", "Tasks").unwrap();
        let err = create_list(&conn, "id-2", "Tasks").unwrap_err();
        assert_eq!(err.code, ErrorCode::ListNameConflict);
    }

    #[test]
    fn test_resolve_order() {
        let conn = open_in_memory().unwrap();
        create_list(&conn, "AAA111", "Shopping List").unwrap();
        create_list(&conn, "BBB222", "Shopping Plans").unwrap();

        assert_eq!(resolve_list(&conn, "Shopping List").unwrap().id, "AAA111");
        assert_eq!(resolve_list(&conn, "BBB").unwrap().name, "Shopping Plans");
        assert_eq!(resolve_list(&conn, "Plans").unwrap().id, "BBB222");
        assert_eq!(resolve_list(&conn, "Shopping").unwrap_err().code, ErrorCode::AmbiguousRef);
        assert_eq!(resolve_list(&conn, "zzz").unwrap_err().code, ErrorCode::ListNotFound);
    }
}
