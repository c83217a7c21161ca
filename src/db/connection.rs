use std::env;
use std::fs;
use std::path::PathBuf;

use rusqlite::Connection;

use crate::error::TodoError;

use super::migrations;

pub const DATA_DIR_ENV: &str = "BETTER_TODO_DIR";

/// Directory holding the database and config: `$BETTER_TODO_DIR`, or
/// `.better-todo` under the current directory.
pub fn data_dir() -> Result<PathBuf, TodoError> {
    if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let cwd = env::current_dir()?;
    Ok(cwd.join(".better-todo"))
}

/// Get the path to the database.
pub fn db_path() -> Result<PathBuf, TodoError> {
    Ok(data_dir()?.join("better-todo.db"))
}

/// Get the config file path.
pub fn config_path() -> Result<PathBuf, TodoError> {
    Ok(data_dir()?.join("config.json"))
}

/// Open a connection to the database. Returns error if not initialized.
pub fn open_db() -> Result<Connection, TodoError> {
    let path = db_path()?;
    if !path.exists() {
        return Err(TodoError::not_initialized());
    }
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// Initialize the database: create directories, database, and run migrations.
pub fn init_db() -> Result<(PathBuf, Connection), TodoError> {
    let path = db_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok((path, conn))
}

/// Migrated in-memory database.
pub fn open_in_memory() -> Result<Connection, TodoError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> Result<(), TodoError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}
