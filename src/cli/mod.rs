pub mod commands;
pub mod init;
pub mod list;
pub mod recur;
pub mod status;
pub mod task;
pub mod view;

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::config::{self, Config};
use crate::db::{connection, SqliteStorage};
use crate::error::TodoError;
use crate::models::{parse_date, TodoList};
use crate::output;
use crate::schedule::{Clock, FixedClock, SystemClock};
use crate::store::TodoListStore;

pub use commands::*;

impl Globals {
    pub fn clock(&self) -> Result<Box<dyn Clock>, TodoError> {
        match self.today.as_deref() {
            Some(raw) => {
                let date = parse_date(raw)
                    .ok_or_else(|| TodoError::validation(format!("Invalid --today date: {raw}")))?;
                Ok(Box::new(FixedClock(date)))
            }
            None => Ok(Box::new(SystemClock)),
        }
    }

    pub fn today(&self) -> Result<NaiveDate, TodoError> {
        Ok(self.clock()?.today())
    }

    pub fn locale(&self, config: &Config) -> String {
        config::resolve_locale(self.locale.as_deref(), config)
    }
}

/// Database, config and the list the command targets.
pub struct Session {
    pub conn: Connection,
    pub config: Config,
    pub list: TodoList,
}

impl Session {
    pub fn open(globals: &Globals) -> Result<Self, TodoError> {
        let conn = connection::open_db()?;
        let config = Config::load()?;
        let list = list::resolve_list(&conn, &config, globals.list.as_deref())?;
        Ok(Self { conn, config, list })
    }

    pub fn store(&self) -> Result<TodoListStore<SqliteStorage<'_>>, TodoError> {
        TodoListStore::load(self.list.id.clone(), SqliteStorage::new(&self.conn))
    }
}

/// Resolve a task reference: exact id, then unique id prefix.
pub fn resolve_task_id<S: crate::store::Storage>(
    store: &TodoListStore<S>,
    reference: &str,
) -> Result<String, TodoError> {
    if store.get_by_id(reference).is_some() {
        return Ok(reference.to_string());
    }
    let matches: Vec<_> = store
        .tasks()
        .iter()
        .filter(|t| t.id.starts_with(reference))
        .collect();
    match matches.len() {
        0 => Err(TodoError::task_not_found(reference)),
        1 => Ok(matches[0].id.clone()),
        _ => {
            let candidates: Vec<String> = matches
                .iter()
                .map(|t| format!("{} ({})", t.summary, t.id))
                .collect();
            Err(TodoError::ambiguous_ref(reference, &candidates))
        }
    }
}

/// Print an error the way the output mode asks and map to an exit code.
pub fn finish(result: Result<i32, TodoError>, json_output: bool) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                output::json::print(&output::json::error(&e));
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}
