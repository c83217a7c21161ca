use rusqlite::Connection;
use serde_json::json;

use crate::cli::commands::{Globals, ListCommands};
use crate::config::Config;
use crate::db::{connection, list_repo};
use crate::error::TodoError;
use crate::models::TodoList;
use crate::output;

pub fn run(cmd: ListCommands, globals: &Globals) -> i32 {
    let json_output = globals.json;
    let result = match cmd {
        ListCommands::Create { name } => run_create(&name, json_output),
        ListCommands::Ls => run_ls(json_output),
        ListCommands::Activate { name } => run_activate(&name, json_output),
        ListCommands::Delete { reference } => run_delete(&reference, json_output),
    };
    super::finish(result, json_output)
}

/// The list a command targets: `--list` if given, else the active list.
pub fn resolve_list(
    conn: &Connection,
    config: &Config,
    flag: Option<&str>,
) -> Result<TodoList, TodoError> {
    if let Some(reference) = flag {
        return list_repo::resolve_list(conn, reference);
    }
    let id = config.active_list_id.as_deref().ok_or_else(TodoError::no_active_list)?;
    list_repo::get_list_by_id(conn, id).map_err(|e| match e.code {
        crate::error::ErrorCode::ListNotFound => TodoError::no_active_list(),
        _ => e,
    })
}

fn validate_list_name(name: &str) -> Result<(), TodoError> {
    if name.trim().is_empty() {
        return Err(TodoError::validation("List name must not be empty"));
    }
    Ok(())
}

fn run_create(name: &str, json_output: bool) -> Result<i32, TodoError> {
    validate_list_name(name)?;
    let conn = connection::open_db()?;
    let id = ulid::Ulid::new().to_string();
    let list = list_repo::create_list(&conn, &id, name.trim())?;

    if json_output {
        output::json::print(&output::json::success(output::json::list_json(&list)));
    } else {
        println!("Created list: {} ({})", list.name, list.id);
    }
    Ok(0)
}

fn run_ls(json_output: bool) -> Result<i32, TodoError> {
    let conn = connection::open_db()?;
    let lists = list_repo::list_lists(&conn)?;
    let config = Config::load()?;
    let active_id = config.active_list_id.as_deref();

    if json_output {
        let lists_json: Vec<_> = lists
            .iter()
            .map(|l| {
                let mut v = output::json::list_json(l);
                v["active"] = json!(Some(l.id.as_str()) == active_id);
                v
            })
            .collect();
        output::json::print(&output::json::success(json!({ "lists": lists_json })));
    } else {
        output::text::print_list_overview(&lists, active_id);
    }
    Ok(0)
}

fn run_activate(name: &str, json_output: bool) -> Result<i32, TodoError> {
    let conn = connection::open_db()?;
    let list = list_repo::resolve_list(&conn, name)?;

    let mut config = Config::load()?;
    config.active_list_id = Some(list.id.clone());
    config.save()?;

    if json_output {
        output::json::print(&output::json::success(json!({
            "activated": { "id": list.id, "name": list.name }
        })));
    } else {
        println!("Activated list: {} ({})", list.name, list.id);
    }
    Ok(0)
}

fn run_delete(reference: &str, json_output: bool) -> Result<i32, TodoError> {
    let conn = connection::open_db()?;
    let list = list_repo::resolve_list(&conn, reference)?;
    list_repo::delete_list(&conn, &list.id)?;

    let mut config = Config::load()?;
    if config.active_list_id.as_deref() == Some(list.id.as_str()) {
        config.active_list_id = None;
        config.save()?;
    }

    if json_output {
        output::json::print(&output::json::success(json!({
            "deleted": { "id": list.id, "name": list.name }
        })));
    } else {
        println!("Deleted list: {} ({})", list.name, list.id);
    }
    Ok(0)
}
