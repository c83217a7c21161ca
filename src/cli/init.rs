use serde_json::json;
use tracing::info;

use crate::cli::commands::Globals;
use crate::config::Config;
use crate::db::{connection, list_repo};
use crate::error::TodoError;
use crate::output;

pub const DEFAULT_LIST_NAME: &str = "Tasks";

pub fn run(globals: &Globals) -> i32 {
    super::finish(run_inner(globals.json), globals.json)
}

fn run_inner(json_output: bool) -> Result<i32, TodoError> {
    let (path, conn) = connection::init_db()?;

    let mut lists = list_repo::list_lists(&conn)?;
    if lists.is_empty() {
        let id = ulid::Ulid::new().to_string();
        lists.push(list_repo::create_list(&conn, &id, DEFAULT_LIST_NAME)?);
        info!(list_id = %id, "created default list");
    }

    let mut config = Config::load()?;
    let active = match config
        .active_list_id
        .as_deref()
        .and_then(|id| lists.iter().find(|l| l.id == id))
    {
        Some(list) => list.clone(),
        None => {
            let list = lists[0].clone();
            config.active_list_id = Some(list.id.clone());
            config.save()?;
            list
        }
    };

    if json_output {
        output::json::print(&output::json::success(json!({
            "path": path.to_string_lossy(),
            "list": output::json::list_json(&active)
        })));
    } else {
        println!("Initialized better-todo at {}", path.display());
        println!("Active list: {} ({})", active.name, active.id);
    }
    Ok(0)
}
