use serde_json::{json, Value};
use tracing::warn;

use crate::cli::commands::{Globals, TaskCommands};
use crate::cli::{resolve_task_id, Session};
use crate::error::{ErrorCode, TodoError};
use crate::models::{parse_date, Task, TaskStatus};
use crate::occurrence::{self, Completion};
use crate::output;

pub fn run(cmd: TaskCommands, globals: &Globals) -> i32 {
    let json_output = globals.json;
    let result = match cmd {
        TaskCommands::Add { summary, description, due } => {
            run_add(globals, &summary, description.as_deref(), due.as_deref())
        }
        TaskCommands::Update { id, summary, description, due, no_due, status } => {
            let patch = TaskPatch {
                summary,
                description,
                due,
                clear_due: no_due,
                status: status.as_deref().and_then(TaskStatus::from_str),
            };
            run_update(globals, &id, patch)
        }
        TaskCommands::Delete { ids } => run_delete(globals, &ids),
        TaskCommands::Move { id, after } => run_move(globals, &id, after.as_deref()),
        TaskCommands::Show { id } => run_show(globals, &id),
        TaskCommands::Done { id } => run_done(globals, &id),
    };
    super::finish(result, json_output)
}

struct TaskPatch {
    summary: Option<String>,
    description: Option<String>,
    due: Option<String>,
    clear_due: bool,
    status: Option<TaskStatus>,
}

impl TaskPatch {
    fn apply(self, mut task: Task) -> Task {
        if let Some(summary) = self.summary {
            task.summary = summary;
        }
        if let Some(description) = self.description {
            task.description = Some(description).filter(|d| !d.is_empty());
        }
        if self.clear_due {
            task.due = None;
        } else if let Some(due) = self.due {
            task.due = Some(due);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        task
    }
}

fn validate_summary(summary: &str) -> Result<(), TodoError> {
    if summary.trim().is_empty() {
        return Err(TodoError::validation("Task summary must not be empty"));
    }
    Ok(())
}

/// Malformed due strings are stored as given and grouped as undated.
fn check_due(due: Option<&str>) {
    if let Some(raw) = due {
        if parse_date(raw).is_none() {
            warn!(due = raw, "due date is not YYYY-MM-DD; task will be treated as undated");
        }
    }
}

fn completion_json(c: &Completion) -> Value {
    json!({
        "completed_task": output::json::task_json(&c.task),
        "spawned": c.spawned.as_ref().map(output::json::task_json)
    })
}

fn print_completion(c: &Completion) {
    println!("Completed: {} ({})", c.task.summary, c.task.id);
    if let Some(ref next) = c.spawned {
        println!(
            "Next occurrence: {} ({}) due {}",
            next.summary,
            next.id,
            next.due.as_deref().unwrap_or("-")
        );
    }
}

fn run_add(
    globals: &Globals,
    summary: &str,
    description: Option<&str>,
    due: Option<&str>,
) -> Result<i32, TodoError> {
    validate_summary(summary)?;
    check_due(due);
    let session = Session::open(globals)?;
    let mut store = session.store()?;

    let mut task = Task::new(summary);
    task.description = description.filter(|d| !d.is_empty()).map(str::to_string);
    task.due = due.map(str::to_string);
    let task = store.create(task);

    if globals.json {
        output::json::print(&output::json::success(output::json::task_json(&task)));
    } else {
        println!("Added task: {} ({})", task.summary, task.id);
    }
    Ok(0)
}

fn run_update(globals: &Globals, reference: &str, patch: TaskPatch) -> Result<i32, TodoError> {
    if let Some(ref summary) = patch.summary {
        validate_summary(summary)?;
    }
    check_due(patch.due.as_deref());
    let today = globals.today()?;
    let session = Session::open(globals)?;
    let mut store = session.store()?;
    let id = resolve_task_id(&store, reference)?;
    let existing = store
        .get_by_id(&id)
        .cloned()
        .ok_or_else(|| TodoError::task_not_found(reference))?;

    // Completing an open task goes through the occurrence path so its rule advances.
    let completes = !existing.is_completed() && patch.status == Some(TaskStatus::Completed);
    let mut updated = patch.apply(existing);
    if completes {
        updated.status = TaskStatus::NeedsAction;
        let completion = store.batch(|store| {
            store
                .update(updated)
                .ok_or_else(|| TodoError::task_not_found(reference))?;
            occurrence::complete_task(store, &id, today)
                .ok_or_else(|| TodoError::task_not_found(reference))
        })?;
        if globals.json {
            output::json::print(&output::json::success(completion_json(&completion)));
        } else {
            print_completion(&completion);
        }
        return Ok(0);
    }

    store
        .update(updated)
        .ok_or_else(|| TodoError::task_not_found(reference))?;
    let task = store
        .get_by_id(&id)
        .ok_or_else(|| TodoError::task_not_found(reference))?;
    if globals.json {
        output::json::print(&output::json::success(output::json::task_json(task)));
    } else {
        println!("Updated task: {} ({})", task.summary, task.id);
    }
    Ok(0)
}

fn run_delete(globals: &Globals, references: &[String]) -> Result<i32, TodoError> {
    let session = Session::open(globals)?;
    let mut store = session.store()?;

    let mut ids = Vec::new();
    let mut not_found = Vec::new();
    for reference in references {
        match resolve_task_id(&store, reference) {
            Ok(id) => ids.push(id),
            Err(e) if e.code == ErrorCode::TaskNotFound => not_found.push(reference.clone()),
            Err(e) => return Err(e),
        }
    }
    let removed = store.delete(&ids);

    if globals.json {
        output::json::print(&output::json::success(json!({
            "deleted": ids,
            "removed": removed,
            "not_found": not_found
        })));
    } else {
        println!("Deleted {removed} task(s)");
        for reference in &not_found {
            println!("  not found: {reference}");
        }
    }
    Ok(0)
}

fn run_move(globals: &Globals, reference: &str, after: Option<&str>) -> Result<i32, TodoError> {
    let session = Session::open(globals)?;
    let mut store = session.store()?;
    let id = resolve_task_id(&store, reference)?;
    // An unknown --after target is passed through and lands the task at the end.
    let previous = match after {
        Some(r) => Some(resolve_task_id(&store, r).unwrap_or_else(|_| r.to_string())),
        None => None,
    };
    store
        .move_task(&id, previous.as_deref())
        .ok_or_else(|| TodoError::task_not_found(reference))?;

    let position = store.tasks().iter().position(|t| t.id == id).unwrap_or(0);
    if globals.json {
        output::json::print(&output::json::success(json!({
            "id": id,
            "after": previous,
            "position": position
        })));
    } else {
        println!("Moved task {id} to position {}", position + 1);
    }
    Ok(0)
}

fn run_show(globals: &Globals, reference: &str) -> Result<i32, TodoError> {
    let session = Session::open(globals)?;
    let store = session.store()?;
    let id = resolve_task_id(&store, reference)?;
    let task = store
        .get_by_id(&id)
        .ok_or_else(|| TodoError::task_not_found(reference))?;
    let rule = store.get_recurrence(&id);

    if globals.json {
        let mut v = output::json::task_json(task);
        v["recurrence"] = rule.map(output::json::rule_json).unwrap_or(Value::Null);
        output::json::print(&output::json::success(v));
    } else {
        output::text::print_task(task);
        if let Some(rule) = rule {
            println!("  Repeats: {}", output::text::describe_rule(rule));
        }
    }
    Ok(0)
}

fn run_done(globals: &Globals, reference: &str) -> Result<i32, TodoError> {
    let today = globals.today()?;
    let session = Session::open(globals)?;
    let mut store = session.store()?;
    let id = resolve_task_id(&store, reference)?;
    let completion = occurrence::complete_task(&mut store, &id, today)
        .ok_or_else(|| TodoError::task_not_found(reference))?;

    if globals.json {
        output::json::print(&output::json::success(completion_json(&completion)));
    } else {
        print_completion(&completion);
    }
    Ok(0)
}
