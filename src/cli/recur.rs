use serde_json::{json, Value};

use crate::cli::commands::{Globals, RecurCommands};
use crate::cli::{resolve_task_id, Session};
use crate::error::TodoError;
use crate::models::{parse_date, RecurrenceRequest, RecurrenceRule, RecurrenceUnit};
use crate::output;
use crate::recurrence;

pub fn run(cmd: RecurCommands, globals: &Globals) -> i32 {
    let result = match cmd {
        RecurCommands::Set { id, interval, unit, end, count, until } => {
            build_request(interval, &unit, &end, count, until.as_deref())
                .and_then(|request| run_set(globals, &id, &request))
        }
        RecurCommands::Clear { id } => run_clear(globals, &id),
        RecurCommands::Show { id } => run_show(globals, &id),
    };
    super::finish(result, globals.json)
}

fn build_request(
    interval: u32,
    unit: &str,
    end: &str,
    count: Option<u32>,
    until: Option<&str>,
) -> Result<RecurrenceRequest, TodoError> {
    if interval == 0 {
        return Err(TodoError::validation("--interval must be at least 1"));
    }
    let unit = RecurrenceUnit::from_str(unit)
        .ok_or_else(|| TodoError::validation(format!("Unknown unit: {unit}")))?;
    let request = RecurrenceRequest::every(interval, unit);

    match end {
        "never" => Ok(request),
        "count" => match count {
            Some(n) if n >= 1 => Ok(request.ending_after(n)),
            _ => Err(TodoError::validation("--end count needs --count of at least 1")),
        },
        "date" => {
            let raw = until
                .ok_or_else(|| TodoError::validation("--end date needs --until YYYY-MM-DD"))?;
            let date = parse_date(raw)
                .ok_or_else(|| TodoError::validation(format!("Invalid --until date: {raw}")))?;
            Ok(request.ending_on(date))
        }
        other => Err(TodoError::validation(format!("Unknown end type: {other}"))),
    }
}

fn rule_value(rule: Option<&RecurrenceRule>) -> Value {
    rule.map(output::json::rule_json).unwrap_or(Value::Null)
}

fn run_set(
    globals: &Globals,
    reference: &str,
    request: &RecurrenceRequest,
) -> Result<i32, TodoError> {
    let session = Session::open(globals)?;
    let mut store = session.store()?;
    let id = resolve_task_id(&store, reference)?;
    store
        .set_recurrence(&id, request)
        .ok_or_else(|| TodoError::task_not_found(reference))?;
    let rule = store.get_recurrence(&id);

    if globals.json {
        output::json::print(&output::json::success(json!({
            "task_id": id,
            "recurrence": rule_value(rule)
        })));
    } else if let Some(rule) = rule {
        println!("Task {id} repeats {}", output::text::describe_rule(rule));
    }
    Ok(0)
}

fn run_clear(globals: &Globals, reference: &str) -> Result<i32, TodoError> {
    let session = Session::open(globals)?;
    let mut store = session.store()?;
    let id = resolve_task_id(&store, reference)?;
    store
        .set_recurrence(&id, &RecurrenceRequest::disabled())
        .ok_or_else(|| TodoError::task_not_found(reference))?;

    if globals.json {
        output::json::print(&output::json::success(json!({
            "task_id": id,
            "recurrence": null
        })));
    } else {
        println!("Task {id} no longer repeats");
    }
    Ok(0)
}

fn run_show(globals: &Globals, reference: &str) -> Result<i32, TodoError> {
    let today = globals.today()?;
    let session = Session::open(globals)?;
    let store = session.store()?;
    let id = resolve_task_id(&store, reference)?;
    let rule = store.get_recurrence(&id);
    let exhausted = rule.map(|r| recurrence::is_exhausted(r, today));

    if globals.json {
        output::json::print(&output::json::success(json!({
            "task_id": id,
            "recurrence": rule_value(rule),
            "exhausted": exhausted
        })));
    } else {
        match rule {
            Some(rule) => {
                let suffix = if exhausted == Some(true) { " [finished]" } else { "" };
                println!("Task {id} repeats {}{suffix}", output::text::describe_rule(rule));
            }
            None => println!("Task {id} does not repeat"),
        }
    }
    Ok(0)
}
