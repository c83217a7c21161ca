use serde_json::{json, Value};

use crate::error::TodoError;
use crate::models::{RecurrenceRule, Task, TodoList};
use crate::view::{RenderedView, ViewEntry};

pub fn print(value: &Value) {
    println!("{value:#}");
}

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &TodoError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn task_json(t: &Task) -> Value {
    json!({
        "id": t.id,
        "summary": t.summary,
        "status": t.status.as_str(),
        "due": t.due,
        "description": t.description
    })
}

pub fn rule_json(r: &RecurrenceRule) -> Value {
    json!({
        "enabled": r.enabled,
        "interval": r.interval,
        "unit": r.unit.as_str(),
        "end": {
            "enabled": r.end.enabled,
            "type": r.end.kind.map(|k| k.as_str()),
            "count": r.end.count,
            "date": r.end.date.map(|d| d.format("%Y-%m-%d").to_string())
        },
        "current_count": r.current_count
    })
}

pub fn list_json(l: &TodoList) -> Value {
    json!({
        "id": l.id,
        "name": l.name,
        "created_at": l.created_at
    })
}

pub fn entry_json(e: &ViewEntry) -> Value {
    match e {
        ViewEntry::Header { group, label } => json!({
            "kind": "header",
            "id": e.uid(),
            "group": group.as_str(),
            "label": label,
            "summary": e.marked_summary()
        }),
        ViewEntry::Task(t) => {
            let mut v = task_json(t);
            v["kind"] = json!("task");
            v
        }
    }
}

pub fn view_json(view: &RenderedView) -> Value {
    json!({
        "entries": view.entries.iter().map(entry_json).collect::<Vec<_>>(),
        "completed": view.completed.iter().map(task_json).collect::<Vec<_>>()
    })
}
