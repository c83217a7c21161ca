use crate::models::{EndType, RecurrenceRule, Task, TodoList};
use crate::view::{RenderedView, ViewEntry};

fn short(id: &str) -> &str {
    &id[..std::cmp::min(8, id.len())]
}

pub fn print_list_overview(lists: &[TodoList], active_id: Option<&str>) {
    if lists.is_empty() {
        println!("No lists found.");
        return;
    }
    for l in lists {
        let marker = if Some(l.id.as_str()) == active_id { " *" } else { "" };
        println!("  {} ({}){}", l.name, short(&l.id), marker);
    }
}

pub fn print_task(t: &Task) {
    println!("Task: {} ({})", t.summary, t.id);
    if let Some(ref desc) = t.description {
        println!("  Description: {desc}");
    }
    println!("  Status: {}", t.status.as_str());
    if let Some(ref due) = t.due {
        println!("  Due: {due}");
    }
}

pub fn print_task_line(t: &Task) {
    let check = if t.is_completed() { "x" } else { " " };
    let due = t.due.as_deref().map(|d| format!(" (due {d})")).unwrap_or_default();
    println!("  [{check}] {}{} {}", t.summary, due, short(&t.id));
}

pub fn describe_rule(r: &RecurrenceRule) -> String {
    let mut text = format!("every {} {}", r.interval, r.unit.as_str());
    if r.end.enabled {
        match (r.end.kind, r.end.count, r.end.date) {
            (Some(EndType::Count), Some(n), _) => text.push_str(&format!(", {n} times")),
            (Some(EndType::Date), _, Some(d)) => text.push_str(&format!(", until {d}")),
            _ => {}
        }
    }
    text.push_str(&format!(" ({} so far)", r.current_count));
    text
}

pub fn print_view(view: &RenderedView, show_completed: bool) {
    if view.entries.is_empty() {
        println!("No open tasks.");
    }
    for entry in &view.entries {
        match entry {
            ViewEntry::Header { .. } => println!("{}", entry.marked_summary()),
            ViewEntry::Task(t) => print_task_line(t),
        }
    }
    if show_completed && !view.completed.is_empty() {
        println!("Completed");
        for t in &view.completed {
            print_task_line(t);
        }
    }
}
