//! Completing a task, and spawning its next occurrence when it recurs.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::models::{format_date, Task, TaskStatus};
use crate::recurrence;
use crate::store::{Storage, TodoListStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub task: Task,
    /// Next occurrence, placed right after the completed task.
    pub spawned: Option<Task>,
}

/// Mark `task_id` completed. If it carries a live rule, create the next
/// occurrence and move the advanced rule onto it. Completing an already
/// completed task changes nothing. `None` when the id is unknown.
pub fn complete_task<S: Storage>(
    store: &mut TodoListStore<S>,
    task_id: &str,
    today: NaiveDate,
) -> Option<Completion> {
    let task = store.get_by_id(task_id)?.clone();
    if task.is_completed() {
        return Some(Completion { task, spawned: None });
    }

    store.batch(|store| spawn_after(store, task, task_id, today))
}

fn spawn_after<S: Storage>(
    store: &mut TodoListStore<S>,
    task: Task,
    task_id: &str,
    today: NaiveDate,
) -> Option<Completion> {
    let done = task.clone().with_status(TaskStatus::Completed);
    let _ = store.update(done.clone());

    let Some(rule) = store.get_recurrence(task_id).cloned() else {
        return Some(Completion { task: done, spawned: None });
    };
    if recurrence::is_exhausted(&rule, today) {
        info!(%task_id, count = rule.current_count, "recurrence finished");
        return Some(Completion { task: done, spawned: None });
    }

    let base = task.due_date().unwrap_or(today);
    let Some(step) = recurrence::advance(&rule, base) else {
        warn!(%task_id, due = %base, "next occurrence is out of the date range");
        return Some(Completion { task: done, spawned: None });
    };
    if !recurrence::allows_due(&step.rule, step.next_due) {
        info!(%task_id, next_due = %step.next_due, "next occurrence falls after end date");
        return Some(Completion { task: done, spawned: None });
    }

    let mut next = Task::new(task.summary.clone()).with_due(format_date(step.next_due));
    next.description = task.description.clone();
    let next = store.create(next);
    let _ = store.move_task(&next.id, Some(task_id));
    store.take_rule(task_id);
    let _ = store.put_rule(&next.id, step.rule);
    debug!(%task_id, next_id = %next.id, next_due = %step.next_due, "spawned next occurrence");

    Some(Completion {
        task: done,
        spawned: Some(next),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_date, RecurrenceRequest, RecurrenceUnit};
    use crate::store::MemoryStorage;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn store_with(task: Task) -> TodoListStore<MemoryStorage> {
        let mut store = TodoListStore::new("list", MemoryStorage::new());
        let _ = store.create(Task::new("before").with_id("before"));
        let _ = store.create(task);
        let _ = store.create(Task::new("after").with_id("after"));
        store
    }

    #[test]
    fn test_plain_task_just_completes() {
        let mut store = store_with(Task::new("once").with_id("t"));
        let done = complete_task(&mut store, "t", d("2024-01-01")).unwrap();
        assert!(done.task.is_completed());
        assert!(done.spawned.is_none());
        assert_eq!(store.tasks().len(), 3);
    }

    #[test]
    fn test_unknown_task() {
        let mut store = store_with(Task::new("once").with_id("t"));
        assert!(complete_task(&mut store, "missing", d("2024-01-01")).is_none());
    }

    #[test]
    fn test_spawns_next_occurrence_after_completed_task() {
        let mut store = store_with(
            Task::new("water plants")
                .with_id("t")
                .with_due("2024-01-01")
                .with_description("balcony"),
        );
        let _ = store.set_recurrence("t", &RecurrenceRequest::every(2, RecurrenceUnit::Weeks));

        let done = complete_task(&mut store, "t", d("2024-01-02")).unwrap();
        let next = done.spawned.unwrap();
        assert_eq!(next.due.as_deref(), Some("2024-01-15"));
        assert_eq!(next.description.as_deref(), Some("balcony"));
        assert_eq!(next.status, TaskStatus::NeedsAction);

        let order: Vec<_> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, ["before", "t", next.id.as_str(), "after"]);

        assert!(store.get_recurrence("t").is_none());
        assert_eq!(store.get_recurrence(&next.id).unwrap().current_count, 1);
    }

    #[test]
    fn test_undated_task_advances_from_today() {
        let mut store = store_with(Task::new("stretch").with_id("t"));
        let _ = store.set_recurrence("t", &RecurrenceRequest::every(1, RecurrenceUnit::Days));
        let next = complete_task(&mut store, "t", d("2024-03-31")).unwrap().spawned.unwrap();
        assert_eq!(next.due.as_deref(), Some("2024-04-01"));
    }

    #[test]
    fn test_count_limit_stops_spawning() {
        let mut store = store_with(Task::new("pill").with_id("t").with_due("2024-01-01"));
        let request = RecurrenceRequest::every(1, RecurrenceUnit::Days).ending_after(2);
        let _ = store.set_recurrence("t", &request);

        let first = complete_task(&mut store, "t", d("2024-01-01")).unwrap();
        let first = first.spawned.unwrap();
        let second = complete_task(&mut store, &first.id, d("2024-01-02")).unwrap();
        let second = second.spawned.unwrap();
        let third = complete_task(&mut store, &second.id, d("2024-01-03")).unwrap();
        assert!(third.spawned.is_none());
        assert_eq!(store.get_recurrence(&second.id).unwrap().current_count, 2);
    }

    #[test]
    fn test_end_date_stops_spawning() {
        let mut store = store_with(Task::new("report").with_id("t").with_due("2024-01-25"));
        let _ = store.set_recurrence(
            "t",
            &RecurrenceRequest::every(1, RecurrenceUnit::Weeks).ending_on(d("2024-01-31")),
        );
        let done = complete_task(&mut store, "t", d("2024-01-25")).unwrap();
        assert!(done.spawned.is_none());
        assert!(store.get_recurrence("t").is_some());
    }

    #[test]
    fn test_completing_twice_does_not_spawn_twice() {
        let mut store = store_with(Task::new("daily").with_id("t").with_due("2024-01-01"));
        let _ = store.set_recurrence("t", &RecurrenceRequest::every(1, RecurrenceUnit::Days));
        assert!(complete_task(&mut store, "t", d("2024-01-01")).unwrap().spawned.is_some());
        assert!(complete_task(&mut store, "t", d("2024-01-01")).unwrap().spawned.is_none());
        assert_eq!(store.tasks().len(), 4);
    }

    #[test]
    fn test_completion_is_saved_once() {
        let mut store = store_with(Task::new("daily").with_id("t").with_due("2024-01-01"));
        let _ = store.set_recurrence("t", &RecurrenceRequest::every(1, RecurrenceUnit::Days));
        let saves = store.storage().save_count();

        let next = complete_task(&mut store, "t", d("2024-01-01")).unwrap();
        let next = next.spawned.unwrap();
        assert_eq!(store.storage().save_count(), saves + 1);

        let reloaded = TodoListStore::load("list", store.storage()).unwrap();
        assert!(reloaded.get_by_id("t").unwrap().is_completed());
        assert!(reloaded.get_recurrence("t").is_none());
        assert_eq!(reloaded.get_recurrence(&next.id).unwrap().current_count, 1);
    }

    #[test]
    fn test_failed_save_leaves_durable_state_whole() {
        let mut store = store_with(Task::new("daily").with_id("t").with_due("2024-01-01"));
        let _ = store.set_recurrence("t", &RecurrenceRequest::every(1, RecurrenceUnit::Days));
        store.storage().set_fail_saves(true);
        assert!(complete_task(&mut store, "t", d("2024-01-01")).unwrap().spawned.is_some());

        let reloaded = TodoListStore::load("list", store.storage()).unwrap();
        assert!(!reloaded.get_by_id("t").unwrap().is_completed());
        assert!(reloaded.get_recurrence("t").is_some());
        assert_eq!(reloaded.tasks().len(), 3);
    }
}
