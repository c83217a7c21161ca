//! Ordered task sequence and recurrence table for one list.
//!
//! Every mutation applies to memory first, then saves a full snapshot
//! through [`Storage`] and signals the [`Notifier`]. A failed save is
//! logged and otherwise ignored: memory stays ahead of durable state until
//! the next successful save.
//!
//! Unknown ids never raise. Mutations report [`Outcome::NotFound`] instead
//! and leave the list untouched.

pub mod notify;
pub mod storage;

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::error::TodoError;
use crate::models::{RecurrenceRequest, RecurrenceRule, Task};
use crate::recurrence;
use crate::view::is_header_uid;

pub use notify::{LogNotifier, Notifier};
pub use storage::{ListSnapshot, MemoryStorage, Storage};

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    NotFound,
}

impl Outcome {
    pub fn ok_or_else<E>(self, err: impl FnOnce() -> E) -> Result<(), E> {
        match self {
            Self::Applied => Ok(()),
            Self::NotFound => Err(err()),
        }
    }
}

pub fn new_task_id() -> String {
    ulid::Ulid::new().to_string()
}

pub struct TodoListStore<S: Storage> {
    list_id: String,
    tasks: Vec<Task>,
    rules: BTreeMap<String, RecurrenceRule>,
    storage: S,
    notifier: Box<dyn Notifier>,
    batch_depth: u32,
    dirty: bool,
}

impl<S: Storage> TodoListStore<S> {
    /// Empty list that has never been saved.
    pub fn new(list_id: impl Into<String>, storage: S) -> Self {
        Self {
            list_id: list_id.into(),
            tasks: Vec::new(),
            rules: BTreeMap::new(),
            storage,
            notifier: Box::new(LogNotifier),
            batch_depth: 0,
            dirty: false,
        }
    }

    /// Open a list from storage; a list never saved before starts empty.
    pub fn load(list_id: impl Into<String>, storage: S) -> Result<Self, TodoError> {
        let mut store = Self::new(list_id, storage);
        if let Some(snapshot) = store.storage.load(&store.list_id)? {
            store.restore(snapshot);
        }
        Ok(store)
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    fn restore(&mut self, snapshot: ListSnapshot) {
        let ListSnapshot { tasks, mut recurrence } = snapshot;
        let mut seen = HashSet::new();
        for mut task in tasks {
            if task.summary.trim().is_empty() {
                warn!(
                    list_id = %self.list_id,
                    task_id = %task.id,
                    "skipping stored task without summary"
                );
                continue;
            }
            if is_header_uid(&task.id) {
                warn!(
                    list_id = %self.list_id,
                    task_id = %task.id,
                    "stored task uses a header id; reassigning"
                );
                let old = std::mem::replace(&mut task.id, new_task_id());
                if let Some(rule) = recurrence.remove(&old) {
                    recurrence.insert(task.id.clone(), rule);
                }
            }
            if task.id.is_empty() {
                task.id = new_task_id();
            }
            if !seen.insert(task.id.clone()) {
                warn!(
                    list_id = %self.list_id,
                    task_id = %task.id,
                    "skipping duplicate stored task"
                );
                continue;
            }
            self.tasks.push(task);
        }
        for (task_id, rule) in recurrence {
            if seen.contains(&task_id) {
                self.rules.insert(task_id, rule);
            } else {
                warn!(
                    list_id = %self.list_id,
                    %task_id,
                    "dropping recurrence rule for unknown task"
                );
            }
        }
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn rules(&self) -> &BTreeMap<String, RecurrenceRule> {
        &self.rules
    }

    pub fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            tasks: self.tasks.clone(),
            recurrence: self.rules.clone(),
        }
    }

    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_completed()).count()
    }

    pub fn completed(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.is_completed())
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Append a task, assigning an id when it has none, repeats one, or
    /// takes a reserved header id.
    pub fn create(&mut self, mut task: Task) -> Task {
        if task.id.is_empty() || is_header_uid(&task.id) || self.position(&task.id).is_some()
        {
            task.id = new_task_id();
        }
        debug!(list_id = %self.list_id, task_id = %task.id, "create task");
        self.tasks.push(task.clone());
        self.commit();
        task
    }

    /// Replace a task in place; its position is kept.
    pub fn update(&mut self, task: Task) -> Outcome {
        let Some(idx) = self.position(&task.id) else {
            return Outcome::NotFound;
        };
        debug!(list_id = %self.list_id, task_id = %task.id, "update task");
        self.tasks[idx] = task;
        self.commit();
        Outcome::Applied
    }

    /// Remove every task whose id is listed, along with its rule. Returns
    /// how many tasks were removed.
    pub fn delete<I, T>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let ids: HashSet<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        let before = self.tasks.len();
        self.tasks.retain(|t| !ids.contains(&t.id));
        let removed = before - self.tasks.len();
        let rules_before = self.rules.len();
        self.rules.retain(|task_id, _| !ids.contains(task_id));
        if removed > 0 || self.rules.len() != rules_before {
            debug!(list_id = %self.list_id, removed, "delete tasks");
            self.commit();
        }
        removed
    }

    /// Re-insert `id` right after `previous_id`, at the head when `None`,
    /// or at the tail when `previous_id` is not in the list.
    pub fn move_task(&mut self, id: &str, previous_id: Option<&str>) -> Outcome {
        let Some(from) = self.position(id) else {
            return Outcome::NotFound;
        };
        let task = self.tasks.remove(from);
        let to = match previous_id {
            None => 0,
            Some(prev) => match self.position(prev) {
                Some(idx) => idx + 1,
                None => self.tasks.len(),
            },
        };
        debug!(list_id = %self.list_id, task_id = %id, to, "move task");
        self.tasks.insert(to, task);
        self.commit();
        Outcome::Applied
    }

    /// Create, overwrite or remove the rule for a task. Progress is reset on
    /// every call that leaves a rule in place.
    pub fn set_recurrence(&mut self, task_id: &str, request: &RecurrenceRequest) -> Outcome {
        if self.position(task_id).is_none() {
            return Outcome::NotFound;
        }
        match recurrence::rule_from_request(request) {
            Some(rule) => {
                debug!(list_id = %self.list_id, %task_id, "set recurrence");
                self.rules.insert(task_id.to_string(), rule);
            }
            None => {
                debug!(list_id = %self.list_id, %task_id, "clear recurrence");
                self.rules.remove(task_id);
            }
        }
        self.commit();
        Outcome::Applied
    }

    pub fn get_recurrence(&self, task_id: &str) -> Option<&RecurrenceRule> {
        self.rules.get(task_id)
    }

    /// Store a rule exactly as given, progress included.
    pub fn put_rule(&mut self, task_id: &str, rule: RecurrenceRule) -> Outcome {
        if self.position(task_id).is_none() {
            return Outcome::NotFound;
        }
        self.rules.insert(task_id.to_string(), rule);
        self.commit();
        Outcome::Applied
    }

    /// Detach and return a task's rule.
    pub fn take_rule(&mut self, task_id: &str) -> Option<RecurrenceRule> {
        let rule = self.rules.remove(task_id)?;
        self.commit();
        Some(rule)
    }

    /// Run several mutations with a single save and notification at the end.
    /// Nested batches fold into the outermost one.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.batch_depth += 1;
        let result = f(self);
        self.batch_depth -= 1;
        if self.batch_depth == 0 && std::mem::take(&mut self.dirty) {
            self.commit();
        }
        result
    }

    fn commit(&mut self) {
        if self.batch_depth > 0 {
            self.dirty = true;
            return;
        }
        let snapshot = self.snapshot();
        if let Err(e) = self.storage.save(&self.list_id, &snapshot) {
            warn!(
                list_id = %self.list_id,
                error = %e,
                "failed to persist list; keeping in-memory state"
            );
        }
        self.notifier.state_changed(&self.list_id, &snapshot);
    }
}
