use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::TodoError;
use crate::models::{RecurrenceRule, Task};

/// Everything persisted for one list: ordered tasks plus the rule table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSnapshot {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub recurrence: BTreeMap<String, RecurrenceRule>,
}

/// Load/save of whole-list snapshots keyed by list id.
///
/// `save` replaces whatever was stored before and must be safe to repeat.
pub trait Storage {
    fn load(&self, list_id: &str) -> Result<Option<ListSnapshot>, TodoError>;
    fn save(&self, list_id: &str, snapshot: &ListSnapshot) -> Result<(), TodoError>;
}

impl<T: Storage + ?Sized> Storage for &T {
    fn load(&self, list_id: &str) -> Result<Option<ListSnapshot>, TodoError> {
        (**self).load(list_id)
    }

    fn save(&self, list_id: &str, snapshot: &ListSnapshot) -> Result<(), TodoError> {
        (**self).save(list_id, snapshot)
    }
}

/// In-process storage holding JSON-encoded snapshots.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: RefCell<HashMap<String, String>>,
    saves: Cell<usize>,
    fail_saves: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `save` fail until reset.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn insert_raw(&self, list_id: &str, json: impl Into<String>) {
        self.records.borrow_mut().insert(list_id.to_string(), json.into());
    }
}

impl Storage for MemoryStorage {
    fn load(&self, list_id: &str) -> Result<Option<ListSnapshot>, TodoError> {
        match self.records.borrow().get(list_id) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, list_id: &str, snapshot: &ListSnapshot) -> Result<(), TodoError> {
        if self.fail_saves.get() {
            return Err(TodoError::database(format!("save of list {list_id} refused")));
        }
        let raw = serde_json::to_string(snapshot)?;
        self.records.borrow_mut().insert(list_id.to_string(), raw);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
