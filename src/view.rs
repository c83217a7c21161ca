//! Read-side grouped view of a list.
//!
//! Active tasks are bucketed by due date, sorted, and preceded by a header
//! per non-empty bucket. Completed tasks come back separately. Nothing here
//! is persisted; the view is rebuilt on every read.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Group, Task};
use crate::schedule::locale::{self, HEADER_PREFIX, HEADER_SUFFIX};
use crate::schedule::week;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewEntry {
    Header { group: Group, label: String },
    Task(Task),
}

impl ViewEntry {
    pub fn header(group: Group, locale: &str) -> Self {
        Self::Header {
            group,
            label: locale::group_label(group, locale).to_string(),
        }
    }

    /// Stable id: a reserved `header_<group>` for headers, the task id otherwise.
    pub fn uid(&self) -> String {
        match self {
            Self::Header { group, .. } => header_uid(*group),
            Self::Task(task) => task.id.clone(),
        }
    }

    /// Display text; headers are wrapped in their markers.
    pub fn marked_summary(&self) -> String {
        match self {
            Self::Header { label, .. } => format!("{HEADER_PREFIX}{label}{HEADER_SUFFIX}"),
            Self::Task(task) => task.summary.clone(),
        }
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            Self::Task(task) => Some(task),
            Self::Header { .. } => None,
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self, Self::Header { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedView {
    pub entries: Vec<ViewEntry>,
    pub completed: Vec<Task>,
}

impl RenderedView {
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.entries.iter().filter_map(ViewEntry::as_task)
    }

    pub fn groups(&self) -> Vec<Group> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                ViewEntry::Header { group, .. } => Some(*group),
                ViewEntry::Task(_) => None,
            })
            .collect()
    }
}

/// Prefix shared by every header id; task ids never start with it.
pub const HEADER_ID_PREFIX: &str = "header_";

pub fn header_uid(group: Group) -> String {
    format!("{HEADER_ID_PREFIX}{}", group.as_str())
}

pub fn is_header_uid(id: &str) -> bool {
    id.starts_with(HEADER_ID_PREFIX)
}

pub fn is_header_summary(summary: &str) -> bool {
    summary.len() >= HEADER_PREFIX.len() + HEADER_SUFFIX.len()
        && summary.starts_with(HEADER_PREFIX)
        && summary.ends_with(HEADER_SUFFIX)
}

/// Group of a marker-wrapped header summary in the given locale.
pub fn parse_header(summary: &str, locale: &str) -> Option<Group> {
    if !is_header_summary(summary) {
        return None;
    }
    let label = &summary[HEADER_PREFIX.len()..summary.len() - HEADER_SUFFIX.len()];
    locale::group_for_label(label, locale)
}

pub fn render(tasks: &[Task], today: NaiveDate, locale: &str) -> RenderedView {
    let week_start = locale::week_start_for(locale);
    let mut buckets: [Vec<&Task>; 3] = Default::default();
    let mut completed = Vec::new();

    for task in tasks {
        if task.is_completed() {
            completed.push(task.clone());
            continue;
        }
        let group = week::classify(task.due.as_deref(), today, week_start);
        buckets[slot(group)].push(task);
    }

    let mut entries = Vec::with_capacity(tasks.len() + Group::ORDER.len());
    for group in Group::ORDER {
        let members = &mut buckets[slot(group)];
        if members.is_empty() {
            continue;
        }
        // Stable: equal keys keep list order.
        members.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
        entries.push(ViewEntry::header(group, locale));
        entries.extend(members.iter().map(|t| ViewEntry::Task((*t).clone())));
    }

    RenderedView { entries, completed }
}

fn slot(group: Group) -> usize {
    match group {
        Group::NoDueDate => 0,
        Group::ThisWeek => 1,
        Group::Forthcoming => 2,
    }
}

/// Parsed date first so padding differences don't reorder a group; the raw
/// string breaks ties between undated entries.
fn sort_key(task: &Task) -> (Option<NaiveDate>, &str) {
    (task.due_date(), task.due.as_deref().unwrap_or(""))
}
