use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Format of every date that crosses the boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NeedsAction,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeedsAction => "needs_action",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "needs_action" => Some(Self::NeedsAction),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Empty until the store assigns one.
    #[serde(default)]
    pub id: String,
    pub summary: String,
    #[serde(default)]
    pub status: TaskStatus,
    /// Raw `YYYY-MM-DD`; malformed values are kept and classify as undated.
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Task {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            summary: summary.into(),
            status: TaskStatus::NeedsAction,
            due: None,
            description: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_due(mut self, due: impl Into<String>) -> Self {
        self.due = Some(due.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Parsed due date, `None` when absent or malformed.
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due.as_deref().and_then(parse_date)
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
