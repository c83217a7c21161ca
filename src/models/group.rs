use serde::{Deserialize, Serialize};

/// Display bucket of an active task. Derived on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    NoDueDate,
    ThisWeek,
    Forthcoming,
}

impl Group {
    /// Emission order of the rendered view.
    pub const ORDER: [Group; 3] = [Group::NoDueDate, Group::ThisWeek, Group::Forthcoming];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoDueDate => "no_due_date",
            Self::ThisWeek => "this_week",
            Self::Forthcoming => "forthcoming",
        }
    }
}
