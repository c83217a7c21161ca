use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceUnit {
    #[default]
    Days,
    Weeks,
    Months,
    Years,
}

impl RecurrenceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "days" => Some(Self::Days),
            "weeks" => Some(Self::Weeks),
            "months" => Some(Self::Months),
            "years" => Some(Self::Years),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndType {
    Count,
    Date,
}

impl EndType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Date => "date",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "count" => Some(Self::Count),
            "date" => Some(Self::Date),
            _ => None,
        }
    }
}

/// When a rule stops producing occurrences. Fields are stored as given;
/// a `Count` end without a count (or `Date` without a date) never ends.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EndCondition {
    #[serde(default)]
    pub enabled: bool,
    #[serde(rename = "type", default)]
    pub kind: Option<EndType>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub enabled: bool,
    pub interval: u32,
    pub unit: RecurrenceUnit,
    #[serde(default)]
    pub end: EndCondition,
    #[serde(default)]
    pub current_count: u32,
}

impl Default for RecurrenceRule {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: 1,
            unit: RecurrenceUnit::Days,
            end: EndCondition::default(),
            current_count: 0,
        }
    }
}

/// Arguments of `set_recurrence`. Absent values take the rule defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecurrenceRequest {
    pub enabled: bool,
    pub interval: Option<u32>,
    pub unit: Option<RecurrenceUnit>,
    pub end_enabled: bool,
    pub end_type: Option<EndType>,
    pub end_count: Option<u32>,
    pub end_date: Option<NaiveDate>,
}

impl RecurrenceRequest {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn every(interval: u32, unit: RecurrenceUnit) -> Self {
        Self {
            enabled: true,
            interval: Some(interval),
            unit: Some(unit),
            ..Self::default()
        }
    }

    pub fn ending_after(mut self, count: u32) -> Self {
        self.end_enabled = true;
        self.end_type = Some(EndType::Count);
        self.end_count = Some(count);
        self
    }

    pub fn ending_on(mut self, date: NaiveDate) -> Self {
        self.end_enabled = true;
        self.end_type = Some(EndType::Date);
        self.end_date = Some(date);
        self
    }
}
