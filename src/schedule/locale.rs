//! Locale-driven calendar conventions and group labels.

use serde::{Deserialize, Serialize};

use crate::models::Group;

pub const DEFAULT_LOCALE: &str = "en";

/// Marker prefix of a header's flat summary.
pub const HEADER_PREFIX: &str = "--- ";
/// Marker suffix of a header's flat summary.
pub const HEADER_SUFFIX: &str = " ---";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Sunday => "sunday",
        }
    }
}

/// Locales whose calendar week begins on Sunday. Everything else is Monday.
const SUNDAY_FIRST: &[&str] = &["en-us", "en-ca", "es-us", "es-mx", "pt-br", "ja-jp", "he-il"];

/// Canonical form of a locale tag: `en_US.UTF-8` becomes `en-us`.
pub fn normalize(tag: &str) -> String {
    let tag = tag.trim();
    let tag = tag.split(['.', '@']).next().unwrap_or(tag);
    tag.replace('_', "-").to_ascii_lowercase()
}

/// Primary language subtag, lowercased.
pub fn language(tag: &str) -> String {
    let normalized = normalize(tag);
    normalized
        .split('-')
        .next()
        .unwrap_or_default()
        .to_string()
}

pub fn week_start_for(tag: &str) -> WeekStart {
    let normalized = normalize(tag);
    if SUNDAY_FIRST.contains(&normalized.as_str()) {
        WeekStart::Sunday
    } else {
        WeekStart::Monday
    }
}

fn labels(tag: &str) -> [(Group, &'static str); 3] {
    match language(tag).as_str() {
        "es" => [
            (Group::NoDueDate, "Sin fecha de vencimiento"),
            (Group::ThisWeek, "Esta semana"),
            (Group::Forthcoming, "Próximamente"),
        ],
        _ => [
            (Group::NoDueDate, "No due date"),
            (Group::ThisWeek, "This week"),
            (Group::Forthcoming, "Forthcoming"),
        ],
    }
}

pub fn group_label(group: Group, tag: &str) -> &'static str {
    labels(tag)
        .iter()
        .find(|(g, _)| *g == group)
        .map(|(_, label)| *label)
        .unwrap_or_else(|| group.as_str())
}

/// Reverse of [`group_label`] for the given locale.
pub fn group_for_label(label: &str, tag: &str) -> Option<Group> {
    labels(tag)
        .iter()
        .find(|(_, l)| *l == label)
        .map(|(g, _)| *g)
}
