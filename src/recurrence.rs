//! Recurrence arithmetic and end-condition evaluation.
//!
//! Rules are attached to tasks through the store; this module only decides
//! what a rule means. "Exhausted" is always computed, never stored.

use chrono::{Duration, Months, NaiveDate};

use crate::models::{EndCondition, EndType, RecurrenceRequest, RecurrenceRule, RecurrenceUnit};

/// Result of stepping a rule forward by one occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    pub rule: RecurrenceRule,
    pub next_due: NaiveDate,
}

/// Rule to store for a request, or `None` when the request disables
/// recurrence. Progress always starts over at zero.
pub fn rule_from_request(request: &RecurrenceRequest) -> Option<RecurrenceRule> {
    if !request.enabled {
        return None;
    }
    let interval = match request.interval {
        Some(n) if n > 0 => n,
        _ => 1,
    };
    Some(RecurrenceRule {
        enabled: true,
        interval,
        unit: request.unit.unwrap_or_default(),
        end: EndCondition {
            enabled: request.end_enabled,
            kind: request.end_type,
            count: request.end_count,
            date: request.end_date,
        },
        current_count: 0,
    })
}

/// Whether the rule has reached its end condition as of `now`.
pub fn is_exhausted(rule: &RecurrenceRule, now: NaiveDate) -> bool {
    if !rule.end.enabled {
        return false;
    }
    match rule.end.kind {
        Some(EndType::Count) => rule
            .end
            .count
            .is_some_and(|limit| rule.current_count >= limit),
        Some(EndType::Date) => rule.end.date.is_some_and(|until| now > until),
        None => false,
    }
}

/// Date one step after `previous`. Months and years shift the calendar
/// field and clamp to the last day of a shorter month.
pub fn next_due(previous: NaiveDate, interval: u32, unit: RecurrenceUnit) -> Option<NaiveDate> {
    let interval = interval.max(1);
    match unit {
        RecurrenceUnit::Days => previous.checked_add_signed(Duration::days(interval as i64)),
        RecurrenceUnit::Weeks => previous.checked_add_signed(Duration::weeks(interval as i64)),
        RecurrenceUnit::Months => previous.checked_add_months(Months::new(interval)),
        RecurrenceUnit::Years => {
            previous.checked_add_months(Months::new(interval.checked_mul(12)?))
        }
    }
}

/// Count one more occurrence and compute its due date. `None` only when
/// the date leaves chrono's supported range.
pub fn advance(rule: &RecurrenceRule, previous_due: NaiveDate) -> Option<Advance> {
    let next_due = next_due(previous_due, rule.interval, rule.unit)?;
    let mut rule = rule.clone();
    rule.current_count = rule.current_count.saturating_add(1);
    Some(Advance { rule, next_due })
}

/// Whether an occurrence due on `due` still falls inside a date-bounded rule.
pub fn allows_due(rule: &RecurrenceRule, due: NaiveDate) -> bool {
    if !rule.end.enabled {
        return true;
    }
    match (rule.end.kind, rule.end.date) {
        (Some(EndType::Date), Some(until)) => due <= until,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_date;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn counted(limit: u32, current: u32) -> RecurrenceRule {
        let request = RecurrenceRequest::every(1, RecurrenceUnit::Days).ending_after(limit);
        let mut rule = rule_from_request(&request).unwrap();
        rule.current_count = current;
        rule
    }

    #[test]
    fn test_request_defaults() {
        let rule = rule_from_request(&RecurrenceRequest {
            enabled: true,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(rule.interval, 1);
        assert_eq!(rule.unit, RecurrenceUnit::Days);
        assert!(!rule.end.enabled);
        assert_eq!(rule.current_count, 0);
    }

    #[test]
    fn test_zero_interval_falls_back_to_one() {
        let rule = rule_from_request(&RecurrenceRequest::every(0, RecurrenceUnit::Weeks)).unwrap();
        assert_eq!(rule.interval, 1);
    }

    #[test]
    fn test_disabled_request_yields_no_rule() {
        assert!(rule_from_request(&RecurrenceRequest::disabled()).is_none());
    }

    #[test]
    fn test_end_fields_stored_verbatim() {
        let request = RecurrenceRequest {
            enabled: true,
            end_enabled: true,
            end_type: Some(EndType::Count),
            end_count: None,
            end_date: Some(d("2024-05-01")),
            ..Default::default()
        };
        let rule = rule_from_request(&request).unwrap();
        assert_eq!(rule.end.kind, Some(EndType::Count));
        assert_eq!(rule.end.count, None);
        assert_eq!(rule.end.date, Some(d("2024-05-01")));
    }

    #[test]
    fn test_count_exhaustion() {
        let today = d("2024-01-01");
        assert!(is_exhausted(&counted(3, 3), today));
        assert!(!is_exhausted(&counted(3, 2), today));
        assert!(is_exhausted(&counted(3, 4), today));
    }

    #[test]
    fn test_date_exhaustion_is_strictly_after() {
        let request = RecurrenceRequest::every(1, RecurrenceUnit::Days).ending_on(d("2024-03-10"));
        let rule = rule_from_request(&request).unwrap();
        assert!(!is_exhausted(&rule, d("2024-03-09")));
        assert!(!is_exhausted(&rule, d("2024-03-10")));
        assert!(is_exhausted(&rule, d("2024-03-11")));
    }

    #[test]
    fn test_disabled_end_never_exhausts() {
        let mut rule = counted(1, 50);
        rule.end.enabled = false;
        assert!(!is_exhausted(&rule, d("2099-01-01")));
    }

    #[test]
    fn test_partial_end_never_exhausts() {
        let mut rule = counted(1, 50);
        rule.end.count = None;
        assert!(!is_exhausted(&rule, d("2024-01-01")));

        rule.end.kind = Some(EndType::Date);
        rule.end.date = None;
        assert!(!is_exhausted(&rule, d("2099-01-01")));

        rule.end.kind = None;
        assert!(!is_exhausted(&rule, d("2099-01-01")));
    }

    #[test]
    fn test_advance_two_weeks() {
        let rule = rule_from_request(&RecurrenceRequest::every(2, RecurrenceUnit::Weeks)).unwrap();
        let step = advance(&rule, d("2024-01-01")).unwrap();
        assert_eq!(step.next_due, d("2024-01-15"));
        assert_eq!(step.rule.current_count, 1);
        assert_eq!(step.rule.interval, 2);
    }

    #[test]
    fn test_advance_days() {
        let rule = rule_from_request(&RecurrenceRequest::every(3, RecurrenceUnit::Days)).unwrap();
        assert_eq!(advance(&rule, d("2024-02-27")).unwrap().next_due, d("2024-03-01"));
    }

    #[test]
    fn test_months_clamp_to_month_end() {
        assert_eq!(next_due(d("2024-01-31"), 1, RecurrenceUnit::Months), Some(d("2024-02-29")));
        assert_eq!(next_due(d("2023-01-31"), 1, RecurrenceUnit::Months), Some(d("2023-02-28")));
        assert_eq!(next_due(d("2024-11-15"), 3, RecurrenceUnit::Months), Some(d("2025-02-15")));
    }

    #[test]
    fn test_years_shift_calendar_field() {
        assert_eq!(next_due(d("2024-02-29"), 1, RecurrenceUnit::Years), Some(d("2025-02-28")));
        assert_eq!(next_due(d("2024-06-10"), 2, RecurrenceUnit::Years), Some(d("2026-06-10")));
    }

    #[test]
    fn test_advance_counts_toward_exhaustion() {
        let rule = counted(2, 0);
        let first = advance(&rule, d("2024-01-01")).unwrap();
        assert!(!is_exhausted(&first.rule, d("2024-01-02")));
        let second = advance(&first.rule, first.next_due).unwrap();
        assert!(is_exhausted(&second.rule, d("2024-01-03")));
    }

    #[test]
    fn test_allows_due_respects_end_date() {
        let request =
            RecurrenceRequest::every(1, RecurrenceUnit::Weeks).ending_on(d("2024-01-10"));
        let rule = rule_from_request(&request).unwrap();
        assert!(allows_due(&rule, d("2024-01-10")));
        assert!(!allows_due(&rule, d("2024-01-11")));
        assert!(allows_due(&counted(1, 5), d("2099-01-01")));
    }
}
