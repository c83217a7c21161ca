use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{parse_date, Group};

use super::locale::WeekStart;

/// Inclusive bounds of the calendar week containing a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    pub fn containing(today: NaiveDate, week_start: WeekStart) -> Self {
        let offset = match week_start {
            WeekStart::Monday => today.weekday().num_days_from_monday(),
            WeekStart::Sunday => today.weekday().num_days_from_sunday(),
        } as i64;
        let start = today - Duration::days(offset);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Bucket for a raw due string. Absent or malformed dates are undated.
pub fn classify(due: Option<&str>, today: NaiveDate, week_start: WeekStart) -> Group {
    classify_date(due.and_then(parse_date), today, week_start)
}

/// Overdue dates land in `ThisWeek`; only dates past the window's end are
/// forthcoming.
pub fn classify_date(due: Option<NaiveDate>, today: NaiveDate, week_start: WeekStart) -> Group {
    let Some(due) = due else {
        return Group::NoDueDate;
    };
    let window = WeekWindow::containing(today, week_start);
    if due > window.end {
        Group::Forthcoming
    } else {
        Group::ThisWeek
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    // 2024-01-03 is a Wednesday.
    const WEDNESDAY: &str = "2024-01-03";

    #[test]
    fn test_window_monday_start() {
        let w = WeekWindow::containing(d(WEDNESDAY), WeekStart::Monday);
        assert_eq!(w.start, d("2024-01-01"));
        assert_eq!(w.end, d("2024-01-07"));
    }

    #[test]
    fn test_window_sunday_start() {
        let w = WeekWindow::containing(d(WEDNESDAY), WeekStart::Sunday);
        assert_eq!(w.start, d("2023-12-31"));
        assert_eq!(w.end, d("2024-01-06"));
    }

    #[test]
    fn test_window_on_sunday() {
        let sunday = d("2024-01-07");
        let monday_first = WeekWindow::containing(sunday, WeekStart::Monday);
        assert_eq!(monday_first.start, d("2024-01-01"));
        assert_eq!(monday_first.end, sunday);

        let sunday_first = WeekWindow::containing(sunday, WeekStart::Sunday);
        assert_eq!(sunday_first.start, sunday);
        assert_eq!(sunday_first.end, d("2024-01-13"));
        assert!(sunday_first.contains(sunday));
    }

    #[test]
    fn test_absent_due_is_undated() {
        for today in ["2024-01-01", "2024-02-29", "2030-12-31"] {
            assert_eq!(classify(None, d(today), WeekStart::Monday), Group::NoDueDate);
            assert_eq!(classify(None, d(today), WeekStart::Sunday), Group::NoDueDate);
        }
    }

    #[test]
    fn test_malformed_due_is_undated() {
        let today = d(WEDNESDAY);
        for bad in ["", "tomorrow", "2024-13-01", "2024/01/05", "2024-02-30"] {
            assert_eq!(classify(Some(bad), today, WeekStart::Monday), Group::NoDueDate, "{bad}");
        }
    }

    #[test]
    fn test_this_week_bounds_inclusive() {
        let today = d(WEDNESDAY);
        assert_eq!(classify(Some("2024-01-01"), today, WeekStart::Monday), Group::ThisWeek);
        assert_eq!(classify(Some("2024-01-07"), today, WeekStart::Monday), Group::ThisWeek);
        assert_eq!(classify(Some("2024-01-08"), today, WeekStart::Monday), Group::Forthcoming);
    }

    #[test]
    fn test_week_start_moves_boundary() {
        let today = d(WEDNESDAY);
        assert_eq!(classify(Some("2024-01-07"), today, WeekStart::Sunday), Group::Forthcoming);
        assert_eq!(classify(Some("2023-12-31"), today, WeekStart::Sunday), Group::ThisWeek);
    }

    #[test]
    fn test_overdue_counts_as_this_week() {
        let today = d(WEDNESDAY);
        assert_eq!(classify(Some("2023-06-01"), today, WeekStart::Monday), Group::ThisWeek);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let today = d(WEDNESDAY);
        let first = classify(Some("2024-01-20"), today, WeekStart::Sunday);
        for _ in 0..5 {
            assert_eq!(classify(Some("2024-01-20"), today, WeekStart::Sunday), first);
        }
    }
}
