pub mod locale;
pub mod week;

use chrono::NaiveDate;

pub use locale::WeekStart;
pub use week::{classify, classify_date, WeekWindow};

/// Source of "today" for classification and end-date checks.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the running process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Always reports the same day. Used for `--today` and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
