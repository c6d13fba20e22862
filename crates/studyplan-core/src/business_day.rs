//! Business-day rollover.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Check if `date` falls on Monday through Friday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The first weekday strictly after `date`.
///
/// Adds one day, then skips Saturday and Sunday; at most two extra steps.
pub fn next_business_day(date: NaiveDate) -> NaiveDate {
    let mut next = date + Duration::days(1);
    while !is_business_day(next) {
        next += Duration::days(1);
    }
    next
}
