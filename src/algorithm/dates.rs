//! Calendar arithmetic for follow-up intervals.

use chrono::{Datelike, NaiveDate};

/// Whole months between two dates
///
/// Computed as `(end.year - start.year) * 12 + (end.month - start.month)`.
/// The day of month is ignored and the result is negative when `end`
/// precedes `start`. Historical registry values were derived with exactly
/// this formula.
#[must_use]
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32)
}

/// Age in completed years on `today`
#[must_use]
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}
