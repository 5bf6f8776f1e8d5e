//! Date utilities for attendance timelines.

use chrono::{Months, NaiveDate, NaiveTime};

/// Converts a calendar date to the Unix timestamp of its midnight (UTC).
///
/// Timeline data is keyed by these timestamps, one per attendance date.
pub fn date_to_epoch(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// The date twelve months before `date`.
///
/// Saturates to the minimum representable date rather than failing, so a
/// window computed from it covers everything.
pub fn one_year_before(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN)
}
