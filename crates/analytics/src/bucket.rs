//! Date bucketing
//!
//! Bucket keys are `YYYY-MM-DD` strings, so they sort chronologically:
//!
//! - day: the date itself
//! - week: the Sunday that starts the date's week
//! - month: the first of the month
//!
//! [`enumerate_buckets`] walks from the start date in fixed strides (1 day,
//! 7 days, 1 calendar month) and emits one key per step. The week stride is
//! taken from the raw start date, not from its week start, so a range that
//! begins mid-week may stop before the week containing the end date.
//!
//! A month step keeps the day of month and rolls over when the target month is
//! too short: Oct 31 steps to Nov 31, which is Dec 1. The shifted day is kept
//! for every later step, so November is skipped in that walk.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};

use crate::query::GroupBy;

/// Bucket key for a calendar date
pub fn bucket_key(date: NaiveDate, granularity: GroupBy) -> String {
    match granularity {
        GroupBy::Day => date.format("%Y-%m-%d").to_string(),
        GroupBy::Week => {
            let offset = Days::new(u64::from(date.weekday().num_days_from_sunday()));
            date.checked_sub_days(offset)
                .unwrap_or(date)
                .format("%Y-%m-%d")
                .to_string()
        }
        GroupBy::Month => format!("{:04}-{:02}-01", date.year(), date.month()),
    }
}

/// Bucket key for a UTC timestamp
pub fn bucket_key_for(ts: DateTime<Utc>, granularity: GroupBy) -> String {
    bucket_key(ts.date_naive(), granularity)
}

/// All bucket keys from `start` through `end`, in order
///
/// Duplicates are kept. Returns an empty list when `start > end`.
pub fn enumerate_buckets(start: NaiveDate, end: NaiveDate, granularity: GroupBy) -> Vec<String> {
    let mut keys = Vec::new();
    let mut current = Some(start);

    while let Some(date) = current
        && date <= end
    {
        keys.push(bucket_key(date, granularity));
        current = next_step(date, granularity);
    }

    keys
}

/// Date one stride after `date`
fn next_step(date: NaiveDate, granularity: GroupBy) -> Option<NaiveDate> {
    match granularity {
        GroupBy::Day => date.checked_add_days(Days::new(1)),
        GroupBy::Week => date.checked_add_days(Days::new(7)),
        GroupBy::Month => add_month_rolling(date),
    }
}

/// Same day of month in the next month, overflowing into the month after
///
/// Jan 31 gives Mar 2 in a leap year.
fn add_month_rolling(date: NaiveDate) -> Option<NaiveDate> {
    let next_first = date.with_day(1)?.checked_add_months(Months::new(1))?;
    next_first.checked_add_days(Days::new(u64::from(date.day0())))
}
