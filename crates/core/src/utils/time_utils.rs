use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use std::fmt::Write;

use crate::errors::{Error, Result};

/// Converts a UTC instant to a calendar date in the given timezone.
pub fn valuation_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's date in `tz`. Only entry points call this; the engine itself
/// always receives "now" as a parameter.
pub fn valuation_date_today(tz: Tz) -> NaiveDate {
    valuation_date_from_utc(Utc::now(), tz)
}

/// First calendar day of the month containing `date`.
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// January 1st of `year`.
pub fn first_day_of_year(year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| Error::Unexpected(format!("Year {} is out of range", year)))
}

/// Every `(year, month)` from the month of `start` through the month of `end`,
/// inclusive. Empty when `start` is after `end`.
pub fn get_months_between(start: NaiveDate, end: NaiveDate) -> Vec<(i32, u32)> {
    if start > end {
        return Vec::new();
    }
    let mut months = Vec::new();
    let (mut year, mut month) = (start.year(), start.month());
    let last = (end.year(), end.month());
    while (year, month) <= last {
        months.push((year, month));
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    months
}

/// Formats the first day of `(year, month)` with a strftime pattern.
pub fn format_month_label(year: i32, month: u32, format: &str) -> Result<String> {
    let date = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::Unexpected(format!("Invalid month {}-{}", year, month)))?;
    let mut label = String::new();
    write!(label, "{}", date.format(format))
        .map_err(|_| Error::InvalidConfigValue(format!("Invalid month label format '{}'", format)))?;
    Ok(label)
}
