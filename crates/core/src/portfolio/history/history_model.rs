use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::TRAILING_WINDOW_YEARS;
use crate::errors::Result;
use crate::utils::time_utils::{first_day_of_month, first_day_of_year};

/// Reporting window of the invested-capital history.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodFilter {
    /// January 1st of the current year through now.
    CurrentYear,
    /// January 1st two years back through now.
    #[serde(rename = "trailing-24-months")]
    Trailing24Months,
    /// Month of the earliest operation through now.
    #[default]
    AllTime,
}

impl PeriodFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodFilter::CurrentYear => "current-year",
            PeriodFilter::Trailing24Months => "trailing-24-months",
            PeriodFilter::AllTime => "all-time",
        }
    }

    /// First day of the window.
    ///
    /// `earliest_operation` only matters for [`PeriodFilter::AllTime`]; with
    /// no operations that window starts at the beginning of `now`'s year.
    pub fn window_start(
        &self,
        now: NaiveDate,
        earliest_operation: Option<NaiveDate>,
    ) -> Result<NaiveDate> {
        match self {
            PeriodFilter::CurrentYear => first_day_of_year(now.year()),
            PeriodFilter::Trailing24Months => first_day_of_year(now.year() - TRAILING_WINDOW_YEARS),
            PeriodFilter::AllTime => match earliest_operation {
                Some(date) => Ok(first_day_of_month(date)),
                None => first_day_of_year(now.year()),
            },
        }
    }
}

impl FromStr for PeriodFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "current-year" | "ytd" | "year" => Ok(PeriodFilter::CurrentYear),
            "trailing-24-months" | "24m" | "24-months" => Ok(PeriodFilter::Trailing24Months),
            "all-time" | "all" => Ok(PeriodFilter::AllTime),
            _ => Err(format!("Unknown period filter: {}", s)),
        }
    }
}

impl fmt::Display for PeriodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invested capital at the end of one calendar month.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBalancePoint {
    pub month_label: String,
    pub year: i32,
    pub month: u32,
    /// Balance after the month's operations, rounded to whole units.
    pub cumulative_invested: Decimal,
}
