use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::{DEFAULT_MONTH_LABEL_FORMAT, DEFAULT_TIMEZONE};
use crate::errors::{Error, Result};
use crate::portfolio::history::PeriodFilter;
use crate::utils::time_utils::format_month_label;

/// Tunables shared by the ledger views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LedgerSettings {
    /// strftime pattern for history labels (default `%b/%y`).
    pub month_label_format: String,
    /// IANA time zone used to derive "today" at the entry points.
    pub timezone: String,
    /// Window used when a caller does not choose one.
    pub default_period: PeriodFilter,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        LedgerSettings {
            month_label_format: DEFAULT_MONTH_LABEL_FORMAT.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            default_period: PeriodFilter::AllTime,
        }
    }
}

impl LedgerSettings {
    /// Parsed time zone.
    pub fn tz(&self) -> Result<Tz> {
        Tz::from_str(&self.timezone).map_err(|_| {
            Error::InvalidConfigValue(format!("Unknown time zone '{}'", self.timezone))
        })
    }

    /// Checks every field so that a bad value fails at startup rather than
    /// in the middle of a computation.
    pub fn validate(&self) -> Result<()> {
        self.tz()?;
        format_month_label(2000, 1, &self.month_label_format)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = LedgerSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.tz().unwrap(), chrono_tz::America::Sao_Paulo);
        assert_eq!(settings.default_period, PeriodFilter::AllTime);
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let settings = LedgerSettings {
            timezone: "Mars/Olympus_Mons".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(Error::InvalidConfigValue(_))
        ));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let settings: LedgerSettings =
            serde_json::from_str(r#"{"defaultPeriod":"current-year"}"#).unwrap();
        assert_eq!(settings.default_period, PeriodFilter::CurrentYear);
        assert_eq!(settings.month_label_format, "%b/%y");
    }
}
