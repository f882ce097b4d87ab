use anyhow::{anyhow, Context};
use carteira_core::portfolio::history::PeriodFilter;
use carteira_core::settings::LedgerSettings;

pub struct Config {
    pub settings: LedgerSettings,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source; unset keys fall
    /// back to [`LedgerSettings::default`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut settings = LedgerSettings::default();
        if let Some(timezone) = lookup("CARTEIRA_TIMEZONE") {
            settings.timezone = timezone.trim().to_string();
        }
        if let Some(format) = lookup("CARTEIRA_MONTH_LABEL_FORMAT") {
            settings.month_label_format = format;
        }
        if let Some(period) = lookup("CARTEIRA_DEFAULT_PERIOD") {
            settings.default_period = period
                .parse::<PeriodFilter>()
                .map_err(|e| anyhow!(e))
                .context("Invalid CARTEIRA_DEFAULT_PERIOD")?;
        }
        settings
            .validate()
            .context("Invalid ledger configuration")?;

        let log_format = lookup("CARTEIRA_LOG_FORMAT").unwrap_or_else(|| "text".to_string());
        Ok(Self {
            settings,
            log_format,
        })
    }
}
