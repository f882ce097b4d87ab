use std::path::PathBuf;
use std::sync::Arc;

use carteira_core::operations::{AssetType, ImportConfig};
use carteira_core::portfolio::history::PeriodFilter;
use carteira_core::portfolio::ledger::{LedgerService, LedgerServiceTrait};
use carteira_core::utils::time_utils::valuation_date_today;
use chrono::NaiveDate;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::sources::{FileOperationRepository, FileQuoteProvider};

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout carries only the JSON report.
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Where the ledger reads its inputs from.
pub struct Sources {
    pub operations: PathBuf,
    pub quotes: Option<PathBuf>,
    pub import_config: ImportConfig,
    pub skip_invalid_rows: bool,
}

/// One report the binary can print.
pub enum Report {
    Positions,
    Summary,
    History {
        period: Option<PeriodFilter>,
        asset_type: Option<AssetType>,
        now: Option<NaiveDate>,
    },
}

pub fn build_service(config: &Config, sources: Sources) -> anyhow::Result<LedgerService> {
    let repository = Arc::new(FileOperationRepository::new(
        sources.operations,
        sources.import_config,
        sources.skip_invalid_rows,
    ));
    let quote_provider = Arc::new(FileQuoteProvider::new(sources.quotes));
    Ok(LedgerService::new(
        repository,
        quote_provider,
        config.settings.clone(),
    )?)
}

/// Runs one report and renders it as pretty JSON.
pub fn run_report(service: &LedgerService, report: Report) -> anyhow::Result<String> {
    let rendered = match report {
        Report::Positions => serde_json::to_string_pretty(&service.get_positions()?)?,
        Report::Summary => serde_json::to_string_pretty(&service.get_portfolio_summary()?)?,
        Report::History {
            period,
            asset_type,
            now,
        } => {
            let now = match now {
                Some(date) => date,
                None => valuation_date_today(service.settings().tz()?),
            };
            tracing::debug!("History requested as of {}", now);
            serde_json::to_string_pretty(&service.get_invested_history(period, asset_type, now)?)?
        }
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    const SEED_CSV: &str = "date,ticker,asset_type,kind,quantity,unit_price,brokerage_fee,name\n\
        2023-01-15,PETR4,stock,buy,100,25.50,5.50,Petrobras PN\n\
        2023-02-20,VALE3,acao,compra,50,62.80,5.30,\n\
        2025-08-15,PETR4,stock,sell,50,38.00,5.25,\n";

    fn seed_service(quotes: Option<&str>) -> (LedgerService, Vec<tempfile::NamedTempFile>) {
        let mut ops_file = Builder::new().suffix(".csv").tempfile().unwrap();
        ops_file.write_all(SEED_CSV.as_bytes()).unwrap();
        let mut keep = Vec::new();
        let quotes_path = quotes.map(|contents| {
            let mut file = Builder::new().suffix(".json").tempfile().unwrap();
            file.write_all(contents.as_bytes()).unwrap();
            let path = file.path().to_path_buf();
            keep.push(file);
            path
        });
        let config = Config::from_lookup(|_| None).unwrap();
        let service = build_service(
            &config,
            Sources {
                operations: ops_file.path().to_path_buf(),
                quotes: quotes_path,
                import_config: ImportConfig::default(),
                skip_invalid_rows: false,
            },
        )
        .unwrap();
        keep.push(ops_file);
        (service, keep)
    }

    #[test]
    fn positions_report_from_csv_and_quotes() {
        let (service, _files) = seed_service(Some(r#"{"PETR4": 30.0}"#));
        let output = run_report(&service, Report::Positions).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        let positions = json.as_array().unwrap();
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0]["ticker"], "PETR4");
        assert_eq!(positions[0]["displayName"], "Petrobras PN");
        assert_eq!(positions[0]["unrealizedPnl"].as_f64(), Some(839.25));
        assert_eq!(positions[1]["displayName"], "VALE3");
        assert!(positions[1]["currentValue"].is_null());
    }

    #[test]
    fn summary_report_without_quotes() {
        let (service, _files) = seed_service(None);
        let output = run_report(&service, Report::Summary).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["positionCount"], 2);
        assert_eq!(json["totalCostBasis"].as_f64(), Some(3806.05));
        assert!(json["currentValue"].is_null());
        assert_eq!(json["unquotedTickers"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn history_report_with_fixed_now() {
        let (service, _files) = seed_service(None);
        let output = run_report(
            &service,
            Report::History {
                period: Some(PeriodFilter::CurrentYear),
                asset_type: None,
                now: NaiveDate::from_ymd_opt(2025, 9, 1),
            },
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        let points = json.as_array().unwrap();
        assert_eq!(points.len(), 9);
        assert_eq!(points[0]["monthLabel"], "Jan/25");
        assert_eq!(points[7]["cumulativeInvested"].as_f64(), Some(3806.0));
    }
}
