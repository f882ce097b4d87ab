//! Carteira - investment ledger reports from the command line.
//!
//! Subcommands:
//! - positions: open positions with average cost and mark-to-market P&L
//! - summary: portfolio-wide rollup of the positions
//! - history: monthly cumulative invested capital

mod config;
mod main_lib;
mod sources;

use anyhow::Result;
use carteira_core::operations::{AssetType, ImportConfig};
use carteira_core::portfolio::history::PeriodFilter;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use config::Config;
use main_lib::{build_service, init_tracing, run_report, Report, Sources};

#[derive(Parser, Debug)]
#[command(name = "carteira")]
#[command(about = "Positions and invested-capital history from a buy/sell ledger", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Operations file (.json array or .csv)
    #[arg(short, long, global = true, default_value = "operations.csv")]
    operations: PathBuf,

    /// Latest quotes as a JSON object of ticker to price
    #[arg(short, long, global = true)]
    quotes: Option<PathBuf>,

    /// CSV field delimiter
    #[arg(long, global = true, default_value_t = ',')]
    delimiter: char,

    /// CSV decimal separator ('.' or ',')
    #[arg(long, global = true, default_value_t = '.')]
    decimal_separator: char,

    /// CSV thousands separator (defaults to whichever of '.'/',' is not the decimal separator)
    #[arg(long, global = true)]
    thousands_separator: Option<char>,

    /// Skip invalid CSV rows instead of failing
    #[arg(long, global = true)]
    skip_invalid_rows: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print open positions
    Positions,

    /// Print the portfolio summary
    Summary,

    /// Print the monthly invested-capital series
    History {
        /// current-year, trailing-24-months or all-time (defaults to CARTEIRA_DEFAULT_PERIOD)
        #[arg(short, long)]
        period: Option<PeriodFilter>,

        /// Only include operations of this asset type
        #[arg(short, long)]
        asset_type: Option<AssetType>,

        /// Reference date (YYYY-MM-DD), defaults to today in the configured time zone
        #[arg(long)]
        now: Option<NaiveDate>,
    },
}

fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_format);

    let cli = Cli::parse();
    let report = match cli.command {
        Commands::Positions => Report::Positions,
        Commands::Summary => Report::Summary,
        Commands::History {
            period,
            asset_type,
            now,
        } => Report::History {
            period,
            asset_type,
            now,
        },
    };

    tracing::debug!("Reading operations from {}", cli.operations.display());
    let service = build_service(
        &config,
        Sources {
            operations: cli.operations,
            quotes: cli.quotes,
            import_config: ImportConfig {
                delimiter: cli.delimiter,
                decimal_separator: cli.decimal_separator,
                thousands_separator: cli.thousands_separator,
            },
            skip_invalid_rows: cli.skip_invalid_rows,
        },
    )?;
    println!("{}", run_report(&service, report)?);
    Ok(())
}
