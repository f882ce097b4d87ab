//! Bulk import of operations from CSV files.
//!
//! This is the one validation path shared by every import entry point:
//! rows are parsed, normalized and checked with [`validate_operation`];
//! bad rows are reported back with their line number instead of aborting
//! the whole file.

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::str::FromStr;

use crate::errors::{Error, Result};
use crate::operations::{validate_operation, AssetType, Operation, OperationFees, OperationKind};

/// Columns every operations file must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "date",
    "ticker",
    "asset_type",
    "kind",
    "quantity",
    "unit_price",
];

/// Accepted date layouts, tried in order.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Configuration for CSV parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportConfig {
    /// Field delimiter (default `,`).
    pub delimiter: char,
    /// Decimal separator: `.` (default) or `,`.
    pub decimal_separator: char,
    /// Digit-grouping separator. `None` picks whichever of `.`/`,` is not the
    /// decimal separator.
    pub thousands_separator: Option<char>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig {
            delimiter: ',',
            decimal_separator: '.',
            thousands_separator: None,
        }
    }
}

impl ImportConfig {
    fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .map_err(|_| Error::Import(format!("Delimiter '{}' is not ASCII", self.delimiter)))
    }

    /// Returns the effective thousands separator.
    pub fn effective_thousands_separator(&self) -> char {
        match self.thousands_separator {
            Some(separator) => separator,
            None if self.decimal_separator == ',' => '.',
            None => ',',
        }
    }

    fn validate(&self) -> Result<()> {
        if self.effective_thousands_separator() == self.decimal_separator {
            return Err(Error::Import(format!(
                "Thousands and decimal separator are both '{}'",
                self.decimal_separator
            )));
        }
        Ok(())
    }
}

/// A rejected row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRowError {
    /// 1-based line in the file (the header is line 1).
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ImportRowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Outcome of an import: accepted operations plus rejected rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub operations: Vec<Operation>,
    pub errors: Vec<ImportRowError>,
}

impl ImportResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct OperationCsvRow {
    date: String,
    ticker: String,
    asset_type: String,
    kind: String,
    quantity: String,
    unit_price: String,
    #[serde(default)]
    brokerage_fee: Option<String>,
    #[serde(default)]
    exchange_fee: Option<String>,
    #[serde(default)]
    other_fees: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Parses an operations file.
///
/// Only an unreadable file or a missing required column is a hard error;
/// row-level problems end up in [`ImportResult::errors`].
pub fn parse_operations_csv<R: Read>(reader: R, config: &ImportConfig) -> Result<ImportResult> {
    config.validate()?;
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(config.delimiter_byte()?)
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.eq_ignore_ascii_case(column)) {
            return Err(Error::Import(format!("Missing required column '{}'", column)));
        }
    }
    let normalized_headers: csv::StringRecord =
        headers.iter().map(|h| h.to_ascii_lowercase()).collect();

    let mut result = ImportResult::default();
    for (index, record) in csv_reader.records().enumerate() {
        let line = index + 2;
        let parsed = record
            .map_err(|e| e.to_string())
            .and_then(|r| {
                r.deserialize::<OperationCsvRow>(Some(&normalized_headers))
                    .map_err(|e| e.to_string())
            })
            .and_then(|row| row_to_operation(row, line, config));

        match parsed {
            Ok(operation) => result.operations.push(operation),
            Err(message) => {
                warn!("Rejected operation at line {}: {}", line, message);
                result.errors.push(ImportRowError { line, message });
            }
        }
    }

    debug!(
        "Parsed {} operations ({} rejected rows)",
        result.operations.len(),
        result.errors.len()
    );
    Ok(result)
}

fn row_to_operation(
    row: OperationCsvRow,
    line: usize,
    config: &ImportConfig,
) -> std::result::Result<Operation, String> {
    let operation_date = parse_date(&row.date)?;
    let asset_type = AssetType::from_str(&row.asset_type)?;
    let kind = OperationKind::from_str(&row.kind)?;
    let quantity = parse_decimal(&row.quantity, "quantity", config)?;
    let unit_price = parse_decimal(&row.unit_price, "unit_price", config)?;
    let fees = OperationFees::new(
        parse_optional_decimal(row.brokerage_fee.as_deref(), "brokerage_fee", config)?,
        parse_optional_decimal(row.exchange_fee.as_deref(), "exchange_fee", config)?,
        parse_optional_decimal(row.other_fees.as_deref(), "other_fees", config)?,
    );
    let display_name = row
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let operation = Operation {
        id: Some(format!("csv-{}", line)),
        ticker: row.ticker.trim().to_uppercase(),
        display_name,
        asset_type,
        operation_kind: kind.as_str().to_string(),
        quantity,
        unit_price,
        fees,
        operation_date,
    };
    validate_operation(&operation).map_err(|e| e.to_string())?;
    Ok(operation)
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .ok_or_else(|| format!("Invalid date '{}'", value))
}

fn parse_decimal(
    value: &str,
    field: &str,
    config: &ImportConfig,
) -> std::result::Result<Decimal, String> {
    let raw = value.trim();
    if raw.is_empty() {
        return Err(format!("Required field '{}' is missing", field));
    }
    let (integer_part, fraction) = match raw.split_once(config.decimal_separator) {
        Some((integer_part, fraction)) => (integer_part, Some(fraction)),
        None => (raw, None),
    };
    let separator = config.effective_thousands_separator();
    let digits = strip_digit_groups(integer_part, separator).ok_or_else(|| {
        format!(
            "Invalid {} '{}': misplaced thousands separator '{}'",
            field, raw, separator
        )
    })?;
    let normalized = match fraction {
        Some(fraction) => format!("{}.{}", digits, fraction),
        None => digits,
    };
    Decimal::from_str(&normalized).map_err(|e| format!("Invalid {} '{}': {}", field, raw, e))
}

/// Removes thousands separators from the integer part of a number. Groups
/// after the first must have exactly three digits, so `25,50` is rejected
/// instead of being read as 2550.
fn strip_digit_groups(integer_part: &str, separator: char) -> Option<String> {
    if !integer_part.contains(separator) {
        return Some(integer_part.to_string());
    }
    let unsigned = integer_part.strip_prefix('-').unwrap_or(integer_part);
    let mut groups = unsigned.split(separator);
    let leading = groups.next()?;
    if leading.is_empty() || leading.len() > 3 {
        return None;
    }
    if groups.any(|group| group.len() != 3) {
        return None;
    }
    Some(integer_part.chars().filter(|c| *c != separator).collect())
}

fn parse_optional_decimal(
    value: Option<&str>,
    field: &str,
    config: &ImportConfig,
) -> std::result::Result<Decimal, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(Decimal::ZERO),
        Some(v) => parse_decimal(v, field, config),
    }
}
