use chrono::{Datelike, NaiveDate};
use log::error;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{CalculatorError, Error, Result, ValidationError};
use crate::operations::operations_constants::*;
use crate::portfolio::metrics::{accumulate, market_value};

/// Kind of a ledger operation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Buy,
    Sell,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Buy => OPERATION_KIND_BUY,
            OperationKind::Sell => OPERATION_KIND_SELL,
        }
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            OPERATION_KIND_BUY => Ok(OperationKind::Buy),
            OPERATION_KIND_SELL => Ok(OperationKind::Sell),
            s if OPERATION_KIND_BUY_ALIASES.contains(&s) => Ok(OperationKind::Buy),
            s if OPERATION_KIND_SELL_ALIASES.contains(&s) => Ok(OperationKind::Sell),
            _ => Err(format!("Unknown operation kind: {}", s)),
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Security class of the operated ticker.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    #[serde(alias = "acao")]
    Stock,
    #[serde(alias = "fii")]
    Reit,
    #[serde(alias = "renda_fixa")]
    FixedIncome,
    Etf,
    #[serde(alias = "fundo")]
    Fund,
    #[serde(alias = "cripto")]
    Crypto,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Stock => ASSET_TYPE_STOCK,
            AssetType::Reit => ASSET_TYPE_REIT,
            AssetType::FixedIncome => ASSET_TYPE_FIXED_INCOME,
            AssetType::Etf => ASSET_TYPE_ETF,
            AssetType::Fund => ASSET_TYPE_FUND,
            AssetType::Crypto => ASSET_TYPE_CRYPTO,
        }
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            ASSET_TYPE_STOCK | "acao" | "acoes" => Ok(AssetType::Stock),
            ASSET_TYPE_REIT | "fii" => Ok(AssetType::Reit),
            ASSET_TYPE_FIXED_INCOME | "renda_fixa" => Ok(AssetType::FixedIncome),
            ASSET_TYPE_ETF => Ok(AssetType::Etf),
            ASSET_TYPE_FUND | "fundo" => Ok(AssetType::Fund),
            ASSET_TYPE_CRYPTO | "cripto" => Ok(AssetType::Crypto),
            _ => Err(format!("Unknown asset type: {}", s)),
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Costs charged on an operation. Only [`OperationFees::total`] enters the ledger.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationFees {
    pub brokerage: Decimal,
    pub exchange: Decimal,
    pub other: Decimal,
}

impl OperationFees {
    pub fn new(brokerage: Decimal, exchange: Decimal, other: Decimal) -> Self {
        OperationFees {
            brokerage,
            exchange,
            other,
        }
    }

    /// All costs booked under a single line.
    pub fn flat(total: Decimal) -> Self {
        OperationFees {
            other: total,
            ..Default::default()
        }
    }

    /// Sum of every fee line; fails on overflow.
    pub fn total(&self) -> Result<Decimal> {
        accumulate(accumulate(self.brokerage, self.exchange)?, self.other)
    }
}

/// A single buy or sell of a security, as stored by the backend.
///
/// `operation_kind` is kept as the raw stored string and parsed when the
/// ledger is computed, so that an unknown kind surfaces as a hard error
/// instead of disappearing during deserialization.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub id: Option<String>,
    pub ticker: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub asset_type: AssetType,
    pub operation_kind: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    #[serde(default)]
    pub fees: OperationFees,
    pub operation_date: NaiveDate,
}

impl Operation {
    /// Parses the operation kind; an unrecognised kind is a contract violation.
    pub fn kind(&self) -> Result<OperationKind> {
        OperationKind::from_str(&self.operation_kind).map_err(|_| {
            error!(
                "Operation {} has unsupported kind '{}'",
                self.context(),
                self.operation_kind
            );
            Error::Calculation(CalculatorError::UnsupportedOperationKind {
                operation: self.context(),
                kind: self.operation_kind.clone(),
            })
        })
    }

    /// Fails when the ticker is blank; both ledger folds treat that as a
    /// contract violation.
    pub fn require_ticker(&self) -> Result<&str> {
        let ticker = self.ticker.trim();
        if ticker.is_empty() {
            error!(
                "Operation {} has no ticker. Aborting ledger calculation.",
                self.context()
            );
            return Err(Error::Calculation(CalculatorError::InvalidOperation(
                format!("operation {} has no ticker", self.context()),
            )));
        }
        Ok(ticker)
    }

    /// `quantity * unit_price`, fees excluded.
    pub fn line_cost(&self) -> Result<Decimal> {
        market_value(self.quantity, self.unit_price)
    }

    pub fn fee_total(&self) -> Result<Decimal> {
        self.fees.total()
    }

    /// Whether the line can enter the running totals at all.
    pub fn has_positive_amounts(&self) -> bool {
        self.quantity > Decimal::ZERO && self.unit_price > Decimal::ZERO
    }

    pub fn year_month(&self) -> (i32, u32) {
        (self.operation_date.year(), self.operation_date.month())
    }

    /// Short identification used in logs and errors.
    pub fn context(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("{}@{}", self.ticker, self.operation_date),
        }
    }
}

/// Checks an operation against the ledger's input invariants.
///
/// Import paths call this before handing operations to the engine; the
/// engine itself only re-checks what it cannot survive without.
pub fn validate_operation(operation: &Operation) -> std::result::Result<(), ValidationError> {
    let ticker = operation.ticker.trim();
    if ticker.is_empty() {
        return Err(ValidationError::MissingField("ticker".to_string()));
    }
    if ticker != ticker.to_uppercase() {
        return Err(ValidationError::InvalidInput(format!(
            "Ticker '{}' must be uppercase",
            operation.ticker
        )));
    }
    OperationKind::from_str(&operation.operation_kind).map_err(ValidationError::InvalidInput)?;
    if operation.quantity <= Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!(
            "Quantity must be positive, got {}",
            operation.quantity
        )));
    }
    if operation.unit_price <= Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!(
            "Unit price must be positive, got {}",
            operation.unit_price
        )));
    }
    let fees = operation.fees;
    for (name, value) in [
        ("brokerage", fees.brokerage),
        ("exchange", fees.exchange),
        ("other", fees.other),
    ] {
        if value < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Fee '{}' must not be negative, got {}",
                name, value
            )));
        }
    }
    Ok(())
}
