use super::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::str::FromStr;

use crate::errors::{CalculatorError, Error, ValidationError};

fn sample_operation() -> Operation {
    Operation {
        id: Some("op-1".to_string()),
        ticker: "PETR4".to_string(),
        display_name: Some("Petrobras PN".to_string()),
        asset_type: AssetType::Stock,
        operation_kind: "buy".to_string(),
        quantity: dec!(100),
        unit_price: dec!(25.50),
        fees: OperationFees::new(dec!(4.90), dec!(0.60), dec!(0)),
        operation_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
    }
}

#[test]
fn operation_kind_parses_case_insensitively_and_aliases() {
    assert_eq!(OperationKind::from_str("BUY").unwrap(), OperationKind::Buy);
    assert_eq!(OperationKind::from_str(" sell ").unwrap(), OperationKind::Sell);
    assert_eq!(OperationKind::from_str("Compra").unwrap(), OperationKind::Buy);
    assert_eq!(OperationKind::from_str("venda").unwrap(), OperationKind::Sell);
    assert!(OperationKind::from_str("dividend").is_err());
}

#[test]
fn asset_type_parses_labels_and_aliases() {
    assert_eq!(AssetType::from_str("stock").unwrap(), AssetType::Stock);
    assert_eq!(AssetType::from_str("FII").unwrap(), AssetType::Reit);
    assert_eq!(
        AssetType::from_str("fixed-income").unwrap(),
        AssetType::FixedIncome
    );
    assert_eq!(AssetType::from_str("Renda Fixa").unwrap(), AssetType::FixedIncome);
    assert_eq!(AssetType::from_str("cripto").unwrap(), AssetType::Crypto);
    assert!(AssetType::from_str("option").is_err());
}

#[test]
fn asset_type_serializes_snake_case() {
    let json = serde_json::to_string(&AssetType::FixedIncome).unwrap();
    assert_eq!(json, "\"fixed_income\"");
    let parsed: AssetType = serde_json::from_str("\"fii\"").unwrap();
    assert_eq!(parsed, AssetType::Reit);
}

#[test]
fn fees_are_summed() {
    let op = sample_operation();
    assert_eq!(op.fee_total().unwrap(), dec!(5.50));
    assert_eq!(op.line_cost().unwrap(), dec!(2550.00));
    assert_eq!(OperationFees::flat(dec!(5.25)).total().unwrap(), dec!(5.25));
}

#[test]
fn unknown_kind_is_a_calculation_error() {
    let mut op = sample_operation();
    op.operation_kind = "split".to_string();
    match op.kind() {
        Err(Error::Calculation(CalculatorError::UnsupportedOperationKind { operation, kind })) => {
            assert_eq!(operation, "op-1");
            assert_eq!(kind, "split");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn context_falls_back_to_ticker_and_date() {
    let mut op = sample_operation();
    op.id = None;
    assert_eq!(op.context(), "PETR4@2023-01-15");
}

#[test]
fn operation_deserializes_from_camel_case_json() {
    let json = r#"{
        "ticker": "VALE3",
        "assetType": "stock",
        "operationKind": "buy",
        "quantity": 50,
        "unitPrice": 62.8,
        "fees": {"brokerage": 5.3},
        "operationDate": "2023-02-20"
    }"#;
    let op: Operation = serde_json::from_str(json).unwrap();
    assert_eq!(op.ticker, "VALE3");
    assert_eq!(op.quantity, dec!(50));
    assert_eq!(op.fee_total().unwrap(), dec!(5.3));
    assert_eq!(op.year_month(), (2023, 2));
    assert!(op.id.is_none());
}

#[test]
fn validation_accepts_well_formed_operation() {
    assert!(validate_operation(&sample_operation()).is_ok());
}

#[test]
fn validation_rejects_broken_fields() {
    let mut op = sample_operation();
    op.ticker = "  ".to_string();
    assert!(matches!(
        validate_operation(&op),
        Err(ValidationError::MissingField(_))
    ));

    let mut op = sample_operation();
    op.ticker = "petr4".to_string();
    assert!(validate_operation(&op).is_err());

    let mut op = sample_operation();
    op.quantity = dec!(0);
    assert!(validate_operation(&op).is_err());

    let mut op = sample_operation();
    op.unit_price = dec!(-1);
    assert!(validate_operation(&op).is_err());

    let mut op = sample_operation();
    op.fees.exchange = dec!(-0.01);
    assert!(validate_operation(&op).is_err());

    let mut op = sample_operation();
    op.operation_kind = "transfer".to_string();
    assert!(validate_operation(&op).is_err());
}

#[test]
fn has_positive_amounts_flags_degenerate_lines() {
    let mut op = sample_operation();
    assert!(op.has_positive_amounts());
    op.quantity = dec!(0);
    assert!(!op.has_positive_amounts());
}
