use super::*;
use crate::errors::Error;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

fn day(s: &str) -> NaiveDate {
    NaiveDate::from_str(s).unwrap()
}

fn assert_invalid(new_transaction: NewTransaction) {
    match new_transaction.validate() {
        Err(Error::Transaction(TransactionError::InvalidTransaction(_))) => {}
        other => panic!("expected InvalidTransaction, got {:?}", other),
    }
}

#[test]
fn test_symbol_is_trimmed_and_uppercased() {
    let t = NewTransaction::buy(" aapl ", dec!(1), dec!(100), day("2024-01-02"))
        .into_transaction()
        .unwrap();
    assert_eq!(t.symbol, "AAPL");
    assert!(!t.id.is_empty());
}

#[test]
fn test_ids_are_unique() {
    let a = NewTransaction::buy("AAPL", dec!(1), dec!(100), day("2024-01-02"))
        .into_transaction()
        .unwrap();
    let b = NewTransaction::buy("AAPL", dec!(1), dec!(100), day("2024-01-02"))
        .into_transaction()
        .unwrap();
    assert_ne!(a.id, b.id);
}

#[test]
fn test_non_positive_fields_are_invalid() {
    assert_invalid(NewTransaction::buy("AAPL", Decimal::ZERO, dec!(100), day("2024-01-02")));
    assert_invalid(NewTransaction::sell("AAPL", dec!(1), dec!(-5), day("2024-01-02")));
    assert_invalid(NewTransaction::dividend("AAPL", Decimal::ZERO, day("2024-01-02")));
    assert_invalid(NewTransaction::buy("  ", dec!(1), dec!(100), day("2024-01-02")));
}

#[test]
fn test_dividend_without_amount_is_invalid() {
    let mut dividend = NewTransaction::dividend("AAPL", dec!(3), day("2024-01-02"));
    dividend.dividend_amount = None;
    assert_invalid(dividend);
}

#[test]
fn test_reinvestment_buy_requires_dividend_reference() {
    let mut buy = NewTransaction::buy("AAPL", dec!(1), dec!(100), day("2024-01-02"));
    buy.is_reinvestment = true;
    assert_invalid(buy.clone());

    buy.dividend_transaction_id = Some("div-1".to_string());
    assert!(buy.validate().is_ok());
}

#[test]
fn test_gross_amount_and_cash_dividend() {
    let buy = NewTransaction::buy("AAPL", dec!(3), dec!(10.5), day("2024-01-02"))
        .into_transaction()
        .unwrap();
    assert_eq!(buy.gross_amount(), dec!(31.5));
    assert_eq!(buy.cash_dividend(), Decimal::ZERO);

    let mut dividend = NewTransaction::dividend("AAPL", dec!(4.2), day("2024-01-02"))
        .into_transaction()
        .unwrap();
    assert_eq!(dividend.cash_dividend(), dec!(4.2));
    dividend.reinvested = true;
    assert_eq!(dividend.cash_dividend(), Decimal::ZERO);
    assert_eq!(dividend.gross_amount(), dec!(4.2));
}

#[test]
fn test_kind_serializes_screaming_case() {
    assert_eq!(
        serde_json::to_string(&TransactionKind::Dividend).unwrap(),
        "\"DIVIDEND\""
    );
    assert_eq!(TransactionKind::from_str("sell").unwrap(), TransactionKind::Sell);
    assert!(TransactionKind::from_str("split").is_err());
}

#[test]
fn test_sort_chronologically_is_stable_for_same_date() {
    let first = NewTransaction::buy("AAPL", dec!(1), dec!(1), day("2024-02-01"))
        .into_transaction()
        .unwrap();
    let second = NewTransaction::sell("AAPL", dec!(1), dec!(2), day("2024-02-01"))
        .into_transaction()
        .unwrap();
    let earlier = NewTransaction::buy("AAPL", dec!(1), dec!(3), day("2024-01-01"))
        .into_transaction()
        .unwrap();
    let all = vec![first.clone(), second.clone(), earlier.clone()];

    let ids: Vec<&str> = sort_chronologically(&all)
        .into_iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(ids, vec![earlier.id.as_str(), first.id.as_str(), second.id.as_str()]);
}

#[test]
fn test_shares_held_at_replays_up_to_date() {
    let all: Vec<Transaction> = vec![
        NewTransaction::buy("XYZ", dec!(10), dec!(10), day("2024-01-01")),
        NewTransaction::buy("XYZ", dec!(5), dec!(12), day("2024-01-05")),
        NewTransaction::sell("XYZ", dec!(8), dec!(15), day("2024-01-10")),
        NewTransaction::buy("ABC", dec!(100), dec!(1), day("2024-01-01")),
    ]
    .into_iter()
    .map(|t| t.into_transaction().unwrap())
    .collect();

    assert_eq!(shares_held_at(&all, "xyz", day("2023-12-31")), Decimal::ZERO);
    assert_eq!(shares_held_at(&all, "XYZ", day("2024-01-05")), dec!(15));
    assert_eq!(shares_held_at(&all, "XYZ", day("2024-01-10")), dec!(7));
}
