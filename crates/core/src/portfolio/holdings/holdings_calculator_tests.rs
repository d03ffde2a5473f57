use super::*;
use crate::errors::{Error, LedgerError};
use crate::portfolio::lots::CostBasisMethod;
use crate::transactions::{
    NewTransaction, Reinvestment, Transaction, TransactionError, TransactionLog,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

fn day(s: &str) -> NaiveDate {
    NaiveDate::from_str(s).unwrap()
}

fn tx(new_transaction: NewTransaction) -> Transaction {
    new_transaction.into_transaction().unwrap()
}

fn xyz_history() -> Vec<Transaction> {
    vec![
        tx(NewTransaction::buy("XYZ", dec!(10), dec!(10), day("2024-01-01"))),
        tx(NewTransaction::buy("XYZ", dec!(5), dec!(12), day("2024-01-05"))),
        tx(NewTransaction::sell("XYZ", dec!(8), dec!(15), day("2024-01-10"))),
    ]
}

#[test]
fn test_build_holding_replays_fifo_example() {
    let holding = build_holding("XYZ", &xyz_history(), CostBasisMethod::Fifo).unwrap();

    assert_eq!(holding.total_shares(), dec!(7));
    assert_eq!(holding.total_cost_basis(), dec!(80));
    assert_eq!(holding.average_cost().round_dp(2), dec!(11.43));
    assert_eq!(holding.realized_gain(), dec!(40));
    assert_eq!(holding.sales.len(), 1);
    assert_eq!(holding.first_acquired, Some(day("2024-01-01")));
}

#[test]
fn test_build_holding_sorts_out_of_order_input() {
    let mut history = xyz_history();
    history.reverse();

    let holding = build_holding("xyz", &history, CostBasisMethod::Fifo).unwrap();
    assert_eq!(holding.total_shares(), dec!(7));
    assert_eq!(holding.realized_gain(), dec!(40));
}

#[test]
fn test_build_holding_with_lifo() {
    let holding = build_holding("XYZ", &xyz_history(), CostBasisMethod::Lifo).unwrap();
    assert_eq!(holding.total_cost_basis(), dec!(70));
    assert_eq!(holding.realized_gain(), dec!(30));
}

#[test]
fn test_build_holding_fails_on_oversell() {
    let mut history = xyz_history();
    history.push(tx(NewTransaction::sell("XYZ", dec!(10), dec!(15), day("2024-02-01"))));

    match build_holding("XYZ", &history, CostBasisMethod::Fifo) {
        Err(Error::Ledger(LedgerError::InsufficientShares { held, requested, .. })) => {
            assert_eq!(held, dec!(7));
            assert_eq!(requested, dec!(10));
        }
        other => panic!("expected InsufficientShares, got {:?}", other),
    }
}

#[test]
fn test_reinvested_dividend_adds_lot() {
    let mut log = TransactionLog::from_transactions(xyz_history()).unwrap();
    log.record_dividend(
        "XYZ",
        dec!(50),
        day("2024-02-01"),
        Some(Reinvestment {
            shares: dec!(2),
            price_per_share: dec!(25),
        }),
        None,
    )
    .unwrap();

    let holding = build_holding("XYZ", log.transactions(), CostBasisMethod::Fifo).unwrap();
    assert_eq!(holding.total_shares(), dec!(9));
    assert_eq!(holding.total_cost_basis(), dec!(130));
    assert_eq!(holding.ledger.lot_count(), 3);
}

#[test]
fn test_cash_dividend_leaves_lots_unchanged() {
    let mut history = xyz_history();
    history.push(tx(NewTransaction::dividend("XYZ", dec!(3.5), day("2024-03-01"))));

    let holding = build_holding("XYZ", &history, CostBasisMethod::Fifo).unwrap();
    assert_eq!(holding.total_shares(), dec!(7));
    assert_eq!(holding.total_cost_basis(), dec!(80));
}

#[test]
fn test_unrealized_gain_figures() {
    let holding = build_holding("XYZ", &xyz_history(), CostBasisMethod::Fifo).unwrap();

    assert_eq!(holding.current_value(dec!(20)), dec!(140));
    assert_eq!(holding.unrealized_gain(dec!(20)), dec!(60));
    assert_eq!(holding.unrealized_gain_percent(dec!(20)), dec!(75));

    let empty = build_holding("NONE", &xyz_history(), CostBasisMethod::Fifo).unwrap();
    assert_eq!(empty.unrealized_gain_percent(dec!(20)), Decimal::ZERO);
}

#[test]
fn test_calculator_separates_closed_positions() {
    let mut history = xyz_history();
    history.push(tx(NewTransaction::buy("ABC", dec!(4), dec!(50), day("2024-01-02"))));
    history.push(tx(NewTransaction::sell("ABC", dec!(4), dec!(55), day("2024-03-02"))));

    let result = HoldingsCalculator::new(CostBasisMethod::Fifo).calculate(&history);

    assert!(!result.has_warnings());
    assert_eq!(result.holdings.len(), 1);
    assert_eq!(result.holdings[0].symbol, "XYZ");
    assert_eq!(result.closed_positions.len(), 1);
    assert_eq!(result.closed_positions[0].realized_gain(), dec!(20));
    assert_eq!(result.realized_gain(), dec!(60));
}

#[test]
fn test_calculator_skips_failing_transaction_with_warning() {
    let mut history = xyz_history();
    let bad_sell = tx(NewTransaction::sell("XYZ", dec!(100), dec!(15), day("2024-02-01")));
    let bad_id = bad_sell.id.clone();
    history.push(bad_sell);
    history.push(tx(NewTransaction::buy("XYZ", dec!(1), dec!(20), day("2024-03-01"))));

    let result = HoldingsCalculator::default().calculate(&history);

    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].transaction_id, bad_id);
    let holding = result.holding("XYZ").unwrap();
    assert_eq!(holding.total_shares(), dec!(8));
}

#[test]
fn test_build_holding_rejects_stored_buy_with_negative_shares() {
    let mut corrupt = tx(NewTransaction::buy("XYZ", dec!(5), dec!(10), day("2024-01-01")));
    corrupt.shares = dec!(-5);

    let err = build_holding("XYZ", [&corrupt], CostBasisMethod::Fifo).unwrap_err();

    assert!(matches!(
        err,
        Error::Transaction(TransactionError::InvalidTransaction(_))
    ));
}

#[test]
fn test_calculator_skips_stored_trades_with_non_positive_fields() {
    let mut history = xyz_history();
    let mut negative_buy = tx(NewTransaction::buy("XYZ", dec!(5), dec!(10), day("2024-02-01")));
    negative_buy.shares = dec!(-5);
    let mut free_buy = tx(NewTransaction::buy("XYZ", dec!(5), dec!(10), day("2024-02-02")));
    free_buy.price_per_share = Decimal::ZERO;
    let mut zero_sell = tx(NewTransaction::sell("XYZ", dec!(1), dec!(15), day("2024-02-03")));
    zero_sell.shares = Decimal::ZERO;
    history.extend([negative_buy, free_buy, zero_sell]);

    let result = HoldingsCalculator::default().calculate(&history);

    assert_eq!(result.warnings.len(), 3);
    let holding = result.holding("XYZ").unwrap();
    assert_eq!(holding.total_shares(), dec!(7));
    assert_eq!(holding.total_cost_basis(), dec!(80));
    assert!(holding.ledger.lots().all(|lot| lot.remaining > Decimal::ZERO));
}
