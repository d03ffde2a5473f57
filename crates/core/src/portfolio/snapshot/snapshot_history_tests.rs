use super::*;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

fn day(s: &str) -> NaiveDate {
    NaiveDate::from_str(s).unwrap()
}

fn snapshot(date: NaiveDate, total_value: Decimal) -> PortfolioSnapshot {
    PortfolioSnapshot {
        id: uuid::Uuid::new_v4().to_string(),
        date,
        total_value,
        holdings_value: total_value,
        cash_balance: Decimal::ZERO,
        total_gain_loss: Decimal::ZERO,
        day_change: Decimal::ZERO,
        day_change_percent: Decimal::ZERO,
        holding_count: 1,
        estimated: false,
        notes: None,
        created_at: Utc::now(),
    }
}

#[test]
fn test_snapshots_are_kept_newest_first() {
    let mut history = SnapshotHistory::default();
    history.record(snapshot(day("2024-01-02"), dec!(100)));
    history.record(snapshot(day("2024-01-04"), dec!(120)));
    history.record(snapshot(day("2024-01-03"), dec!(110)));

    let dates: Vec<NaiveDate> = history.snapshots().iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![day("2024-01-04"), day("2024-01-03"), day("2024-01-02")]);
    assert_eq!(history.latest().unwrap().total_value, dec!(120));
}

#[test]
fn test_same_date_overwrites() {
    let mut history = SnapshotHistory::default();
    assert!(!history.record(snapshot(day("2024-01-02"), dec!(100))));
    assert!(history.record(snapshot(day("2024-01-02"), dec!(105))));

    assert_eq!(history.len(), 1);
    assert_eq!(history.on(day("2024-01-02")).unwrap().total_value, dec!(105));
}

#[test]
fn test_retention_drops_oldest() {
    let mut history = SnapshotHistory::new(3);
    let start = day("2024-01-01");
    for offset in 0..5 {
        history.record(snapshot(start + Duration::days(offset), Decimal::from(offset)));
    }

    assert_eq!(history.len(), 3);
    assert_eq!(history.snapshots().last().unwrap().date, day("2024-01-03"));
}

#[test]
fn test_default_retention_is_two_years() {
    let mut history = SnapshotHistory::default();
    let start = day("2022-01-01");
    for offset in 0..740 {
        history.record(snapshot(start + Duration::days(offset), dec!(1)));
    }
    assert_eq!(history.len(), 730);
    assert_eq!(history.latest().unwrap().date, start + Duration::days(739));
}

#[test]
fn test_from_snapshots_dedupes_and_prunes() {
    let history = SnapshotHistory::from_snapshots(
        vec![
            snapshot(day("2024-01-01"), dec!(1)),
            snapshot(day("2024-01-02"), dec!(2)),
            snapshot(day("2024-01-02"), dec!(3)),
            snapshot(day("2024-01-03"), dec!(4)),
        ],
        2,
    );
    assert_eq!(history.len(), 2);
    assert_eq!(history.on(day("2024-01-02")).unwrap().total_value, dec!(3));
}

#[test]
fn test_since_returns_oldest_first() {
    let mut history = SnapshotHistory::default();
    for (date, value) in [("2024-01-01", 1), ("2024-02-01", 2), ("2024-03-01", 3)] {
        history.record(snapshot(day(date), Decimal::from(value)));
    }

    let recent = history.since(Some(day("2024-02-01")));
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].date, day("2024-02-01"));
    assert_eq!(history.since(None).len(), 3);
}

#[test]
fn test_take_snapshot_captures_valuation() {
    use crate::cash::CashLedger;
    use crate::portfolio::valuation::PortfolioValuationCalculator;
    use crate::quotes::{PriceMap, PriceQuote};
    use crate::transactions::{NewTransaction, TransactionLog};

    let mut log = TransactionLog::new();
    log.append(NewTransaction::buy("XYZ", dec!(10), dec!(10), day("2024-01-01")))
        .unwrap();
    let prices: PriceMap = [PriceQuote::new("XYZ", dec!(12), Some(dec!(11)))]
        .into_iter()
        .collect();
    let cash = CashLedger::with_balance(dec!(5));
    let valuation = PortfolioValuationCalculator::default().calculate(
        log.transactions(),
        &prices,
        &cash,
        day("2024-05-01"),
    );

    let mut history = SnapshotHistory::default();
    let taken = history.take_snapshot(&valuation, Some("Manual snapshot".to_string()));

    assert_eq!(taken.date, day("2024-05-01"));
    assert_eq!(taken.total_value, dec!(125));
    assert_eq!(taken.holdings_value, dec!(120));
    assert_eq!(taken.day_change, dec!(10));
    assert_eq!(taken.holding_count, 1);
    assert!(!taken.estimated);
    assert_eq!(history.latest(), Some(&taken));
}
