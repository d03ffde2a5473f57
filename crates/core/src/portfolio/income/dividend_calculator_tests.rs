use super::*;
use crate::cash::CashLedger;
use crate::portfolio::lots::CostBasisMethod;
use crate::portfolio::valuation::PortfolioValuationCalculator;
use crate::quotes::{PriceMap, PriceQuote};
use crate::transactions::{NewTransaction, Reinvestment, TransactionLog};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

fn day(s: &str) -> NaiveDate {
    NaiveDate::from_str(s).unwrap()
}

fn drip_log() -> TransactionLog {
    let mut log = TransactionLog::new();
    log.append(NewTransaction::buy("XYZ", dec!(10), dec!(10), day("2024-01-01")))
        .unwrap();
    log.append(NewTransaction::buy("XYZ", dec!(5), dec!(12), day("2024-01-05")))
        .unwrap();
    log.append(NewTransaction::sell("XYZ", dec!(8), dec!(15), day("2024-01-10")))
        .unwrap();
    log.record_dividend(
        "XYZ",
        dec!(50),
        day("2024-03-15"),
        Some(Reinvestment {
            shares: dec!(2),
            price_per_share: dec!(25),
        }),
        None,
    )
    .unwrap();
    log
}

fn steady_log() -> TransactionLog {
    let mut log = TransactionLog::new();
    log.append(NewTransaction::buy("AAA", dec!(10), dec!(40), day("2023-01-01")))
        .unwrap();
    log.append(NewTransaction::dividend("AAA", dec!(10), day("2024-01-15")))
        .unwrap();
    log.append(NewTransaction::dividend("AAA", dec!(30), day("2024-04-15")))
        .unwrap();
    log
}

fn yield_with_income(symbol: &str, shares: Decimal, income: Decimal) -> DividendYield {
    DividendYield {
        symbol: symbol.to_string(),
        shares,
        current_price: Some(dec!(100)),
        annual_dividend_per_share: income / shares,
        dividend_yield: dec!(1),
        trailing_dividends: income,
        dividends_counted: 4,
        projected_annual_income: income,
        is_reliable: true,
    }
}

#[test]
fn test_reinvested_dividend_uses_shares_before_reinvestment() {
    let log = drip_log();
    let result = DividendCalculator::default().dividend_yield(
        "XYZ",
        log.transactions(),
        dec!(9),
        Some(dec!(100)),
        day("2024-06-30"),
    );

    // 50 paid on 7 shares; the 2 reinvested shares did not earn it.
    let per_share = dec!(50) / dec!(7);
    assert_eq!(result.dividends_counted, 1);
    assert_eq!(result.trailing_dividends, dec!(50));
    assert_eq!(result.annual_dividend_per_share.round_dp(6), per_share.round_dp(6));
    assert_eq!(result.dividend_yield.round_dp(4), dec!(7.1429));
    assert_eq!(
        result.projected_annual_income.round_dp(4),
        (dec!(9) * per_share).round_dp(4)
    );
    assert!(result.is_reliable);
}

#[test]
fn test_per_share_rate_is_weighted_by_amount() {
    let log = steady_log();
    let result = DividendCalculator::default().dividend_yield(
        "aaa",
        log.transactions(),
        dec!(10),
        Some(dec!(50)),
        day("2024-06-30"),
    );

    // 1.00 and 3.00 per share weighted by 10 and 30.
    assert_eq!(result.symbol, "AAA");
    assert_eq!(result.annual_dividend_per_share, dec!(2.5));
    assert_eq!(result.dividend_yield, dec!(5));
    assert_eq!(result.projected_annual_income, dec!(25));
}

#[test]
fn test_dividends_outside_lookback_are_ignored() {
    let mut log = steady_log();
    log.append(NewTransaction::dividend("AAA", dec!(500), day("2023-05-01")))
        .unwrap();

    let result = DividendCalculator::default().dividend_yield(
        "AAA",
        log.transactions(),
        dec!(10),
        Some(dec!(50)),
        day("2024-06-30"),
    );

    assert_eq!(result.dividends_counted, 2);
    assert_eq!(result.trailing_dividends, dec!(40));
}

#[test]
fn test_unknown_price_gives_zero_yield_but_keeps_income() {
    let log = steady_log();
    let result = DividendCalculator::default().dividend_yield(
        "AAA",
        log.transactions(),
        dec!(10),
        None,
        day("2024-06-30"),
    );

    assert_eq!(result.current_price, None);
    assert_eq!(result.dividend_yield, Decimal::ZERO);
    assert_eq!(result.projected_annual_income, dec!(25));
}

#[test]
fn test_no_dividends_gives_zero_rate() {
    let mut log = TransactionLog::new();
    log.append(NewTransaction::buy("BBB", dec!(5), dec!(100), day("2024-01-01")))
        .unwrap();

    let result = DividendCalculator::default().dividend_yield(
        "BBB",
        log.transactions(),
        dec!(5),
        Some(dec!(100)),
        day("2024-06-30"),
    );

    assert_eq!(result.dividends_counted, 0);
    assert_eq!(result.annual_dividend_per_share, Decimal::ZERO);
    assert_eq!(result.dividend_yield, Decimal::ZERO);
    assert!(result.is_reliable);
}

#[test]
fn test_high_yield_is_flagged_then_rejected() {
    let mut log = TransactionLog::new();
    log.append(NewTransaction::buy("HYX", dec!(10), dec!(10), day("2024-01-01")))
        .unwrap();
    log.append(NewTransaction::dividend("HYX", dec!(20), day("2024-03-01")))
        .unwrap();
    let calculator = DividendCalculator::default();

    let suspicious = calculator.dividend_yield(
        "HYX",
        log.transactions(),
        dec!(10),
        Some(dec!(10)),
        day("2024-06-30"),
    );
    assert_eq!(suspicious.dividend_yield, dec!(20));
    assert!(!suspicious.is_reliable);

    let rejected = calculator.dividend_yield(
        "HYX",
        log.transactions(),
        dec!(10),
        Some(dec!(3)),
        day("2024-06-30"),
    );
    assert_eq!(rejected.dividend_yield, Decimal::ZERO);
    assert_eq!(rejected.annual_dividend_per_share, Decimal::ZERO);
    assert_eq!(rejected.projected_annual_income, Decimal::ZERO);
    assert!(!rejected.is_reliable);
}

#[test]
fn test_portfolio_metrics_weight_yield_by_market_value() {
    let mut log = TransactionLog::new();
    log.append(NewTransaction::buy("AAA", dec!(10), dec!(40), day("2023-01-01")))
        .unwrap();
    log.append(NewTransaction::dividend("AAA", dec!(20), day("2024-03-01")))
        .unwrap();
    log.append(NewTransaction::buy("BBB", dec!(5), dec!(100), day("2023-01-01")))
        .unwrap();
    log.append(NewTransaction::buy("CCC", dec!(2), dec!(30), day("2023-01-01")))
        .unwrap();
    let prices: PriceMap = [
        PriceQuote::new("AAA", dec!(50), None),
        PriceQuote::new("BBB", dec!(100), None),
    ]
    .into_iter()
    .collect();
    let as_of = day("2024-06-30");
    let holdings = PortfolioValuationCalculator::new(CostBasisMethod::Fifo)
        .calculate(log.transactions(), &prices, &CashLedger::new(), as_of)
        .holdings;

    let metrics =
        DividendCalculator::default().portfolio_metrics(log.transactions(), &holdings, &prices, as_of);

    assert_eq!(metrics.yields.len(), 3);
    assert_eq!(metrics.average_yield, dec!(2));
    assert_eq!(metrics.total_annual_income, dec!(20));
    assert_eq!(metrics.dividend_payers, 1);
}

#[test]
fn test_projection_books_full_quarter_in_quarter_end_months() {
    let yields = vec![
        yield_with_income("AAA", dec!(10), dec!(120)),
        yield_with_income("SML", dec!(4), dec!(8)),
    ];

    let projection =
        DividendCalculator::default().project(&yields, 3, day("2024-01-15"), dec!(1000));

    let amounts: Vec<Decimal> = projection.monthly.iter().map(|m| m.amount).collect();
    assert_eq!(amounts, vec![dec!(10.56), dec!(10.56), dec!(32)]);
    assert_eq!(projection.monthly[2].date, day("2024-03-15"));
    assert_eq!(projection.monthly[2].cumulative, dec!(53.12));
    assert_eq!(projection.expected_period_income, dec!(53.12));
    assert_eq!(projection.annualized_income, dec!(212.48));
    assert_eq!(projection.average_quarterly_payment, dec!(53.12));
    assert_eq!(projection.portfolio_yield, dec!(21.248));

    // SML only clears the calendar threshold in March.
    let sml: Vec<&DividendCalendarEntry> =
        projection.calendar.iter().filter(|e| e.symbol == "SML").collect();
    assert_eq!(sml.len(), 1);
    assert_eq!(sml[0].amount, dec!(2));
    assert_eq!(sml[0].estimated_per_share, dec!(0.5));
    assert_eq!(projection.calendar.len(), 4);
}

#[test]
fn test_empty_projection_is_zeroed() {
    let projection = DividendCalculator::default().project(&[], 0, day("2024-01-01"), dec!(1000));

    assert_eq!(projection.period_months, 0);
    assert!(projection.monthly.is_empty());
    assert_eq!(projection.annualized_income, Decimal::ZERO);
    assert_eq!(projection.portfolio_yield, Decimal::ZERO);
}

#[test]
fn test_income_summary_splits_cash_and_reinvested() {
    let mut log = drip_log();
    log.append(NewTransaction::buy("ABC", dec!(1), dec!(100), day("2023-11-01")))
        .unwrap();
    log.append(NewTransaction::dividend("ABC", dec!(20), day("2023-12-10")))
        .unwrap();

    let summary = income_summary(log.transactions(), day("2024-06-30"));

    assert_eq!(summary.total, dec!(70));
    assert_eq!(summary.cash, dec!(20));
    assert_eq!(summary.reinvested, dec!(50));
    assert_eq!(summary.year_to_date, dec!(50));
    assert_eq!(summary.by_month.get("2023-12"), Some(&dec!(20)));
    assert_eq!(summary.by_month.get("2024-03"), Some(&dec!(50)));
    assert_eq!(summary.by_symbol[0].symbol, "XYZ");
    assert_eq!(summary.by_symbol[1].payments, 1);
}

#[test]
fn test_yield_on_cost_and_tiers() {
    assert_eq!(yield_on_cost(dec!(2), dec!(40)), Some(dec!(5)));
    assert_eq!(yield_on_cost(dec!(2), Decimal::ZERO), None);
    assert_eq!(yield_on_cost(Decimal::ZERO, dec!(40)), None);

    assert_eq!(YieldOnCostTier::from_yield(dec!(8)), YieldOnCostTier::Excellent);
    assert_eq!(YieldOnCostTier::from_yield(dec!(5)), YieldOnCostTier::Good);
    assert_eq!(YieldOnCostTier::from_yield(dec!(3.5)), YieldOnCostTier::Fair);
    assert_eq!(YieldOnCostTier::from_yield(dec!(1)), YieldOnCostTier::Moderate);
    assert_eq!(YieldOnCostTier::from_yield(dec!(0.4)), YieldOnCostTier::Low);
}

#[test]
fn test_thresholds_come_from_settings() {
    let mut log = TransactionLog::new();
    log.append(NewTransaction::buy("HYX", dec!(10), dec!(10), day("2024-01-01")))
        .unwrap();
    log.append(NewTransaction::dividend("HYX", dec!(20), day("2024-03-01")))
        .unwrap();
    let settings = crate::settings::EngineSettings {
        yield_warning_threshold: dec!(5),
        yield_rejection_threshold: dec!(10),
        ..Default::default()
    };

    let result = DividendCalculator::from_settings(&settings).dividend_yield(
        "HYX",
        log.transactions(),
        dec!(10),
        Some(dec!(10)),
        day("2024-06-30"),
    );

    assert_eq!(result.dividend_yield, Decimal::ZERO);
    assert!(!result.is_reliable);
}
