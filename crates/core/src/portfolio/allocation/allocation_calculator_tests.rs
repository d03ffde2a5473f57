use super::*;
use crate::portfolio::valuation::{HoldingValuation, PriceStatus};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

fn valued(symbol: &str, shares: Decimal, price: Decimal) -> HoldingValuation {
    HoldingValuation {
        symbol: symbol.to_string(),
        shares,
        total_cost_basis: shares * price,
        average_cost: price,
        price,
        previous_close: price,
        price_status: PriceStatus::Live,
        current_value: shares * price,
        day_change: Decimal::ZERO,
        unrealized_gain: Decimal::ZERO,
        unrealized_gain_percent: Decimal::ZERO,
        realized_gain: Decimal::ZERO,
    }
}

#[test]
fn test_groups_by_sector_with_other_fallback() {
    let holdings = vec![
        valued("AAPL", dec!(2), dec!(100)),
        valued("MSFT", dec!(1), dec!(200)),
        valued("XOM", dec!(3), dec!(100)),
        valued("ZZZZ", dec!(1), dec!(300)),
    ];

    let allocation =
        AllocationCalculator::default().calculate(&holdings, &StaticSectorTable::with_defaults());

    assert_eq!(allocation.total_value, dec!(1000));
    assert_eq!(allocation.sector_count(), 3);

    let tech = allocation.dominant_sector().unwrap();
    assert_eq!(tech.sector, "Technology");
    assert_eq!(tech.percentage, dec!(40));
    assert_eq!(tech.holding_count(), 2);

    assert_eq!(allocation.sector("Energy").unwrap().percentage, dec!(30));
    assert_eq!(allocation.sector("Other").unwrap().holdings[0].symbol, "ZZZZ");
}

#[test]
fn test_single_sector_scores_zero() {
    let calculator = AllocationCalculator::default();
    assert_eq!(calculator.diversification_score(&[dec!(100)]), 0);
    assert_eq!(calculator.diversification_score(&[]), 0);
}

#[test]
fn test_even_spread_across_ideal_count_scores_full() {
    let calculator = AllocationCalculator::default();
    assert_eq!(calculator.diversification_score(&[dec!(12.5); 8]), 100);
}

#[test]
fn test_score_combines_breadth_balance_and_concentration() {
    let calculator = AllocationCalculator::default();
    // 15 breadth + 40 balance - 10 concentration
    assert_eq!(calculator.diversification_score(&[dec!(50), dec!(50)]), 45);
    // 30 breadth + 37.5 balance, rounded half up
    assert_eq!(
        calculator.diversification_score(&[dec!(40), dec!(30), dec!(20), dec!(10)]),
        68
    );
}

#[test]
fn test_custom_lookup_and_limits() {
    let mut sectors = HashMap::new();
    sectors.insert("ABC".to_string(), "Widgets".to_string());
    let holdings = vec![valued("abc", dec!(1), dec!(10))];

    let allocation = AllocationCalculator::new(1, dec!(100)).calculate(&holdings, &sectors);
    assert_eq!(allocation.sectors[0].sector, "Widgets");
    // 60 breadth + 40 balance, no penalty at a 100% limit
    assert_eq!(allocation.diversification_score, 100);
}

#[test]
fn test_empty_holdings_give_empty_allocation() {
    let allocation =
        AllocationCalculator::default().calculate(&[], &StaticSectorTable::with_defaults());
    assert_eq!(allocation, PortfolioAllocation::empty());
}

#[test]
fn test_settings_drive_score_targets() {
    let settings = crate::settings::EngineSettings {
        ideal_sector_count: 2,
        sector_concentration_limit: dec!(60),
        ..Default::default()
    };

    let calculator = AllocationCalculator::from_settings(&settings);

    assert_eq!(calculator.diversification_score(&[dec!(50), dec!(50)]), 100);
    assert_eq!(AllocationCalculator::default().diversification_score(&[dec!(50), dec!(50)]), 45);
}
