use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trailing dividend yield for one holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendYield {
    pub symbol: String,
    pub shares: Decimal,
    /// `None` when no quote is available; the yield is then zero.
    pub current_price: Option<Decimal>,
    /// Amount-weighted average of the per-share payments in the window.
    pub annual_dividend_per_share: Decimal,
    /// Percent of current price.
    pub dividend_yield: Decimal,
    /// Sum of dividends paid in the look-back window.
    pub trailing_dividends: Decimal,
    pub dividends_counted: usize,
    pub projected_annual_income: Decimal,
    /// False when the yield looks implausibly high.
    pub is_reliable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDividendMetrics {
    /// Yields weighted by each holding's market value.
    pub average_yield: Decimal,
    pub total_annual_income: Decimal,
    /// Holdings with a positive yield.
    pub dividend_payers: usize,
    pub yields: Vec<DividendYield>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProjection {
    pub month_offset: u32,
    /// Calendar date `month_offset` months after the projection start.
    pub date: NaiveDate,
    pub amount: Decimal,
    pub cumulative: Decimal,
}

/// Expected payment for one symbol in one projected month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendCalendarEntry {
    pub symbol: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub shares: Decimal,
    pub estimated_per_share: Decimal,
}

/// Forward income estimate. Assumes every payer follows the March, June,
/// September, December cycle rather than its real payment calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendProjection {
    pub period_months: u32,
    pub monthly: Vec<MonthlyProjection>,
    pub calendar: Vec<DividendCalendarEntry>,
    pub expected_period_income: Decimal,
    pub annualized_income: Decimal,
    pub average_quarterly_payment: Decimal,
    /// Annualized income as a percent of total portfolio value.
    pub portfolio_yield: Decimal,
}

/// Dividends received per symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolDividendIncome {
    pub symbol: String,
    pub total: Decimal,
    pub cash: Decimal,
    pub reinvested: Decimal,
    pub payments: usize,
}

/// Dividends received to date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendIncomeSummary {
    pub total: Decimal,
    pub cash: Decimal,
    pub reinvested: Decimal,
    pub year_to_date: Decimal,
    /// Keyed by `YYYY-MM`.
    pub by_month: BTreeMap<String, Decimal>,
    /// Sorted by total descending.
    pub by_symbol: Vec<SymbolDividendIncome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum YieldOnCostTier {
    Excellent,
    Good,
    Fair,
    Moderate,
    Low,
}

impl YieldOnCostTier {
    pub fn from_yield(yield_on_cost: Decimal) -> Self {
        if yield_on_cost >= dec!(8) {
            YieldOnCostTier::Excellent
        } else if yield_on_cost >= dec!(5) {
            YieldOnCostTier::Good
        } else if yield_on_cost >= dec!(3) {
            YieldOnCostTier::Fair
        } else if yield_on_cost >= dec!(1) {
            YieldOnCostTier::Moderate
        } else {
            YieldOnCostTier::Low
        }
    }
}
