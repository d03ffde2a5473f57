use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::portfolio::holdings::HoldingsCalculationWarning;

/// Where a holding's price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceStatus {
    /// Quoted by the price feed.
    Live,
    /// No quote; valued at average cost.
    Estimated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingValuation {
    pub symbol: String,
    pub shares: Decimal,
    pub total_cost_basis: Decimal,
    pub average_cost: Decimal,
    pub price: Decimal,
    pub previous_close: Decimal,
    pub price_status: PriceStatus,
    pub current_value: Decimal,
    pub day_change: Decimal,
    pub unrealized_gain: Decimal,
    pub unrealized_gain_percent: Decimal,
    pub realized_gain: Decimal,
}

impl HoldingValuation {
    pub fn is_estimated(&self) -> bool {
        self.price_status == PriceStatus::Estimated
    }
}

/// Year-to-date performance.
///
/// This is an estimate. The year-start value is backed out of the current
/// cost basis and this year's flows because no real year-start valuation is
/// available, so cash moved in or out mid-year skews it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YtdPerformance {
    pub year: i32,
    pub estimated_year_start_value: Decimal,
    /// Buy costs dated this year.
    pub invested: Decimal,
    /// Sell proceeds plus dividends dated this year.
    pub received: Decimal,
    pub gain: Decimal,
    pub gain_percent: Decimal,
}

/// Return on all capital ever put in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifetimeReturn {
    /// Deposits plus buy costs, minus sell proceeds and cash dividends.
    /// Reinvestment buys are left out because their reinvested dividends are too.
    pub net_capital_contributed: Decimal,
    pub gain: Decimal,
    pub return_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    pub as_of: NaiveDate,
    pub holdings: Vec<HoldingValuation>,
    pub holdings_value: Decimal,
    pub cash_balance: Decimal,
    pub total_value: Decimal,
    pub total_cost_basis: Decimal,
    /// Unrealized only.
    pub total_gain_loss: Decimal,
    pub total_gain_loss_percent: Decimal,
    /// Sum of capital gains from every replayed sale, including closed positions.
    pub realized_gain: Decimal,
    pub day_change: Decimal,
    pub day_change_percent: Decimal,
    pub ytd: YtdPerformance,
    pub lifetime: LifetimeReturn,
    pub warnings: Vec<HoldingsCalculationWarning>,
}

impl PortfolioValuation {
    /// Symbols valued at cost because no price was available.
    pub fn estimated_symbols(&self) -> Vec<&str> {
        self.holdings
            .iter()
            .filter(|h| h.is_estimated())
            .map(|h| h.symbol.as_str())
            .collect()
    }

    pub fn is_degraded(&self) -> bool {
        self.holdings.iter().any(HoldingValuation::is_estimated)
    }

    /// Copy with money and percentages rounded for display. Share counts are
    /// left as they are.
    pub fn rounded(&self) -> Self {
        let r = |d: Decimal| d.round_dp(DISPLAY_DECIMAL_PRECISION);
        PortfolioValuation {
            as_of: self.as_of,
            holdings: self
                .holdings
                .iter()
                .map(|h| HoldingValuation {
                    total_cost_basis: r(h.total_cost_basis),
                    average_cost: r(h.average_cost),
                    price: r(h.price),
                    previous_close: r(h.previous_close),
                    current_value: r(h.current_value),
                    day_change: r(h.day_change),
                    unrealized_gain: r(h.unrealized_gain),
                    unrealized_gain_percent: r(h.unrealized_gain_percent),
                    realized_gain: r(h.realized_gain),
                    ..h.clone()
                })
                .collect(),
            holdings_value: r(self.holdings_value),
            cash_balance: r(self.cash_balance),
            total_value: r(self.total_value),
            total_cost_basis: r(self.total_cost_basis),
            total_gain_loss: r(self.total_gain_loss),
            total_gain_loss_percent: r(self.total_gain_loss_percent),
            realized_gain: r(self.realized_gain),
            day_change: r(self.day_change),
            day_change_percent: r(self.day_change_percent),
            ytd: YtdPerformance {
                year: self.ytd.year,
                estimated_year_start_value: r(self.ytd.estimated_year_start_value),
                invested: r(self.ytd.invested),
                received: r(self.ytd.received),
                gain: r(self.ytd.gain),
                gain_percent: r(self.ytd.gain_percent),
            },
            lifetime: LifetimeReturn {
                net_capital_contributed: r(self.lifetime.net_capital_contributed),
                gain: r(self.lifetime.gain),
                return_percent: r(self.lifetime.return_percent),
            },
            warnings: self.warnings.clone(),
        }
    }
}
