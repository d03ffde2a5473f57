//! Portfolio snapshot domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::valuation::PortfolioValuation;

/// Valuation figures captured on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub id: String,
    pub date: NaiveDate,
    pub total_value: Decimal,
    pub holdings_value: Decimal,
    pub cash_balance: Decimal,
    pub total_gain_loss: Decimal,
    pub day_change: Decimal,
    pub day_change_percent: Decimal,
    pub holding_count: usize,
    /// True if any holding was valued at cost for lack of a price.
    #[serde(default)]
    pub estimated: bool,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PortfolioSnapshot {
    /// Captures a valuation. The snapshot date is the valuation's `as_of`.
    pub fn from_valuation(valuation: &PortfolioValuation, notes: Option<String>) -> Self {
        PortfolioSnapshot {
            id: uuid::Uuid::new_v4().to_string(),
            date: valuation.as_of,
            total_value: valuation.total_value,
            holdings_value: valuation.holdings_value,
            cash_balance: valuation.cash_balance,
            total_gain_loss: valuation.total_gain_loss,
            day_change: valuation.day_change,
            day_change_percent: valuation.day_change_percent,
            holding_count: valuation.holdings.len(),
            estimated: valuation.is_degraded(),
            notes,
            created_at: Utc::now(),
        }
    }
}
