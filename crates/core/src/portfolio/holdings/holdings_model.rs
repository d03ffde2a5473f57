use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::lots::{Lot, LotLedger, SaleResult};
use crate::utils::decimal_utils::{is_quantity_significant, percent_of};

/// Current state of one symbol: its open lots plus realized sales.
///
/// Share count and cost basis are always read off the lots, never stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    pub ledger: LotLedger,
    /// Every sale replayed for this symbol, oldest first.
    pub sales: Vec<SaleResult>,
    pub first_acquired: Option<NaiveDate>,
}

impl Holding {
    pub fn new(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Holding {
            ledger: LotLedger::new(symbol.clone()),
            symbol,
            sales: Vec::new(),
            first_acquired: None,
        }
    }

    pub fn lots(&self) -> impl Iterator<Item = &Lot> {
        self.ledger.lots()
    }

    pub fn total_shares(&self) -> Decimal {
        self.ledger.total_shares()
    }

    pub fn total_cost_basis(&self) -> Decimal {
        self.ledger.total_cost_basis()
    }

    pub fn average_cost(&self) -> Decimal {
        self.ledger.average_cost()
    }

    /// Open when any significant quantity is still held.
    pub fn is_active(&self) -> bool {
        is_quantity_significant(&self.total_shares())
    }

    pub fn realized_gain(&self) -> Decimal {
        self.sales.iter().map(|s| s.capital_gain).sum()
    }

    pub fn current_value(&self, current_price: Decimal) -> Decimal {
        self.total_shares() * current_price
    }

    pub fn unrealized_gain(&self, current_price: Decimal) -> Decimal {
        self.current_value(current_price) - self.total_cost_basis()
    }

    /// Zero when there is no cost basis.
    pub fn unrealized_gain_percent(&self, current_price: Decimal) -> Decimal {
        percent_of(self.unrealized_gain(current_price), self.total_cost_basis())
    }
}

/// A transaction that could not be replayed. Replay carries on without it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsCalculationWarning {
    pub transaction_id: String,
    pub symbol: String,
    pub date: NaiveDate,
    pub message: String,
}

impl std::fmt::Display for HoldingsCalculationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Transaction {} ({} on {}): {}",
            self.transaction_id, self.symbol, self.date, self.message
        )
    }
}

/// Holdings for a whole log. Fully sold symbols move to `closed_positions`
/// so their realized gains stay reportable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsCalculationResult {
    pub holdings: Vec<Holding>,
    pub closed_positions: Vec<Holding>,
    pub warnings: Vec<HoldingsCalculationWarning>,
}

impl HoldingsCalculationResult {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn holding(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.symbol == symbol)
    }

    /// Realized gains across open and closed positions.
    pub fn realized_gain(&self) -> Decimal {
        self.holdings
            .iter()
            .chain(self.closed_positions.iter())
            .map(Holding::realized_gain)
            .sum()
    }
}
