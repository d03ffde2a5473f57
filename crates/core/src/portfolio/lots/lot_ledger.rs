use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::lots_model::{CostBasisMethod, Lot, LotConsumption, SaleResult};
use crate::errors::LedgerError;
use crate::utils::decimal_utils::is_quantity_significant;

/// Open lots for a single symbol, ordered by acquisition date.
///
/// Lots acquired on the same date keep their insertion order, so the front of
/// the queue is always the oldest lot and the back the newest.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LotLedger {
    pub symbol: String,
    lots: VecDeque<Lot>,
}

impl LotLedger {
    pub fn new(symbol: impl Into<String>) -> Self {
        LotLedger {
            symbol: symbol.into(),
            lots: VecDeque::new(),
        }
    }

    /// Rebuilds a ledger from previously persisted lots.
    pub fn from_lots(symbol: impl Into<String>, lots: impl IntoIterator<Item = Lot>) -> Self {
        let mut ledger = LotLedger::new(symbol);
        for lot in lots {
            ledger.insert_lot(lot);
        }
        ledger
    }

    pub fn lots(&self) -> impl Iterator<Item = &Lot> {
        self.lots.iter()
    }

    pub fn into_lots(self) -> Vec<Lot> {
        self.lots.into()
    }

    pub fn lot_count(&self) -> usize {
        self.lots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    pub fn total_shares(&self) -> Decimal {
        self.lots.iter().map(|lot| lot.remaining).sum()
    }

    pub fn total_cost_basis(&self) -> Decimal {
        self.lots.iter().map(Lot::cost_basis).sum()
    }

    /// Zero when nothing is held.
    pub fn average_cost(&self) -> Decimal {
        let shares = self.total_shares();
        if shares.is_zero() {
            Decimal::ZERO
        } else {
            self.total_cost_basis() / shares
        }
    }

    /// Opens a new lot and returns its id.
    pub fn apply_buy(&mut self, shares: Decimal, price_per_share: Decimal, date: NaiveDate) -> String {
        let lot = Lot::new(shares, price_per_share, date);
        let id = lot.id.clone();
        self.insert_lot(lot);
        id
    }

    /// Like [`apply_buy`](Self::apply_buy) but records the originating transaction.
    pub fn apply_buy_from(
        &mut self,
        transaction_id: &str,
        shares: Decimal,
        price_per_share: Decimal,
        date: NaiveDate,
    ) -> String {
        let mut lot = Lot::new(shares, price_per_share, date);
        lot.transaction_id = Some(transaction_id.to_string());
        let id = lot.id.clone();
        self.insert_lot(lot);
        id
    }

    fn insert_lot(&mut self, lot: Lot) {
        debug!(
            "Adding lot {} to {}: {} @ {} on {}",
            lot.id, self.symbol, lot.remaining, lot.price_per_share, lot.acquired_date
        );
        let position = self
            .lots
            .iter()
            .position(|existing| existing.acquired_date > lot.acquired_date)
            .unwrap_or(self.lots.len());
        self.lots.insert(position, lot);
    }

    /// Relieves `shares_to_sell` shares from the open lots.
    ///
    /// Fails with [`LedgerError::InsufficientShares`] when fewer shares are held
    /// than requested. Validation happens before any lot is touched, so a
    /// failed sale leaves the ledger unchanged.
    pub fn apply_sale(
        &mut self,
        shares_to_sell: Decimal,
        sale_price: Decimal,
        sale_date: NaiveDate,
        method: CostBasisMethod,
    ) -> Result<SaleResult, LedgerError> {
        if shares_to_sell <= Decimal::ZERO {
            return Err(LedgerError::InvalidQuantity(format!(
                "Shares to sell must be positive, got {}",
                shares_to_sell
            )));
        }
        if sale_price.is_sign_negative() {
            return Err(LedgerError::InvalidQuantity(format!(
                "Sale price must not be negative, got {}",
                sale_price
            )));
        }

        let held = self.total_shares();
        let shortfall = shares_to_sell - held;
        if shortfall > Decimal::ZERO && is_quantity_significant(&shortfall) {
            warn!(
                "Rejected sale of {} {} on {}: only {} held",
                shares_to_sell, self.symbol, sale_date, held
            );
            return Err(LedgerError::InsufficientShares {
                symbol: self.symbol.clone(),
                held,
                requested: shares_to_sell,
            });
        }

        let order: Vec<usize> = match method {
            CostBasisMethod::Fifo => (0..self.lots.len()).collect(),
            CostBasisMethod::Lifo => (0..self.lots.len()).rev().collect(),
        };

        let mut left = shares_to_sell;
        let mut consumed_lots = Vec::new();
        for index in order {
            if left <= Decimal::ZERO {
                break;
            }
            let Some(lot) = self.lots.get_mut(index) else {
                continue;
            };
            if lot.remaining <= Decimal::ZERO {
                continue;
            }

            let mut taken = lot.remaining.min(left);
            let leftover = lot.remaining - taken;
            if leftover > Decimal::ZERO && !is_quantity_significant(&leftover) {
                // A rounding leftover leaves with the sale, basis included.
                taken = lot.remaining;
            }
            lot.remaining -= taken;
            left = (left - taken).max(Decimal::ZERO);

            consumed_lots.push(LotConsumption {
                lot_id: lot.id.clone(),
                acquired_date: lot.acquired_date,
                price_per_share: lot.price_per_share,
                shares_taken: taken,
                lot_closed: lot.remaining.is_zero(),
            });
        }

        // Only lots emptied by this sale are dropped; untouched lots stay
        // whatever their size.
        self.lots.retain(|lot| lot.remaining > Decimal::ZERO);

        let cost_basis: Decimal = consumed_lots.iter().map(LotConsumption::cost_basis).sum();
        let proceeds = shares_to_sell * sale_price;
        let capital_gain = proceeds - cost_basis;

        debug!(
            "Sold {} {} @ {} ({}): cost basis {}, gain {}, {} lot(s) touched",
            shares_to_sell,
            self.symbol,
            sale_price,
            method,
            cost_basis,
            capital_gain,
            consumed_lots.len()
        );

        Ok(SaleResult {
            symbol: self.symbol.clone(),
            sale_date,
            method,
            shares_sold: shares_to_sell,
            sale_price,
            consumed_lots,
            cost_basis,
            proceeds,
            capital_gain,
        })
    }
}
