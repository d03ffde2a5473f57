use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

use super::transactions_errors::TransactionError;
use super::transactions_model::{
    normalize_symbol, sort_chronologically, NewTransaction, Transaction, TransactionKind,
};
use crate::errors::Result;
use crate::portfolio::holdings::build_holding;
use crate::portfolio::lots::CostBasisMethod;
use crate::utils::decimal_utils::round_to_cents;

/// Shares bought with a reinvested dividend.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reinvestment {
    pub shares: Decimal,
    pub price_per_share: Decimal,
}

/// A recorded dividend and, when reinvested, the buy it paid for.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DividendRecord {
    pub dividend: Transaction,
    pub reinvestment_buy: Option<Transaction>,
}

/// Append-only list of transactions.
///
/// Edits are a `remove` followed by a fresh `append`; stored records are never
/// changed in place.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct TransactionLog {
    transactions: Vec<Transaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a persisted log, checking each record's fields, ids and
    /// dividend/reinvestment links.
    pub fn from_transactions(transactions: Vec<Transaction>) -> Result<Self> {
        let mut seen = HashSet::new();
        for transaction in &transactions {
            transaction.validate()?;
            if !seen.insert(transaction.id.as_str()) {
                return Err(TransactionError::DuplicateTransaction(transaction.id.clone()).into());
            }
        }
        let log = TransactionLog { transactions };
        log.validate_links()?;
        Ok(log)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn into_inner(self) -> Vec<Transaction> {
        self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Appends a buy, sell or cash dividend.
    ///
    /// Sells are replayed against the symbol's history first and rejected with
    /// `InsufficientShares` if any point in time would go short.
    pub fn append(&mut self, new_transaction: NewTransaction) -> Result<Transaction> {
        if new_transaction.is_reinvestment {
            return Err(TransactionError::InvalidTransaction(
                "reinvestment buys are recorded together with their dividend".to_string(),
            )
            .into());
        }
        let transaction = new_transaction.into_transaction()?;
        if transaction.reinvested {
            return Err(TransactionError::MissingReinvestmentPair(transaction.id).into());
        }
        if transaction.is_sell() {
            self.check_sell_is_covered(&transaction)?;
        }

        debug!(
            "Appending {} {} {} on {}",
            transaction.kind, transaction.symbol, transaction.id, transaction.date
        );
        self.transactions.push(transaction.clone());
        Ok(transaction)
    }

    fn check_sell_is_covered(&self, sell: &Transaction) -> Result<()> {
        let candidate = self
            .transactions
            .iter()
            .filter(|t| t.symbol == sell.symbol)
            .chain(std::iter::once(sell));
        build_holding(&sell.symbol, candidate, CostBasisMethod::Fifo).map(|_| ())
    }

    /// Records a dividend. With a reinvestment the paired buy is appended in
    /// the same call and linked through `dividend_transaction_id`.
    pub fn record_dividend(
        &mut self,
        symbol: &str,
        amount: Decimal,
        date: NaiveDate,
        reinvestment: Option<Reinvestment>,
        notes: Option<String>,
    ) -> Result<DividendRecord> {
        let mut new_dividend = NewTransaction::dividend(symbol, amount, date);
        new_dividend.reinvested = reinvestment.is_some();
        new_dividend.notes = notes;
        let dividend = new_dividend.into_transaction()?;

        let reinvestment_buy = match reinvestment {
            Some(reinvestment) => {
                let mut new_buy = NewTransaction::buy(
                    &dividend.symbol,
                    reinvestment.shares,
                    reinvestment.price_per_share,
                    date,
                )
                .with_notes(format!("Dividend reinvestment - {}", dividend.symbol));
                new_buy.is_reinvestment = true;
                new_buy.dividend_transaction_id = Some(dividend.id.clone());
                let buy = new_buy.into_transaction()?;

                let cost = buy.gross_amount();
                if round_to_cents(cost) != round_to_cents(amount) {
                    warn!(
                        "Reinvestment of {} dividend {} costs {} but the dividend paid {}",
                        dividend.symbol, dividend.id, cost, amount
                    );
                }
                Some(buy)
            }
            None => None,
        };

        debug!(
            "Recording {} dividend {} of {} (reinvested: {})",
            dividend.symbol,
            dividend.id,
            amount,
            reinvestment_buy.is_some()
        );
        self.transactions.push(dividend.clone());
        if let Some(buy) = &reinvestment_buy {
            self.transactions.push(buy.clone());
        }

        Ok(DividendRecord {
            dividend,
            reinvestment_buy,
        })
    }

    /// Deletes a transaction and returns what was removed.
    ///
    /// Removing a reinvested dividend also removes its reinvestment buy. A
    /// reinvestment buy cannot be removed on its own.
    pub fn remove(&mut self, id: &str) -> Result<Vec<Transaction>> {
        let target = self
            .get(id)
            .ok_or_else(|| TransactionError::NotFound(id.to_string()))?;

        if target.is_reinvestment {
            let dividend_id = target.dividend_transaction_id.clone().unwrap_or_default();
            return Err(TransactionError::InvalidTransaction(format!(
                "reinvestment buy {} belongs to dividend {}; remove the dividend instead",
                id, dividend_id
            ))
            .into());
        }

        let cascade = target.is_dividend() && target.reinvested;
        let (removed, kept): (Vec<Transaction>, Vec<Transaction>) =
            std::mem::take(&mut self.transactions)
                .into_iter()
                .partition(|t| {
                    t.id == id || (cascade && t.dividend_transaction_id.as_deref() == Some(id))
                });
        self.transactions = kept;

        debug!("Removed {} transaction(s) for {}", removed.len(), id);
        Ok(removed)
    }

    /// The symbol's transactions in replay order.
    pub fn for_symbol(&self, symbol: &str) -> Vec<&Transaction> {
        let symbol = normalize_symbol(symbol);
        sort_chronologically(self.transactions.iter().filter(|t| t.symbol == symbol))
    }

    /// Distinct symbols, sorted.
    pub fn symbols(&self) -> Vec<String> {
        self.transactions
            .iter()
            .map(|t| t.symbol.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Every reinvested dividend must have exactly one reinvestment buy and
    /// every reinvestment buy must point at a reinvested dividend.
    pub fn validate_links(&self) -> Result<()> {
        let dividends: HashMap<&str, &Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Dividend && t.reinvested)
            .map(|t| (t.id.as_str(), t))
            .collect();

        let mut paired: HashMap<&str, usize> = HashMap::new();
        for buy in self.transactions.iter().filter(|t| t.is_reinvestment) {
            let linked = buy
                .dividend_transaction_id
                .as_deref()
                .and_then(|id| dividends.get(id));
            match linked {
                Some(dividend) if dividend.symbol == buy.symbol => {
                    *paired.entry(dividend.id.as_str()).or_default() += 1;
                }
                _ => return Err(TransactionError::OrphanReinvestment(buy.id.clone()).into()),
            }
        }

        for id in dividends.keys() {
            if paired.get(id).copied() != Some(1) {
                return Err(TransactionError::MissingReinvestmentPair(id.to_string()).into());
            }
        }
        Ok(())
    }
}
