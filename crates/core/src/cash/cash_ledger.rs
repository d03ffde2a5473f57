use chrono::{NaiveDate, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cash_errors::CashError;
use super::cash_model::{cash_effect, CashTransaction, CashTransactionKind};
use crate::errors::Result;
use crate::transactions::Transaction;

/// Running cash balance with the entries that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashLedger {
    balance: Decimal,
    entries: Vec<CashTransaction>,
}

impl CashLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(balance: Decimal) -> Self {
        CashLedger {
            balance,
            entries: Vec::new(),
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn entries(&self) -> &[CashTransaction] {
        &self.entries
    }

    /// Sum of all deposits ever made.
    pub fn total_deposits(&self) -> Decimal {
        self.sum_of(CashTransactionKind::Deposit)
    }

    pub fn total_withdrawals(&self) -> Decimal {
        self.sum_of(CashTransactionKind::Withdrawal)
    }

    fn sum_of(&self, kind: CashTransactionKind) -> Decimal {
        self.entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.amount)
            .sum()
    }

    pub fn deposit(&mut self, amount: Decimal, date: NaiveDate, note: Option<String>) -> Result<&CashTransaction> {
        require_positive(amount)?;
        self.balance += amount;
        Ok(self.record(CashTransactionKind::Deposit, amount, date, note, None))
    }

    /// Fails with `InsufficientCash` and leaves the balance alone when the
    /// withdrawal exceeds it.
    pub fn withdraw(&mut self, amount: Decimal, date: NaiveDate, note: Option<String>) -> Result<&CashTransaction> {
        require_positive(amount)?;
        if amount > self.balance {
            return Err(CashError::InsufficientCash {
                balance: self.balance,
                requested: amount,
            }
            .into());
        }
        self.balance -= amount;
        Ok(self.record(CashTransactionKind::Withdrawal, amount, date, note, None))
    }

    pub fn set_balance(&mut self, balance: Decimal, date: NaiveDate, note: Option<String>) -> Result<&CashTransaction> {
        if balance.is_sign_negative() {
            return Err(CashError::InvalidAmount(format!(
                "balance cannot be negative, got {}",
                balance
            ))
            .into());
        }
        self.balance = balance;
        Ok(self.record(CashTransactionKind::SetBalance, balance, date, note, None))
    }

    /// Settles a market transaction against the balance. Returns `None` for
    /// cash-neutral transactions.
    ///
    /// Buys may take the balance below zero; the ledger does not block trades.
    pub fn apply_transaction(&mut self, transaction: &Transaction) -> Option<&CashTransaction> {
        let effect = cash_effect(transaction);
        if effect.is_zero() {
            debug!("{} {} is cash-neutral", transaction.kind, transaction.id);
            return None;
        }
        self.balance += effect;
        if self.balance.is_sign_negative() {
            warn!(
                "Cash balance is negative ({}) after {} {}",
                self.balance, transaction.kind, transaction.id
            );
        }
        Some(self.record(
            CashTransactionKind::Trade,
            effect,
            transaction.date,
            None,
            Some(transaction.id.clone()),
        ))
    }

    fn record(
        &mut self,
        kind: CashTransactionKind,
        amount: Decimal,
        date: NaiveDate,
        note: Option<String>,
        transaction_id: Option<String>,
    ) -> &CashTransaction {
        self.entries.push(CashTransaction {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            amount,
            balance_after: self.balance,
            date,
            note,
            transaction_id,
            created_at: Utc::now(),
        });
        &self.entries[self.entries.len() - 1]
    }
}

fn require_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(CashError::InvalidAmount(format!("amount must be positive, got {}", amount)).into());
    }
    Ok(())
}
