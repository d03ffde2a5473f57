use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transactions::{Transaction, TransactionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashTransactionKind {
    Deposit,
    Withdrawal,
    /// Manual correction: `amount` is the new balance.
    SetBalance,
    /// Settlement of a buy, sell or cash dividend. `amount` is signed.
    Trade,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashTransaction {
    pub id: String,
    pub kind: CashTransactionKind,
    pub amount: Decimal,
    /// Balance after this entry was applied.
    pub balance_after: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
    /// Market transaction that caused a `Trade` entry.
    #[serde(default)]
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Signed cash movement caused by a market transaction.
///
/// Buys debit `shares × price` and sells credit their proceeds. Cash
/// dividends credit the amount paid. Reinvestment buys and reinvested
/// dividends cancel out, so both are cash-neutral.
pub fn cash_effect(transaction: &Transaction) -> Decimal {
    match transaction.kind {
        TransactionKind::Buy if transaction.is_reinvestment => Decimal::ZERO,
        TransactionKind::Buy => -transaction.gross_amount(),
        TransactionKind::Sell => transaction.gross_amount(),
        TransactionKind::Dividend => transaction.cash_dividend(),
    }
}
