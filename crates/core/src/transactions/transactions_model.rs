use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::transactions_errors::TransactionError;
use crate::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Buy,
    Sell,
    Dividend,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Buy => "BUY",
            TransactionKind::Sell => "SELL",
            TransactionKind::Dividend => "DIVIDEND",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = TransactionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(TransactionKind::Buy),
            "SELL" => Ok(TransactionKind::Sell),
            "DIVIDEND" | "DIV" => Ok(TransactionKind::Dividend),
            other => Err(TransactionError::InvalidTransaction(format!(
                "Unknown transaction type '{}'",
                other
            ))),
        }
    }
}

/// One recorded market action. Never mutated once in the log.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub symbol: String,
    pub kind: TransactionKind,
    /// Zero for dividends.
    pub shares: Decimal,
    /// Zero for dividends.
    pub price_per_share: Decimal,
    #[serde(default)]
    pub dividend_amount: Option<Decimal>,
    /// Dividend only: the cash was used to buy more shares.
    #[serde(default)]
    pub reinvested: bool,
    /// Buy only: this purchase is the reinvestment leg of a dividend.
    #[serde(default)]
    pub is_reinvestment: bool,
    /// Buy only: id of the dividend this reinvestment came from.
    #[serde(default)]
    pub dividend_transaction_id: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_buy(&self) -> bool {
        self.kind == TransactionKind::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.kind == TransactionKind::Sell
    }

    pub fn is_dividend(&self) -> bool {
        self.kind == TransactionKind::Dividend
    }

    /// Cash value of the transaction: `shares × price` for trades, the paid
    /// amount for dividends.
    pub fn gross_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Buy | TransactionKind::Sell => self.shares * self.price_per_share,
            TransactionKind::Dividend => self.dividend_amount.unwrap_or(Decimal::ZERO),
        }
    }

    /// Dividend amount paid out as cash (zero for reinvested dividends and trades).
    pub fn cash_dividend(&self) -> Decimal {
        if self.is_dividend() && !self.reinvested {
            self.gross_amount()
        } else {
            Decimal::ZERO
        }
    }

    /// Re-checks the field rules a stored record was admitted under.
    pub fn validate(&self) -> Result<()> {
        NewTransaction::from(self).validate()
    }
}

/// Input for a transaction that has not been assigned an id yet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub symbol: String,
    pub kind: TransactionKind,
    #[serde(default)]
    pub shares: Decimal,
    #[serde(default)]
    pub price_per_share: Decimal,
    #[serde(default)]
    pub dividend_amount: Option<Decimal>,
    #[serde(default)]
    pub reinvested: bool,
    #[serde(default)]
    pub is_reinvestment: bool,
    #[serde(default)]
    pub dividend_transaction_id: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewTransaction {
    pub fn buy(symbol: &str, shares: Decimal, price_per_share: Decimal, date: NaiveDate) -> Self {
        Self::trade(symbol, TransactionKind::Buy, shares, price_per_share, date)
    }

    pub fn sell(symbol: &str, shares: Decimal, price_per_share: Decimal, date: NaiveDate) -> Self {
        Self::trade(symbol, TransactionKind::Sell, shares, price_per_share, date)
    }

    /// A cash dividend. Reinvested dividends go through
    /// `TransactionLog::record_dividend` so the paired buy is created with them.
    pub fn dividend(symbol: &str, amount: Decimal, date: NaiveDate) -> Self {
        NewTransaction {
            symbol: symbol.to_string(),
            kind: TransactionKind::Dividend,
            shares: Decimal::ZERO,
            price_per_share: Decimal::ZERO,
            dividend_amount: Some(amount),
            reinvested: false,
            is_reinvestment: false,
            dividend_transaction_id: None,
            date,
            notes: None,
        }
    }

    fn trade(
        symbol: &str,
        kind: TransactionKind,
        shares: Decimal,
        price_per_share: Decimal,
        date: NaiveDate,
    ) -> Self {
        NewTransaction {
            symbol: symbol.to_string(),
            kind,
            shares,
            price_per_share,
            dividend_amount: None,
            reinvested: false,
            is_reinvestment: false,
            dividend_transaction_id: None,
            date,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Checks required fields. Runs before anything reaches the ledger.
    pub fn validate(&self) -> Result<()> {
        if normalize_symbol(&self.symbol).is_empty() {
            return Err(invalid("symbol is required"));
        }
        match self.kind {
            TransactionKind::Buy | TransactionKind::Sell => {
                if self.shares <= Decimal::ZERO {
                    return Err(invalid(&format!(
                        "{} shares must be positive, got {}",
                        self.kind, self.shares
                    )));
                }
                if self.price_per_share <= Decimal::ZERO {
                    return Err(invalid(&format!(
                        "{} price per share must be positive, got {}",
                        self.kind, self.price_per_share
                    )));
                }
                if self.dividend_amount.is_some() || self.reinvested {
                    return Err(invalid("dividend fields are only valid on dividends"));
                }
                if self.kind == TransactionKind::Sell && self.is_reinvestment {
                    return Err(invalid("a sell cannot be a dividend reinvestment"));
                }
                if self.is_reinvestment != self.dividend_transaction_id.is_some() {
                    return Err(invalid(
                        "reinvestment buys must reference their dividend transaction",
                    ));
                }
            }
            TransactionKind::Dividend => {
                match self.dividend_amount {
                    Some(amount) if amount > Decimal::ZERO => {}
                    Some(amount) => {
                        return Err(invalid(&format!(
                            "dividend amount must be positive, got {}",
                            amount
                        )))
                    }
                    None => return Err(invalid("dividend amount is required")),
                }
                if !self.shares.is_zero() || !self.price_per_share.is_zero() {
                    return Err(invalid("dividends carry no shares or price"));
                }
                if self.is_reinvestment || self.dividend_transaction_id.is_some() {
                    return Err(invalid("only buys can be reinvestments"));
                }
            }
        }
        Ok(())
    }

    /// Validates and stamps the record with a fresh id and creation time.
    pub fn into_transaction(self) -> Result<Transaction> {
        self.validate()?;
        Ok(Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            symbol: normalize_symbol(&self.symbol),
            kind: self.kind,
            shares: self.shares,
            price_per_share: self.price_per_share,
            dividend_amount: self.dividend_amount,
            reinvested: self.reinvested,
            is_reinvestment: self.is_reinvestment,
            dividend_transaction_id: self.dividend_transaction_id,
            date: self.date,
            notes: self
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            created_at: Utc::now(),
        })
    }
}

impl From<&Transaction> for NewTransaction {
    fn from(transaction: &Transaction) -> Self {
        NewTransaction {
            symbol: transaction.symbol.clone(),
            kind: transaction.kind,
            shares: transaction.shares,
            price_per_share: transaction.price_per_share,
            dividend_amount: transaction.dividend_amount,
            reinvested: transaction.reinvested,
            is_reinvestment: transaction.is_reinvestment,
            dividend_transaction_id: transaction.dividend_transaction_id.clone(),
            date: transaction.date,
            notes: transaction.notes.clone(),
        }
    }
}

fn invalid(message: &str) -> crate::errors::Error {
    TransactionError::InvalidTransaction(message.to_string()).into()
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Orders transactions by date. Same-date entries keep their log order.
pub fn sort_chronologically<'a, I>(transactions: I) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut sorted: Vec<&Transaction> = transactions.into_iter().collect();
    sorted.sort_by_key(|t| t.date);
    sorted
}

/// Shares of `symbol` held at the end of `date`: buys minus sells dated on or
/// before it, floored at zero.
pub fn shares_held_at<'a, I>(transactions: I, symbol: &str, date: NaiveDate) -> Decimal
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let symbol = normalize_symbol(symbol);
    let net: Decimal = transactions
        .into_iter()
        .filter(|t| t.symbol == symbol && t.date <= date)
        .map(|t| match t.kind {
            TransactionKind::Buy => t.shares,
            TransactionKind::Sell => -t.shares,
            TransactionKind::Dividend => Decimal::ZERO,
        })
        .sum();
    net.max(Decimal::ZERO)
}
