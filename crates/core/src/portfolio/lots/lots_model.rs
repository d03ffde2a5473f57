use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, ValidationError};

/// Order in which lots are relieved when shares are sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostBasisMethod {
    /// Oldest-acquired lots first.
    #[default]
    Fifo,
    /// Most recently acquired lots first.
    Lifo,
}

impl CostBasisMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostBasisMethod::Fifo => "FIFO",
            CostBasisMethod::Lifo => "LIFO",
        }
    }
}

impl fmt::Display for CostBasisMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostBasisMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FIFO" => Ok(CostBasisMethod::Fifo),
            "LIFO" => Ok(CostBasisMethod::Lifo),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown cost basis method '{}'",
                other
            ))
            .into()),
        }
    }
}

/// A batch of shares acquired by one buy and not yet fully sold.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub id: String,
    /// Buy transaction that opened this lot, if it came from the log.
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// Share count at acquisition.
    pub shares: Decimal,
    /// Shares still held. Only ever decreases.
    pub remaining: Decimal,
    pub price_per_share: Decimal,
    pub acquired_date: NaiveDate,
}

impl Lot {
    pub fn new(shares: Decimal, price_per_share: Decimal, acquired_date: NaiveDate) -> Self {
        Lot {
            id: uuid::Uuid::new_v4().to_string(),
            transaction_id: None,
            shares,
            remaining: shares,
            price_per_share,
            acquired_date,
        }
    }

    /// Value of the remaining shares at acquisition price.
    pub fn cost_basis(&self) -> Decimal {
        self.remaining * self.price_per_share
    }

    pub fn sold(&self) -> Decimal {
        self.shares - self.remaining
    }
}

/// How many shares a sale took from one lot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LotConsumption {
    pub lot_id: String,
    pub acquired_date: NaiveDate,
    pub price_per_share: Decimal,
    pub shares_taken: Decimal,
    /// True when the sale emptied the lot, rounding leftover included, and
    /// it was pruned.
    pub lot_closed: bool,
}

impl LotConsumption {
    pub fn cost_basis(&self) -> Decimal {
        self.shares_taken * self.price_per_share
    }
}

/// Outcome of relieving lots for one sale.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleResult {
    pub symbol: String,
    pub sale_date: NaiveDate,
    pub method: CostBasisMethod,
    pub shares_sold: Decimal,
    pub sale_price: Decimal,
    /// Lots touched, in the order they were consumed.
    pub consumed_lots: Vec<LotConsumption>,
    pub cost_basis: Decimal,
    pub proceeds: Decimal,
    pub capital_gain: Decimal,
}

impl SaleResult {
    pub fn capital_gain_percent(&self) -> Decimal {
        crate::utils::decimal_utils::percent_of(self.capital_gain, self.cost_basis)
    }
}
