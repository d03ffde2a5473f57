use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CashError {
    #[error("Insufficient cash: balance {balance}, requested {requested}")]
    InsufficientCash { balance: Decimal, requested: Decimal },

    #[error("Invalid cash amount: {0}")]
    InvalidAmount(String),
}
