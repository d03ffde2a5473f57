use thiserror::Error;

/// Errors raised while validating or linking transactions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransactionError {
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Transaction {0} already exists")]
    DuplicateTransaction(String),

    #[error("Transaction {0} not found")]
    NotFound(String),

    #[error("Reinvested dividend {0} has no paired reinvestment buy")]
    MissingReinvestmentPair(String),

    #[error("Reinvestment buy {0} is not linked to a reinvested dividend")]
    OrphanReinvestment(String),
}
