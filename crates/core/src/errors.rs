//! Core error types for the lot accounting engine.
//!
//! Every engine operation returns these synchronously. Nothing here is
//! transient, so callers surface them to the user rather than retrying.

use chrono::ParseError as ChronoParseError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::cash::CashError;
use crate::quotes::QuoteError;
use crate::reminders::ReminderError;
use crate::transactions::TransactionError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Lot ledger operation failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Cash error: {0}")]
    Cash(#[from] CashError),

    #[error("Dividend reminder error: {0}")]
    Reminder(#[from] ReminderError),

    #[error("Market data operation failed: {0}")]
    Quote(#[from] QuoteError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors raised while consuming tax lots.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Insufficient shares of {symbol}: held {held}, requested {requested}")]
    InsufficientShares {
        symbol: String,
        held: Decimal,
        requested: Decimal,
    },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] ChronoParseError),
}

/// Errors that abort a whole CSV import. Row-level problems are reported in
/// the import summary instead.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("CSV could not be read: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required column '{0}'")]
    MissingColumn(String),
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Import(ImportError::Csv(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
