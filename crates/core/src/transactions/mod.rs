//! Transaction log: the append-only record of buys, sells and dividends.

mod csv_import;
mod idempotency;
mod transaction_log;
mod transactions_errors;
mod transactions_model;

#[cfg(test)]
mod transactions_model_tests;

pub use csv_import::*;
pub use idempotency::*;
pub use transaction_log::*;
pub use transactions_errors::*;
pub use transactions_model::*;
