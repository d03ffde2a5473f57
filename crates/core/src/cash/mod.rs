//! Uninvested cash held alongside the portfolio.

mod cash_errors;
mod cash_ledger;
mod cash_model;


pub use cash_errors::*;
pub use cash_ledger::*;
pub use cash_model::*;
