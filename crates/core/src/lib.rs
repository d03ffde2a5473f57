//! Lotfolio Core - tax-lot accounting and portfolio valuation.
//!
//! Transactions go in, holdings, valuations and dividend estimates come out.
//! Every calculation is a pure function of its inputs; storage and price
//! feeds stay with the host, which reaches the market through
//! [`quotes::PriceProviderTrait`].

pub mod cash;
pub mod constants;
pub mod errors;
pub mod portfolio;
pub mod quotes;
pub mod reminders;
pub mod settings;
pub mod transactions;
pub mod utils;

pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
