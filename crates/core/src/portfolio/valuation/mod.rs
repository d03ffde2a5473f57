//! Portfolio-level valuation: market value, day change, YTD and lifetime
//! return.

mod valuation_calculator;
mod valuation_model;


pub use valuation_calculator::*;
pub use valuation_model::*;
