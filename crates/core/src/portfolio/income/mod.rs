//! Dividend income: history, trailing yields and forward projections.

mod dividend_calculator;
mod income_model;

#[cfg(test)]
mod dividend_calculator_tests;

pub use dividend_calculator::*;
pub use income_model::*;
