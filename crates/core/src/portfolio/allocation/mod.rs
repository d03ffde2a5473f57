//! Sector allocation and the diversification score.

mod allocation_calculator;
mod allocation_model;
mod sector_lookup;

#[cfg(test)]
mod allocation_calculator_tests;

pub use allocation_calculator::*;
pub use allocation_model::*;
pub use sector_lookup::*;
