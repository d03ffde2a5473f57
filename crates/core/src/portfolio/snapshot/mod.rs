//! Point-in-time portfolio valuations kept for history charts.

mod snapshot_history;
mod snapshot_model;

#[cfg(test)]
mod snapshot_history_tests;

pub use snapshot_history::*;
pub use snapshot_model::*;
