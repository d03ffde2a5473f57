//! Tax lots and the FIFO/LIFO consumption algorithm.

mod lot_ledger;
mod lots_model;


pub use lot_ledger::*;
pub use lots_model::*;
