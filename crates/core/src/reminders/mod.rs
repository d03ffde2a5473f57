//! Dividend reminders: expected future payments, kept apart from the
//! transaction log.

mod reminder_book;
mod reminders_errors;
mod reminders_model;


pub use reminder_book::*;
pub use reminders_errors::*;
pub use reminders_model::*;
