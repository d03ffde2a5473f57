//! Duplicate detection keys for imported transactions.
//!
//! Two records are the same when they share a date, an amount in whole cents
//! and a description (case and whitespace insensitive). The key is hashed so
//! callers can persist it alongside the transaction.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use super::transactions_model::Transaction;
use crate::utils::decimal_utils::round_to_cents;

/// SHA-256 hex digest of `(date, amount in cents, description)`.
pub fn compute_duplicate_key(date: NaiveDate, amount: Decimal, description: Option<&str>) -> String {
    let mut hasher = Sha256::new();

    hasher.update(date.format("%Y-%m-%d").to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(normalize_amount(amount).as_bytes());
    hasher.update(b"|");
    if let Some(desc) = description {
        hasher.update(normalize_description(desc).as_bytes());
    }

    hex::encode(hasher.finalize())
}

/// Duplicate key of a stored transaction, using its gross amount and notes.
pub fn compute_transaction_duplicate_key(transaction: &Transaction) -> String {
    compute_duplicate_key(
        transaction.date,
        transaction.gross_amount(),
        transaction.notes.as_deref(),
    )
}

fn normalize_amount(amount: Decimal) -> String {
    // 12.3 and 12.30 must hash the same
    round_to_cents(amount).normalize().to_string()
}

fn normalize_description(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
