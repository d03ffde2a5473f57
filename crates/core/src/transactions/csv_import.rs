//! CSV import of transactions with duplicate detection.
//!
//! Expected columns (header names are case-insensitive, order is free):
//! `date, symbol, type, shares, price, amount, description`. Only `date`,
//! `symbol` and `type` are mandatory as columns; per-kind field checks happen
//! row by row.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::str::FromStr;

use super::idempotency::{compute_duplicate_key, compute_transaction_duplicate_key};
use super::transaction_log::TransactionLog;
use super::transactions_model::{NewTransaction, TransactionKind};
use crate::errors::{ImportError, Result};

const REQUIRED_COLUMNS: [&str; 3] = ["date", "symbol", "type"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

#[derive(Debug, Deserialize)]
struct CsvTransactionRow {
    date: String,
    symbol: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    shares: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    amount: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// A row that could not be imported. `line` is the 1-based line in the file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImportRowError {
    pub line: u64,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
    pub duplicates_skipped: usize,
    pub imported_ids: Vec<String>,
    pub errors: Vec<ImportRowError>,
}

/// Reads transactions from CSV and appends the new ones to `log`.
///
/// Rows are applied in date order so a sell may appear in the file before the
/// buy that covers it. Duplicates of existing log entries or of earlier rows
/// in the same file are skipped and counted. Bad rows are reported in the
/// summary and do not abort the batch.
pub fn import_transactions_csv<R: Read>(reader: R, log: &mut TransactionLog) -> Result<ImportSummary> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: StringRecord = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ImportError::MissingColumn(column.to_string()).into());
        }
    }

    let mut summary = ImportSummary::default();
    let mut parsed: Vec<(u64, NewTransaction)> = Vec::new();

    for (index, record) in csv_reader.records().enumerate() {
        let fallback_line = index as u64 + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                summary.errors.push(ImportRowError {
                    line: e.position().map_or(fallback_line, |p| p.line()),
                    message: e.to_string(),
                });
                continue;
            }
        };
        let line = record.position().map_or(fallback_line, |p| p.line());
        if record.iter().all(str::is_empty) {
            continue;
        }

        let row = record
            .deserialize::<CsvTransactionRow>(Some(&headers))
            .map_err(|e| e.to_string())
            .and_then(|row| row_to_transaction(&row));
        match row {
            Ok(new_transaction) => parsed.push((line, new_transaction)),
            Err(message) => summary.errors.push(ImportRowError { line, message }),
        }
    }

    parsed.sort_by_key(|(_, t)| t.date);

    let mut seen: HashSet<String> = log
        .transactions()
        .iter()
        .map(compute_transaction_duplicate_key)
        .collect();

    for (line, new_transaction) in parsed {
        let key = compute_duplicate_key(
            new_transaction.date,
            gross_amount(&new_transaction),
            new_transaction.notes.as_deref(),
        );
        if seen.contains(&key) {
            debug!("Skipping duplicate row at line {}", line);
            summary.duplicates_skipped += 1;
            continue;
        }

        match log.append(new_transaction) {
            Ok(transaction) => {
                seen.insert(key);
                summary.imported += 1;
                summary.imported_ids.push(transaction.id);
            }
            Err(e) => {
                warn!("Import row at line {} rejected: {}", line, e);
                summary.errors.push(ImportRowError {
                    line,
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        "CSV import finished: {} imported, {} duplicates skipped, {} errors",
        summary.imported,
        summary.duplicates_skipped,
        summary.errors.len()
    );
    Ok(summary)
}

fn gross_amount(t: &NewTransaction) -> Decimal {
    match t.kind {
        TransactionKind::Dividend => t.dividend_amount.unwrap_or(Decimal::ZERO),
        TransactionKind::Buy | TransactionKind::Sell => t.shares * t.price_per_share,
    }
}

fn row_to_transaction(row: &CsvTransactionRow) -> std::result::Result<NewTransaction, String> {
    let date = parse_date(&row.date)?;
    let kind = TransactionKind::from_str(&row.kind).map_err(|e| e.to_string())?;
    let shares = parse_optional_decimal("shares", row.shares.as_deref())?;
    let price = parse_optional_decimal("price", row.price.as_deref())?;
    let amount = parse_optional_decimal("amount", row.amount.as_deref())?;

    let mut new_transaction = match kind {
        TransactionKind::Dividend => {
            let amount = amount.ok_or("dividend rows need an amount")?;
            NewTransaction::dividend(&row.symbol, amount, date)
        }
        TransactionKind::Buy | TransactionKind::Sell => {
            let shares = shares.ok_or("trade rows need shares")?;
            let price = match (price, amount) {
                (Some(price), _) => price,
                (None, Some(amount)) if shares > Decimal::ZERO => amount / shares,
                _ => return Err("trade rows need a price or an amount".to_string()),
            };
            if kind == TransactionKind::Buy {
                NewTransaction::buy(&row.symbol, shares, price, date)
            } else {
                NewTransaction::sell(&row.symbol, shares, price, date)
            }
        }
    };
    if let Some(description) = row.description.as_deref().filter(|d| !d.is_empty()) {
        new_transaction = new_transaction.with_notes(description);
    }

    new_transaction.validate().map_err(|e| e.to_string())?;
    Ok(new_transaction)
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .ok_or_else(|| format!("unrecognised date '{}'", value))
}

fn parse_optional_decimal(
    field: &str,
    value: Option<&str>,
) -> std::result::Result<Option<Decimal>, String> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    Decimal::from_str(&cleaned)
        .map(Some)
        .map_err(|e| format!("invalid {} '{}': {}", field, raw, e))
}
