use log::{debug, error};
use std::collections::BTreeMap;

use super::holdings_model::{Holding, HoldingsCalculationResult, HoldingsCalculationWarning};
use crate::errors::{Error, Result};
use crate::portfolio::lots::CostBasisMethod;
use crate::transactions::{normalize_symbol, sort_chronologically, Transaction, TransactionKind};

/// Replays one symbol's transactions into a [`Holding`].
///
/// Transactions for other symbols are ignored. Replay is by date, ties in the
/// order given. Reinvestment buys open lots like any other buy; dividends do
/// not touch lots. Each record is re-validated before it is applied, and the
/// first transaction that fails aborts the replay.
pub fn build_holding<'a, I>(symbol: &str, transactions: I, method: CostBasisMethod) -> Result<Holding>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    replay(symbol, transactions, method, |_, e| Err(e))
}

fn replay<'a, I, F>(
    symbol: &str,
    transactions: I,
    method: CostBasisMethod,
    mut on_failure: F,
) -> Result<Holding>
where
    I: IntoIterator<Item = &'a Transaction>,
    F: FnMut(&Transaction, Error) -> Result<()>,
{
    let symbol = normalize_symbol(symbol);
    let mut holding = Holding::new(symbol.clone());

    let matching = transactions
        .into_iter()
        .filter(|t| t.symbol.eq_ignore_ascii_case(&symbol));
    for transaction in sort_chronologically(matching) {
        if let Err(e) = apply_transaction(&mut holding, transaction, method) {
            on_failure(transaction, e)?;
        }
    }
    Ok(holding)
}

fn apply_transaction(
    holding: &mut Holding,
    transaction: &Transaction,
    method: CostBasisMethod,
) -> Result<()> {
    transaction.validate()?;
    match transaction.kind {
        TransactionKind::Buy => {
            holding.ledger.apply_buy_from(
                &transaction.id,
                transaction.shares,
                transaction.price_per_share,
                transaction.date,
            );
            if holding.first_acquired.map_or(true, |d| transaction.date < d) {
                holding.first_acquired = Some(transaction.date);
            }
        }
        TransactionKind::Sell => {
            let sale = holding.ledger.apply_sale(
                transaction.shares,
                transaction.price_per_share,
                transaction.date,
                method,
            )?;
            holding.sales.push(sale);
        }
        TransactionKind::Dividend => {
            debug!(
                "Dividend {} on {} leaves lots of {} unchanged",
                transaction.id, transaction.date, holding.symbol
            );
        }
    }
    Ok(())
}

/// Rebuilds every holding in a transaction log.
///
/// Unlike [`build_holding`], a failing transaction does not stop the
/// calculation: it is skipped and reported as a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldingsCalculator {
    method: CostBasisMethod,
}

impl HoldingsCalculator {
    pub fn new(method: CostBasisMethod) -> Self {
        Self { method }
    }

    pub fn method(&self) -> CostBasisMethod {
        self.method
    }

    pub fn calculate(&self, transactions: &[Transaction]) -> HoldingsCalculationResult {
        let mut by_symbol: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
        for transaction in transactions {
            by_symbol
                .entry(transaction.symbol.as_str())
                .or_default()
                .push(transaction);
        }

        let mut result = HoldingsCalculationResult::default();
        for (symbol, symbol_transactions) in by_symbol {
            let mut warnings = Vec::new();
            let replayed = replay(
                symbol,
                symbol_transactions.iter().copied(),
                self.method,
                |transaction, e| {
                    let warning = HoldingsCalculationWarning {
                        transaction_id: transaction.id.clone(),
                        symbol: transaction.symbol.clone(),
                        date: transaction.date,
                        message: format!("Failed to replay transaction: {}", e),
                    };
                    error!("{}", warning);
                    warnings.push(warning);
                    Ok(())
                },
            );
            result.warnings.extend(warnings);

            match replayed {
                Ok(holding) if holding.is_active() => result.holdings.push(holding),
                Ok(holding) => {
                    debug!("{} is fully sold; keeping it as a closed position", symbol);
                    result.closed_positions.push(holding);
                }
                Err(e) => error!("Replay of {} failed: {}", symbol, e),
            }
        }
        result
    }
}
