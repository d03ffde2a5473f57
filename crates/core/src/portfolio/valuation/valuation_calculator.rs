use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use rust_decimal::Decimal;

use super::valuation_model::{
    HoldingValuation, LifetimeReturn, PortfolioValuation, PriceStatus, YtdPerformance,
};
use crate::cash::CashLedger;
use crate::portfolio::holdings::{Holding, HoldingsCalculator};
use crate::portfolio::lots::CostBasisMethod;
use crate::quotes::{PriceMap, PriceQuote};
use crate::settings::EngineSettings;
use crate::transactions::{Transaction, TransactionKind};
use crate::utils::decimal_utils::percent_of;
use crate::utils::time_utils::start_of_year;

/// Values a holding at its quoted price, or at average cost when unquoted.
pub fn value_holding(holding: &Holding, quote: Option<&PriceQuote>) -> HoldingValuation {
    let shares = holding.total_shares();
    let average_cost = holding.average_cost();

    let (price, previous_close, price_status) = match quote {
        Some(quote) => (quote.price, quote.effective_previous_close(), PriceStatus::Live),
        None => {
            warn!(
                "No price for {}; valuing at average cost {}",
                holding.symbol, average_cost
            );
            (average_cost, average_cost, PriceStatus::Estimated)
        }
    };

    HoldingValuation {
        symbol: holding.symbol.clone(),
        shares,
        total_cost_basis: holding.total_cost_basis(),
        average_cost,
        price,
        previous_close,
        price_status,
        current_value: holding.current_value(price),
        day_change: shares * (price - previous_close),
        unrealized_gain: holding.unrealized_gain(price),
        unrealized_gain_percent: holding.unrealized_gain_percent(price),
        realized_gain: holding.realized_gain(),
    }
}

/// Estimated year-to-date performance for the calendar year of `as_of`.
///
/// Year-start value is `cost basis − invested + received`, where `invested`
/// is this year's buy costs and `received` this year's sell proceeds plus
/// dividends.
pub fn ytd_performance(
    transactions: &[Transaction],
    total_cost_basis: Decimal,
    current_total_value: Decimal,
    as_of: NaiveDate,
) -> YtdPerformance {
    let year_start = start_of_year(as_of);
    let mut invested = Decimal::ZERO;
    let mut received = Decimal::ZERO;

    for transaction in transactions
        .iter()
        .filter(|t| t.date >= year_start && t.date <= as_of)
    {
        match transaction.kind {
            TransactionKind::Buy => invested += transaction.gross_amount(),
            TransactionKind::Sell | TransactionKind::Dividend => {
                received += transaction.gross_amount()
            }
        }
    }

    let estimated_year_start_value = total_cost_basis - invested + received;
    let gain = current_total_value - estimated_year_start_value - invested + received;

    YtdPerformance {
        year: as_of.year(),
        estimated_year_start_value,
        invested,
        received,
        gain,
        gain_percent: percent_of(gain, estimated_year_start_value),
    }
}

/// Lifetime return against net capital contributed.
pub fn lifetime_return(
    transactions: &[Transaction],
    total_deposits: Decimal,
    current_total_value: Decimal,
) -> LifetimeReturn {
    let mut net_capital_contributed = total_deposits;
    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Buy if transaction.is_reinvestment => {}
            TransactionKind::Buy => net_capital_contributed += transaction.gross_amount(),
            TransactionKind::Sell => net_capital_contributed -= transaction.gross_amount(),
            TransactionKind::Dividend => net_capital_contributed -= transaction.cash_dividend(),
        }
    }

    let gain = current_total_value - net_capital_contributed;
    LifetimeReturn {
        net_capital_contributed,
        gain,
        return_percent: percent_of(gain, net_capital_contributed),
    }
}

/// Builds a [`PortfolioValuation`] from a transaction log, prices and cash.
///
/// Pure: the same inputs always give the same report. Transactions dated
/// after `as_of` are left out; cash is taken at its current balance.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortfolioValuationCalculator {
    holdings_calculator: HoldingsCalculator,
}

impl PortfolioValuationCalculator {
    pub fn new(method: CostBasisMethod) -> Self {
        Self {
            holdings_calculator: HoldingsCalculator::new(method),
        }
    }

    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self::new(settings.cost_basis_method)
    }

    pub fn calculate(
        &self,
        transactions: &[Transaction],
        prices: &PriceMap,
        cash: &CashLedger,
        as_of: NaiveDate,
    ) -> PortfolioValuation {
        let transactions: Vec<Transaction> = transactions
            .iter()
            .filter(|t| t.date <= as_of)
            .cloned()
            .collect();
        let transactions = transactions.as_slice();
        let replayed = self.holdings_calculator.calculate(transactions);
        let realized_gain = replayed.realized_gain();

        let holdings: Vec<HoldingValuation> = replayed
            .holdings
            .iter()
            .map(|holding| value_holding(holding, prices.get(&holding.symbol)))
            .collect();

        let holdings_value: Decimal = holdings.iter().map(|h| h.current_value).sum();
        let total_cost_basis: Decimal = holdings.iter().map(|h| h.total_cost_basis).sum();
        let day_change: Decimal = holdings.iter().map(|h| h.day_change).sum();
        let cash_balance = cash.balance();
        let total_value = holdings_value + cash_balance;
        let total_gain_loss = holdings_value - total_cost_basis;

        let ytd = ytd_performance(transactions, total_cost_basis, total_value, as_of);
        let lifetime = lifetime_return(transactions, cash.total_deposits(), total_value);

        debug!(
            "Valued {} holding(s) as of {}: total {}, day change {}",
            holdings.len(),
            as_of,
            total_value,
            day_change
        );

        PortfolioValuation {
            as_of,
            holdings,
            holdings_value,
            cash_balance,
            total_value,
            total_cost_basis,
            total_gain_loss,
            total_gain_loss_percent: percent_of(total_gain_loss, total_cost_basis),
            realized_gain,
            day_change,
            day_change_percent: percent_of(day_change, total_value - day_change),
            ytd,
            lifetime,
            warnings: replayed.warnings,
        }
    }
}
