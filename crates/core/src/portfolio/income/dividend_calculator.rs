use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use super::income_model::{
    DividendCalendarEntry, DividendIncomeSummary, DividendProjection, DividendYield,
    MonthlyProjection, PortfolioDividendMetrics, SymbolDividendIncome,
};
use crate::constants::{
    DEFAULT_DIVIDEND_LOOKBACK_MONTHS, DEFAULT_YIELD_REJECTION_THRESHOLD,
    DEFAULT_YIELD_WARNING_THRESHOLD,
};
use crate::portfolio::valuation::HoldingValuation;
use crate::quotes::PriceMap;
use crate::settings::EngineSettings;
use crate::transactions::{normalize_symbol, shares_held_at, Transaction};
use crate::utils::decimal_utils::percent_of;
use crate::utils::time_utils::{add_months, start_of_year, subtract_months};

/// Share of a quarterly payment booked in a quarter-end month.
const PAYMENT_MONTH_WEIGHT: Decimal = dec!(1.0);
/// Share booked in the other months.
const OFF_MONTH_WEIGHT: Decimal = dec!(0.33);
const QUARTERS_PER_YEAR: Decimal = dec!(4);
const MONTHS_PER_YEAR: Decimal = dec!(12);
/// Calendar entries below this amount are left out.
const CALENDAR_MIN_AMOUNT: Decimal = dec!(1);

/// `annual_dividend_per_share / average_cost × 100`, or `None` when either
/// input is not positive.
pub fn yield_on_cost(annual_dividend_per_share: Decimal, average_cost: Decimal) -> Option<Decimal> {
    if annual_dividend_per_share <= Decimal::ZERO || average_cost <= Decimal::ZERO {
        return None;
    }
    Some(annual_dividend_per_share / average_cost * Decimal::ONE_HUNDRED)
}

/// Totals every dividend dated on or before `as_of`.
pub fn income_summary(transactions: &[Transaction], as_of: NaiveDate) -> DividendIncomeSummary {
    let year_start = start_of_year(as_of);
    let mut summary = DividendIncomeSummary::default();
    let mut by_symbol: HashMap<&str, SymbolDividendIncome> = HashMap::new();

    for dividend in transactions
        .iter()
        .filter(|t| t.is_dividend() && t.date <= as_of)
    {
        let amount = dividend.gross_amount();
        let entry = by_symbol
            .entry(dividend.symbol.as_str())
            .or_insert_with(|| SymbolDividendIncome {
                symbol: dividend.symbol.clone(),
                ..SymbolDividendIncome::default()
            });
        entry.total += amount;
        entry.payments += 1;
        summary.total += amount;

        if dividend.reinvested {
            entry.reinvested += amount;
            summary.reinvested += amount;
        } else {
            entry.cash += amount;
            summary.cash += amount;
        }
        if dividend.date >= year_start {
            summary.year_to_date += amount;
        }
        *summary
            .by_month
            .entry(dividend.date.format("%Y-%m").to_string())
            .or_insert(Decimal::ZERO) += amount;
    }

    summary.by_symbol = by_symbol.into_values().collect();
    summary
        .by_symbol
        .sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.symbol.cmp(&b.symbol)));
    summary
}

/// Derives dividend rates from recorded dividends.
#[derive(Debug, Clone, Copy)]
pub struct DividendCalculator {
    lookback_months: u32,
    warning_threshold: Decimal,
    rejection_threshold: Decimal,
}

impl Default for DividendCalculator {
    fn default() -> Self {
        Self {
            lookback_months: DEFAULT_DIVIDEND_LOOKBACK_MONTHS,
            warning_threshold: Decimal::from(DEFAULT_YIELD_WARNING_THRESHOLD),
            rejection_threshold: Decimal::from(DEFAULT_YIELD_REJECTION_THRESHOLD),
        }
    }
}

impl DividendCalculator {
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            lookback_months: settings.dividend_lookback_months,
            warning_threshold: settings.yield_warning_threshold,
            rejection_threshold: settings.yield_rejection_threshold,
        }
    }

    /// Trailing yield for one symbol as of `as_of`.
    ///
    /// Each dividend in the look-back window gives `amount / shares held on
    /// its date`; those per-share figures are averaged with the dividend
    /// amounts as weights. The reinvestment buy a dividend paid for is not
    /// counted in the shares that earned it. Yields above the warning
    /// threshold are flagged unreliable and yields above the rejection
    /// threshold are zeroed.
    pub fn dividend_yield(
        &self,
        symbol: &str,
        transactions: &[Transaction],
        current_shares: Decimal,
        current_price: Option<Decimal>,
        as_of: NaiveDate,
    ) -> DividendYield {
        let symbol = normalize_symbol(symbol);
        let window_start = subtract_months(as_of, self.lookback_months).unwrap_or(NaiveDate::MIN);

        let mut trailing_dividends = Decimal::ZERO;
        let mut weighted_sum = Decimal::ZERO;
        let mut total_weight = Decimal::ZERO;
        let mut dividends_counted = 0;

        for dividend in transactions.iter().filter(|t| {
            t.is_dividend() && t.symbol == symbol && t.date >= window_start && t.date <= as_of
        }) {
            let amount = dividend.gross_amount();
            trailing_dividends += amount;
            dividends_counted += 1;

            // The buy this dividend paid for did not earn it, so its shares are left out.
            let earning_transactions = transactions
                .iter()
                .filter(|t| t.dividend_transaction_id.as_deref() != Some(dividend.id.as_str()));
            let shares_then = shares_held_at(earning_transactions, &symbol, dividend.date);
            if shares_then > Decimal::ZERO {
                let per_share = amount / shares_then;
                weighted_sum += per_share * amount;
                total_weight += amount;
            } else {
                debug!(
                    "Dividend {} for {} on {} has no shares behind it",
                    dividend.id, symbol, dividend.date
                );
            }
        }

        let mut annual_dividend_per_share = if total_weight > Decimal::ZERO {
            weighted_sum / total_weight
        } else {
            Decimal::ZERO
        };
        let price = current_price.filter(|p| *p > Decimal::ZERO);
        let mut dividend_yield = price.map_or(Decimal::ZERO, |p| {
            annual_dividend_per_share / p * Decimal::ONE_HUNDRED
        });

        let mut is_reliable = true;
        if dividend_yield > self.warning_threshold {
            warn!("Suspicious dividend yield for {}: {}%", symbol, dividend_yield.round_dp(2));
            is_reliable = false;
        }
        if dividend_yield > self.rejection_threshold {
            warn!(
                "Discarding dividend yield for {}: {}% is above {}%",
                symbol,
                dividend_yield.round_dp(2),
                self.rejection_threshold
            );
            dividend_yield = Decimal::ZERO;
            annual_dividend_per_share = Decimal::ZERO;
        }

        DividendYield {
            symbol,
            shares: current_shares,
            current_price: price,
            annual_dividend_per_share,
            dividend_yield,
            trailing_dividends,
            dividends_counted,
            projected_annual_income: current_shares * annual_dividend_per_share,
            is_reliable,
        }
    }

    /// Yields for each held position. Prices come from the quote map only;
    /// unquoted holdings get a zero yield.
    pub fn dividend_yields(
        &self,
        transactions: &[Transaction],
        holdings: &[HoldingValuation],
        prices: &PriceMap,
        as_of: NaiveDate,
    ) -> Vec<DividendYield> {
        holdings
            .iter()
            .filter(|h| h.shares > Decimal::ZERO)
            .map(|h| {
                self.dividend_yield(&h.symbol, transactions, h.shares, prices.price(&h.symbol), as_of)
            })
            .collect()
    }

    /// Market-value-weighted yield and total projected income.
    pub fn portfolio_metrics(
        &self,
        transactions: &[Transaction],
        holdings: &[HoldingValuation],
        prices: &PriceMap,
        as_of: NaiveDate,
    ) -> PortfolioDividendMetrics {
        let yields = self.dividend_yields(transactions, holdings, prices, as_of);

        let mut total_value = Decimal::ZERO;
        let mut weighted_yield_sum = Decimal::ZERO;
        let mut total_annual_income = Decimal::ZERO;
        let mut dividend_payers = 0;
        for dividend_yield in &yields {
            let value = dividend_yield.shares * dividend_yield.current_price.unwrap_or(Decimal::ZERO);
            total_value += value;
            weighted_yield_sum += dividend_yield.dividend_yield * value;
            total_annual_income += dividend_yield.projected_annual_income;
            if dividend_yield.dividend_yield > Decimal::ZERO {
                dividend_payers += 1;
            }
        }

        PortfolioDividendMetrics {
            average_yield: if total_value > Decimal::ZERO {
                weighted_yield_sum / total_value
            } else {
                Decimal::ZERO
            },
            total_annual_income,
            dividend_payers,
            yields,
        }
    }

    /// Spreads projected annual income over `months` months from `start`.
    ///
    /// Quarter-end months (March, June, September, December) book a full
    /// quarter of income; other months book 0.33 of a quarter.
    pub fn project(
        &self,
        yields: &[DividendYield],
        months: u32,
        start: NaiveDate,
        total_portfolio_value: Decimal,
    ) -> DividendProjection {
        let mut monthly = Vec::with_capacity(months as usize);
        let mut calendar = Vec::new();
        let mut cumulative = Decimal::ZERO;

        for month_offset in 0..months {
            let Some(date) = add_months(start, month_offset) else {
                warn!("Projection stops at month {}: date out of range", month_offset);
                break;
            };
            let weight = if date.month() % 3 == 0 {
                PAYMENT_MONTH_WEIGHT
            } else {
                OFF_MONTH_WEIGHT
            };

            let mut amount = Decimal::ZERO;
            for dividend_yield in yields.iter().filter(|y| y.shares > Decimal::ZERO) {
                let income = dividend_yield.projected_annual_income * weight / QUARTERS_PER_YEAR;
                amount += income;
                if income > CALENDAR_MIN_AMOUNT {
                    calendar.push(DividendCalendarEntry {
                        symbol: dividend_yield.symbol.clone(),
                        date,
                        amount: income,
                        shares: dividend_yield.shares,
                        estimated_per_share: income / dividend_yield.shares,
                    });
                }
            }

            cumulative += amount;
            monthly.push(MonthlyProjection {
                month_offset,
                date,
                amount,
                cumulative,
            });
        }

        let period_months = monthly.len() as u32;
        let annualized_income = if period_months > 0 {
            cumulative * MONTHS_PER_YEAR / Decimal::from(period_months)
        } else {
            Decimal::ZERO
        };

        DividendProjection {
            period_months,
            monthly,
            calendar,
            expected_period_income: cumulative,
            annualized_income,
            average_quarterly_payment: annualized_income / QUARTERS_PER_YEAR,
            portfolio_yield: percent_of(annualized_income, total_portfolio_value),
        }
    }
}
