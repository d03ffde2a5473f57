use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Look-back window for performance figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "days")]
pub enum PerformancePeriod {
    /// The last N calendar days up to the as-of date.
    Days(u32),
    All,
}

impl PerformancePeriod {
    /// First date inside the window, or `None` for the whole history. A
    /// window reaching past the earliest representable date starts there.
    pub fn cutoff(&self, as_of: NaiveDate) -> Option<NaiveDate> {
        match self {
            PerformancePeriod::Days(days) => Some(
                as_of
                    .checked_sub_signed(Duration::days(i64::from(*days)))
                    .unwrap_or(NaiveDate::MIN),
            ),
            PerformancePeriod::All => None,
        }
    }
}

/// Figures over a run of snapshots. Daily returns are percentages between
/// consecutive snapshots.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub period_return: Decimal,
    pub best_day: Decimal,
    pub worst_day: Decimal,
    /// Population standard deviation of the daily returns.
    pub volatility: Decimal,
    /// Number of daily returns observed.
    pub total_days: usize,
}

/// Closing level of a benchmark index on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkPoint {
    pub date: NaiveDate,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkMetrics {
    pub portfolio_return: Decimal,
    pub benchmark_return: Decimal,
    /// Portfolio return minus benchmark return, in percentage points.
    pub alpha: Decimal,
    /// Covariance of daily returns over benchmark variance; 1 when undefined.
    pub beta: Decimal,
    pub outperformance_days: usize,
    pub total_days: usize,
}

impl Default for BenchmarkMetrics {
    fn default() -> Self {
        BenchmarkMetrics {
            portfolio_return: Decimal::ZERO,
            benchmark_return: Decimal::ZERO,
            alpha: Decimal::ZERO,
            beta: Decimal::ONE,
            outperformance_days: 0,
            total_days: 0,
        }
    }
}
