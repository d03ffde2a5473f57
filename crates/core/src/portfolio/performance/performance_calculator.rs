use chrono::NaiveDate;
use log::debug;
use rust_decimal::{Decimal, MathematicalOps};
use std::collections::HashMap;

use super::performance_model::{
    BenchmarkMetrics, BenchmarkPoint, PerformanceMetrics, PerformancePeriod,
};
use crate::portfolio::snapshot::PortfolioSnapshot;
use crate::utils::decimal_utils::percent_of;

fn change_percent(from: Decimal, to: Decimal) -> Decimal {
    percent_of(to - from, from)
}

fn in_period(snapshots: &[PortfolioSnapshot], period: PerformancePeriod, as_of: NaiveDate) -> Vec<&PortfolioSnapshot> {
    let cutoff = period.cutoff(as_of);
    let mut selected: Vec<&PortfolioSnapshot> = snapshots
        .iter()
        .filter(|s| s.date <= as_of && cutoff.map_or(true, |c| s.date >= c))
        .collect();
    selected.sort_by_key(|s| s.date);
    selected
}

fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().sum::<Decimal>() / Decimal::from(values.len())
}

/// Return, best and worst day, and volatility over the snapshots in `period`.
///
/// Fewer than two snapshots give all zeros. Pairs whose earlier value is not
/// positive are skipped.
pub fn period_metrics(
    snapshots: &[PortfolioSnapshot],
    period: PerformancePeriod,
    as_of: NaiveDate,
) -> PerformanceMetrics {
    let selected = in_period(snapshots, period, as_of);
    let (Some(first), Some(last)) = (selected.first(), selected.last()) else {
        return PerformanceMetrics::default();
    };
    if selected.len() < 2 {
        return PerformanceMetrics::default();
    }

    let daily_returns: Vec<Decimal> = selected
        .windows(2)
        .filter(|pair| pair[0].total_value > Decimal::ZERO)
        .map(|pair| change_percent(pair[0].total_value, pair[1].total_value))
        .collect();

    let volatility = if daily_returns.len() > 1 {
        let avg = mean(&daily_returns);
        let squared: Vec<Decimal> = daily_returns
            .iter()
            .map(|r| (*r - avg) * (*r - avg))
            .collect();
        mean(&squared).sqrt().unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    PerformanceMetrics {
        period_return: change_percent(first.total_value, last.total_value),
        best_day: daily_returns.iter().copied().max().unwrap_or(Decimal::ZERO),
        worst_day: daily_returns.iter().copied().min().unwrap_or(Decimal::ZERO),
        volatility,
        total_days: daily_returns.len(),
    }
}

/// Compares portfolio snapshots with a benchmark over `period`.
///
/// Period returns use each series' own first and last point. Beta and the
/// outperformance count use only dates present in both series.
pub fn benchmark_metrics(
    snapshots: &[PortfolioSnapshot],
    benchmark: &[BenchmarkPoint],
    period: PerformancePeriod,
    as_of: NaiveDate,
) -> BenchmarkMetrics {
    let portfolio = in_period(snapshots, period, as_of);
    let cutoff = period.cutoff(as_of);
    let mut market: Vec<&BenchmarkPoint> = benchmark
        .iter()
        .filter(|p| p.date <= as_of && cutoff.map_or(true, |c| p.date >= c))
        .collect();
    market.sort_by_key(|p| p.date);

    if portfolio.len() < 2 || market.len() < 2 {
        return BenchmarkMetrics::default();
    }

    let portfolio_return = change_percent(
        portfolio[0].total_value,
        portfolio[portfolio.len() - 1].total_value,
    );
    let benchmark_return = change_percent(market[0].price, market[market.len() - 1].price);

    let market_by_date: HashMap<NaiveDate, Decimal> =
        market.iter().map(|p| (p.date, p.price)).collect();
    let aligned: Vec<(Decimal, Decimal)> = portfolio
        .iter()
        .filter_map(|s| market_by_date.get(&s.date).map(|price| (s.total_value, *price)))
        .collect();

    let mut portfolio_returns = Vec::new();
    let mut market_returns = Vec::new();
    for pair in aligned.windows(2) {
        let ((prev_value, prev_price), (value, price)) = (pair[0], pair[1]);
        if prev_value > Decimal::ZERO && prev_price > Decimal::ZERO {
            portfolio_returns.push((value - prev_value) / prev_value);
            market_returns.push((price - prev_price) / prev_price);
        }
    }

    let mut beta = Decimal::ONE;
    if portfolio_returns.len() > 1 {
        let portfolio_mean = mean(&portfolio_returns);
        let market_mean = mean(&market_returns);
        let mut covariance = Decimal::ZERO;
        let mut market_variance = Decimal::ZERO;
        for (p, m) in portfolio_returns.iter().zip(market_returns.iter()) {
            covariance += (*p - portfolio_mean) * (*m - market_mean);
            market_variance += (*m - market_mean) * (*m - market_mean);
        }
        if market_variance > Decimal::ZERO {
            beta = covariance / market_variance;
        }
    }

    let outperformance_days = portfolio_returns
        .iter()
        .zip(market_returns.iter())
        .filter(|(p, m)| p > m)
        .count();

    debug!(
        "Benchmark comparison over {} aligned day(s): alpha {}, beta {}",
        portfolio_returns.len(),
        portfolio_return - benchmark_return,
        beta
    );

    BenchmarkMetrics {
        portfolio_return,
        benchmark_return,
        alpha: portfolio_return - benchmark_return,
        beta,
        outperformance_days,
        total_days: portfolio_returns.len(),
    }
}
