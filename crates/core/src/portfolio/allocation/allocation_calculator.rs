use log::debug;
use num_traits::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::collections::HashMap;

use super::allocation_model::{PortfolioAllocation, SectorAllocation, SectorHolding};
use super::sector_lookup::SectorLookup;
use crate::constants::{
    DEFAULT_IDEAL_SECTOR_COUNT, DEFAULT_SECTOR_CONCENTRATION_LIMIT, UNCLASSIFIED_SECTOR,
};
use crate::portfolio::valuation::HoldingValuation;
use crate::settings::EngineSettings;
use crate::utils::decimal_utils::percent_of;

const SECTOR_COUNT_WEIGHT: Decimal = dec!(60);
const BALANCE_WEIGHT: Decimal = dec!(40);
const VARIANCE_SCALE: Decimal = dec!(50);

/// Groups valued holdings by sector and scores how spread out they are.
#[derive(Debug, Clone, Copy)]
pub struct AllocationCalculator {
    ideal_sector_count: usize,
    concentration_limit: Decimal,
}

impl Default for AllocationCalculator {
    fn default() -> Self {
        Self {
            ideal_sector_count: DEFAULT_IDEAL_SECTOR_COUNT,
            concentration_limit: Decimal::from(DEFAULT_SECTOR_CONCENTRATION_LIMIT),
        }
    }
}

impl AllocationCalculator {
    pub fn new(ideal_sector_count: usize, concentration_limit: Decimal) -> Self {
        Self {
            ideal_sector_count: ideal_sector_count.max(1),
            concentration_limit,
        }
    }

    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self::new(settings.ideal_sector_count, settings.sector_concentration_limit)
    }

    /// Holdings without a sector mapping fall under "Other". Each holding
    /// counts at its valued price, which is average cost when unquoted.
    pub fn calculate(
        &self,
        holdings: &[HoldingValuation],
        lookup: &dyn SectorLookup,
    ) -> PortfolioAllocation {
        let mut by_sector: HashMap<String, Vec<SectorHolding>> = HashMap::new();
        for holding in holdings.iter().filter(|h| h.shares > Decimal::ZERO) {
            let sector = lookup
                .sector_for(&holding.symbol)
                .unwrap_or(UNCLASSIFIED_SECTOR)
                .to_string();
            by_sector.entry(sector).or_default().push(SectorHolding {
                symbol: holding.symbol.clone(),
                shares: holding.shares,
                value: holding.current_value,
            });
        }

        if by_sector.is_empty() {
            return PortfolioAllocation::empty();
        }

        let total_value: Decimal = by_sector
            .values()
            .flat_map(|holdings| holdings.iter().map(|h| h.value))
            .sum();

        let mut sectors: Vec<SectorAllocation> = by_sector
            .into_iter()
            .map(|(sector, mut holdings)| {
                holdings.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.symbol.cmp(&b.symbol)));
                let value: Decimal = holdings.iter().map(|h| h.value).sum();
                SectorAllocation {
                    sector,
                    value,
                    percentage: percent_of(value, total_value),
                    holdings,
                }
            })
            .collect();
        sectors.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.sector.cmp(&b.sector)));

        let percentages: Vec<Decimal> = sectors.iter().map(|s| s.percentage).collect();
        let diversification_score = self.diversification_score(&percentages);
        debug!(
            "{} sector(s), diversification score {}",
            sectors.len(),
            diversification_score
        );

        PortfolioAllocation {
            sectors,
            total_value,
            diversification_score,
        }
    }

    /// Scores sector weights (percentages of the total) from 0 to 100.
    ///
    /// `min(n / ideal, 1) × 60` for breadth, plus `max(0, 40 − variance / 50)`
    /// for evenness, minus how far the largest sector exceeds the
    /// concentration limit. Clamped and rounded to a whole number.
    pub fn diversification_score(&self, percentages: &[Decimal]) -> u32 {
        if percentages.is_empty() {
            return 0;
        }
        let count = Decimal::from(percentages.len());

        let breadth = (count / Decimal::from(self.ideal_sector_count)).min(Decimal::ONE);
        let count_score = breadth * SECTOR_COUNT_WEIGHT;

        let largest = percentages.iter().copied().max().unwrap_or(Decimal::ZERO);
        let concentration_penalty = (largest - self.concentration_limit).max(Decimal::ZERO);

        let even_share = Decimal::ONE_HUNDRED / count;
        let variance = percentages
            .iter()
            .map(|p| (*p - even_share) * (*p - even_share))
            .sum::<Decimal>()
            / count;
        let balance_bonus = (BALANCE_WEIGHT - variance / VARIANCE_SCALE).max(Decimal::ZERO);

        let score = (count_score + balance_bonus - concentration_penalty)
            .max(Decimal::ZERO)
            .min(Decimal::ONE_HUNDRED);
        score
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(0)
    }
}
