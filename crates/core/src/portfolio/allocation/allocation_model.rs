//! Allocation models for the sector breakdown.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One holding's contribution to a sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorHolding {
    pub symbol: String,
    pub shares: Decimal,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorAllocation {
    pub sector: String,
    /// Total value of the sector's holdings
    pub value: Decimal,
    /// Share of holdings value (0-100)
    pub percentage: Decimal,
    /// Holdings in this sector, sorted by value descending
    pub holdings: Vec<SectorHolding>,
}

impl SectorAllocation {
    pub fn holding_count(&self) -> usize {
        self.holdings.len()
    }
}

/// Sector breakdown of the holdings (cash excluded).
///
/// `diversification_score` is a 0-100 heuristic, not a risk measure: it
/// rewards the number of sectors up to a target, rewards an even spread and
/// penalises any sector above the concentration limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAllocation {
    /// Sorted by value descending
    pub sectors: Vec<SectorAllocation>,
    pub total_value: Decimal,
    pub diversification_score: u32,
}

impl PortfolioAllocation {
    pub fn empty() -> Self {
        Self {
            sectors: Vec::new(),
            total_value: Decimal::ZERO,
            diversification_score: 0,
        }
    }

    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    pub fn sector(&self, name: &str) -> Option<&SectorAllocation> {
        self.sectors.iter().find(|s| s.sector == name)
    }

    /// The largest sector, if any.
    pub fn dominant_sector(&self) -> Option<&SectorAllocation> {
        self.sectors.first()
    }
}
