pub mod allocation;
pub mod holdings;
pub mod income;
pub mod lots;
pub mod performance;
pub mod snapshot;
pub mod valuation;

pub use allocation::{AllocationCalculator, PortfolioAllocation, SectorLookup, StaticSectorTable};
pub use holdings::{build_holding, Holding, HoldingsCalculationResult, HoldingsCalculator};
pub use income::{DividendCalculator, DividendProjection, DividendYield};
pub use lots::{CostBasisMethod, Lot, LotLedger, SaleResult};
pub use performance::{benchmark_metrics, period_metrics, PerformancePeriod};
pub use snapshot::{PortfolioSnapshot, SnapshotHistory};
pub use valuation::{PortfolioValuation, PortfolioValuationCalculator};
