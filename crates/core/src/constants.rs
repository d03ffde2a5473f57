/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Quantity threshold for significant lots and positions
pub const QUANTITY_THRESHOLD: &str = "0.00000001";

/// Sector used when a symbol has no entry in the sector lookup
pub const UNCLASSIFIED_SECTOR: &str = "Other";

/// Default number of portfolio snapshots retained (two years of daily snapshots)
pub const DEFAULT_SNAPSHOT_RETENTION: usize = 730;

/// Default trailing window used to derive dividend rates
pub const DEFAULT_DIVIDEND_LOOKBACK_MONTHS: u32 = 12;

/// Number of sectors considered fully diversified
pub const DEFAULT_IDEAL_SECTOR_COUNT: usize = 8;

/// Sector weight (percent) above which the diversification score is penalised
pub const DEFAULT_SECTOR_CONCENTRATION_LIMIT: u32 = 40;

/// Dividend yield (percent) above which a yield is flagged unreliable
pub const DEFAULT_YIELD_WARNING_THRESHOLD: u32 = 15;

/// Dividend yield (percent) above which a yield is discarded as bad data
pub const DEFAULT_YIELD_REJECTION_THRESHOLD: u32 = 50;

/// Delay between consecutive price fetches
pub const DEFAULT_PRICE_FETCH_DELAY_MS: u64 = 250;
