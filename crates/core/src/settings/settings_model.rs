//! Engine configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::*;
use crate::errors::{Error, Result};
use crate::portfolio::lots::CostBasisMethod;

/// Tunables for the valuation engine. Every field has a default, so a partial
/// JSON document (or `{}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    /// Lot relief method used when replaying sells.
    pub cost_basis_method: CostBasisMethod,
    /// Maximum number of portfolio snapshots kept in history.
    pub snapshot_retention: usize,
    /// Trailing window of dividend transactions used for yield estimates.
    pub dividend_lookback_months: u32,
    pub ideal_sector_count: usize,
    /// Percent of portfolio value a single sector may hold before penalties.
    pub sector_concentration_limit: Decimal,
    pub yield_warning_threshold: Decimal,
    pub yield_rejection_threshold: Decimal,
    pub price_fetch_delay_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            cost_basis_method: CostBasisMethod::default(),
            snapshot_retention: DEFAULT_SNAPSHOT_RETENTION,
            dividend_lookback_months: DEFAULT_DIVIDEND_LOOKBACK_MONTHS,
            ideal_sector_count: DEFAULT_IDEAL_SECTOR_COUNT,
            sector_concentration_limit: Decimal::from(DEFAULT_SECTOR_CONCENTRATION_LIMIT),
            yield_warning_threshold: Decimal::from(DEFAULT_YIELD_WARNING_THRESHOLD),
            yield_rejection_threshold: Decimal::from(DEFAULT_YIELD_REJECTION_THRESHOLD),
            price_fetch_delay_ms: DEFAULT_PRICE_FETCH_DELAY_MS,
        }
    }
}

impl EngineSettings {
    /// Parses settings from JSON and validates them.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: EngineSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.snapshot_retention == 0 {
            return Err(Error::InvalidConfigValue(
                "snapshotRetention must be at least 1".to_string(),
            ));
        }
        if self.dividend_lookback_months == 0 {
            return Err(Error::InvalidConfigValue(
                "dividendLookbackMonths must be at least 1".to_string(),
            ));
        }
        if self.ideal_sector_count == 0 {
            return Err(Error::InvalidConfigValue(
                "idealSectorCount must be at least 1".to_string(),
            ));
        }
        if self.sector_concentration_limit <= Decimal::ZERO
            || self.sector_concentration_limit > Decimal::ONE_HUNDRED
        {
            return Err(Error::InvalidConfigValue(format!(
                "sectorConcentrationLimit must be within (0, 100], got {}",
                self.sector_concentration_limit
            )));
        }
        if self.yield_warning_threshold <= Decimal::ZERO
            || self.yield_warning_threshold > self.yield_rejection_threshold
        {
            return Err(Error::InvalidConfigValue(format!(
                "yield thresholds out of order: warning {} / rejection {}",
                self.yield_warning_threshold, self.yield_rejection_threshold
            )));
        }
        Ok(())
    }

    pub fn price_fetch_delay(&self) -> Duration {
        Duration::from_millis(self.price_fetch_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_json_yields_defaults() {
        let settings = EngineSettings::from_json("{}").unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.snapshot_retention, 730);
        assert_eq!(settings.cost_basis_method, CostBasisMethod::Fifo);
    }

    #[test]
    fn test_partial_json_overrides_fields() {
        let settings = EngineSettings::from_json(
            r#"{"costBasisMethod":"LIFO","snapshotRetention":30,"priceFetchDelayMs":0}"#,
        )
        .unwrap();
        assert_eq!(settings.cost_basis_method, CostBasisMethod::Lifo);
        assert_eq!(settings.snapshot_retention, 30);
        assert_eq!(settings.price_fetch_delay(), Duration::ZERO);
        assert_eq!(settings.ideal_sector_count, 8);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(EngineSettings::from_json(r#"{"snapshotRetention":0}"#).is_err());
        assert!(EngineSettings::from_json(r#"{"costBasisMethod":"HIFO"}"#).is_err());

        let settings = EngineSettings {
            yield_warning_threshold: dec!(60),
            ..EngineSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(Error::InvalidConfigValue(_))
        ));
    }
}
