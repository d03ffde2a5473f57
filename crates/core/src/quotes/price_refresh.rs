use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::quotes_errors::QuoteError;
use super::quotes_model::PriceMap;
use super::quotes_traits::PriceProviderTrait;
use crate::transactions::normalize_symbol;

/// Prices that were fetched plus the symbols that failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRefreshResult {
    pub prices: PriceMap,
    pub failures: Vec<PriceRefreshFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRefreshFailure {
    pub symbol: String,
    pub error: String,
    pub transient: bool,
}

impl PriceRefreshResult {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fetches prices one symbol at a time, pausing `delay` between requests to
/// stay under provider rate limits.
///
/// Failures are collected rather than returned so the caller can value the
/// affected holdings at cost.
pub async fn refresh_prices(
    provider: &dyn PriceProviderTrait,
    symbols: &[String],
    delay: Duration,
) -> PriceRefreshResult {
    let mut result = PriceRefreshResult::default();

    for (index, raw_symbol) in symbols.iter().enumerate() {
        if index > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let symbol = normalize_symbol(raw_symbol);

        match provider.fetch_current_price(&symbol).await {
            Ok(quote) if quote.price > rust_decimal::Decimal::ZERO => {
                debug!("{} quoted {} at {}", provider.name(), symbol, quote.price);
                result.prices.insert(quote);
            }
            Ok(quote) => {
                let error = QuoteError::PriceUnavailable(symbol.clone());
                warn!(
                    "{} returned a non-positive price {} for {}",
                    provider.name(),
                    quote.price,
                    symbol
                );
                result.failures.push(PriceRefreshFailure {
                    symbol,
                    error: error.to_string(),
                    transient: false,
                });
            }
            Err(e) => {
                warn!("{} could not price {}: {}", provider.name(), symbol, e);
                result.failures.push(PriceRefreshFailure {
                    symbol,
                    error: e.to_string(),
                    transient: e.is_transient(),
                });
            }
        }
    }

    info!(
        "Price refresh via {}: {} fetched, {} failed",
        provider.name(),
        result.prices.len(),
        result.failures.len()
    );
    result
}
