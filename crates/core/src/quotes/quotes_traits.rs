use async_trait::async_trait;

use super::quotes_errors::QuoteError;
use super::quotes_model::PriceQuote;

/// Source of current prices, such as a market data API.
#[async_trait]
pub trait PriceProviderTrait: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn fetch_current_price(&self, symbol: &str) -> Result<PriceQuote, QuoteError>;
}
