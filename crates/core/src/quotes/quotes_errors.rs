//! Price feed error types.

use thiserror::Error;

/// Failures reported by a price provider.
///
/// None of these stop a valuation: a symbol whose price could not be fetched
/// is valued at its average cost and flagged as estimated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    /// The provider has no price for the symbol.
    #[error("Price unavailable for {0}")]
    PriceUnavailable(String),

    /// The provider refused the request because of rate limiting.
    #[error("Rate limited while fetching {0}")]
    RateLimited(String),

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },
}

impl QuoteError {
    /// Rate limits clear on their own; the other failures will not.
    pub fn is_transient(&self) -> bool {
        matches!(self, QuoteError::RateLimited(_))
    }
}
