use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::transactions::normalize_symbol;

/// Latest price for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub symbol: String,
    pub price: Decimal,
    /// Prior session close. Missing closes are treated as "no change today".
    #[serde(default)]
    pub previous_close: Option<Decimal>,
    pub fetched_at: DateTime<Utc>,
}

impl PriceQuote {
    pub fn new(symbol: &str, price: Decimal, previous_close: Option<Decimal>) -> Self {
        PriceQuote {
            symbol: normalize_symbol(symbol),
            price,
            previous_close,
            fetched_at: Utc::now(),
        }
    }

    /// Previous close, falling back to the current price.
    pub fn effective_previous_close(&self) -> Decimal {
        self.previous_close
            .filter(|close| *close > Decimal::ZERO)
            .unwrap_or(self.price)
    }
}

/// Current prices keyed by uppercase symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceMap {
    quotes: HashMap<String, PriceQuote>,
}

impl PriceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, quote: PriceQuote) {
        self.quotes.insert(normalize_symbol(&quote.symbol), quote);
    }

    /// Only positive prices count as known.
    pub fn get(&self, symbol: &str) -> Option<&PriceQuote> {
        self.quotes
            .get(&normalize_symbol(symbol))
            .filter(|quote| quote.price > Decimal::ZERO)
    }

    pub fn price(&self, symbol: &str) -> Option<Decimal> {
        self.get(symbol).map(|quote| quote.price)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl FromIterator<PriceQuote> for PriceMap {
    fn from_iter<T: IntoIterator<Item = PriceQuote>>(iter: T) -> Self {
        let mut map = PriceMap::new();
        for quote in iter {
            map.insert(quote);
        }
        map
    }
}
