use std::collections::HashMap;

use crate::transactions::normalize_symbol;

/// Maps a ticker to its sector. Sector data is reference data supplied from
/// outside the engine.
pub trait SectorLookup {
    fn sector_for(&self, symbol: &str) -> Option<&str>;
}

impl SectorLookup for HashMap<String, String> {
    fn sector_for(&self, symbol: &str) -> Option<&str> {
        self.get(&normalize_symbol(symbol)).map(String::as_str)
    }
}

/// Hand-maintained ticker table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticSectorTable {
    sectors: HashMap<String, String>,
}

const BUILT_IN_SECTORS: &[(&str, &[&str])] = &[
    (
        "Technology",
        &[
            "AAPL", "MSFT", "GOOGL", "GOOG", "META", "TSLA", "NVDA", "AMD", "INTC", "ORCL", "CRM",
            "ADBE", "PYPL", "UBER", "SQ", "ZM", "DOCU",
        ],
    ),
    (
        "Healthcare",
        &[
            "JNJ", "PFE", "UNH", "ABBV", "MRK", "TMO", "ABT", "LLY", "BMY", "AMGN", "GILD", "CVS",
            "REGN", "VRTX", "MRNA",
        ],
    ),
    (
        "Financial",
        &[
            "BRK.A", "BRK.B", "JPM", "BAC", "WFC", "GS", "MS", "C", "AXP", "BLK", "SPGI", "SCHW",
            "PNC", "USB",
        ],
    ),
    (
        "Consumer Discretionary",
        &[
            "AMZN", "HD", "MCD", "NKE", "SBUX", "LOW", "TJX", "BKNG", "CMG", "DIS", "F", "GM",
        ],
    ),
    (
        "Consumer Staples",
        &["WMT", "PG", "KO", "PEP", "COST", "CL", "KMB", "GIS", "HSY"],
    ),
    (
        "Energy",
        &["XOM", "CVX", "COP", "EOG", "SLB", "PSX", "VLO", "MPC", "OXY"],
    ),
    (
        "Industrials",
        &["BA", "GE", "CAT", "MMM", "HON", "UPS", "LMT", "RTX", "DE", "FDX"],
    ),
    ("Materials", &["LIN", "APD", "SHW", "FCX", "NEM", "DOW", "DD"]),
    ("Utilities", &["NEE", "DUK", "SO", "D", "AEP", "EXC", "XEL"]),
    ("Real Estate", &["AMT", "PLD", "CCI", "EQIX", "PSA", "DLR", "O"]),
    (
        "Communication Services",
        &["T", "VZ", "CMCSA", "CHTR", "TMUS", "NFLX", "SPOT", "ROKU"],
    ),
];

impl StaticSectorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table preloaded with common US large caps.
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for (sector, symbols) in BUILT_IN_SECTORS {
            for symbol in *symbols {
                table.insert(symbol, sector);
            }
        }
        table
    }

    /// Adds or replaces a mapping.
    pub fn insert(&mut self, symbol: &str, sector: &str) {
        self.sectors
            .insert(normalize_symbol(symbol), sector.trim().to_string());
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

impl SectorLookup for StaticSectorTable {
    fn sector_for(&self, symbol: &str) -> Option<&str> {
        self.sectors.sector_for(symbol)
    }
}
