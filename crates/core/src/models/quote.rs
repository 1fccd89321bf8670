use serde::{Deserialize, Serialize};

use super::company_info::CompanyInfo;

/// A successful market-data lookup for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker symbol, uppercased
    pub symbol: String,

    /// Most recent closing/trading price
    pub price: f64,

    /// Company metadata, when any provider could supply it
    pub info: Option<CompanyInfo>,
}

impl Quote {
    pub fn new(symbol: impl Into<String>, price: f64, info: Option<CompanyInfo>) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            price,
            info,
        }
    }
}
