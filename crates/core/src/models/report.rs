use serde::{Deserialize, Serialize};

use super::company_info::CompanyInfo;

/// Computed view of the whole portfolio, one row per holding in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioReport {
    /// Per-holding breakdown
    pub rows: Vec<HoldingRow>,

    /// Sum of every row's cost basis
    pub total_cost: f64,

    /// Sum of every row's market value
    pub total_value: f64,

    /// total_value - total_cost
    pub total_profit_loss: f64,

    /// (total_value / total_cost - 1) * 100, or 0 for an empty portfolio
    pub total_change_pct: f64,
}

/// Derived figures for a single holding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingRow {
    pub symbol: String,
    pub shares: u64,
    pub purchase_price: f64,
    pub purchase_date: chrono::NaiveDate,

    /// Last known price (0.0 if never fetched)
    pub current_price: f64,

    /// shares × purchase_price
    pub cost: f64,

    /// shares × current_price
    pub value: f64,

    /// value - cost
    pub profit_loss: f64,

    /// (current_price / purchase_price - 1) * 100
    pub change_pct: f64,

    /// Whether `current_price` came from a successful fetch at some point
    pub priced: bool,

    pub company_info: CompanyInfo,
}

impl PortfolioReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
