use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::portfolio::Portfolio;
use crate::models::report::{HoldingRow, PortfolioReport};

/// Manages holdings and calculates the profit/loss report.
///
/// Pure business logic: no I/O, no API calls.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Reject a symbol that is already held (case-insensitive).
    pub fn ensure_absent(&self, portfolio: &Portfolio, symbol: &str) -> Result<(), CoreError> {
        if portfolio.contains(symbol) {
            return Err(CoreError::DuplicateHolding(symbol.trim().to_uppercase()));
        }
        Ok(())
    }

    /// Add a new holding. Its symbol must not already be present.
    pub fn add_holding(&self, portfolio: &mut Portfolio, holding: Holding) -> Result<(), CoreError> {
        portfolio
            .insert(holding)
            .map_err(|rejected| CoreError::DuplicateHolding(rejected.symbol))
    }

    /// Remove a holding by symbol (case-insensitive) and return it.
    pub fn remove_holding(&self, portfolio: &mut Portfolio, symbol: &str) -> Result<Holding, CoreError> {
        portfolio
            .remove(symbol)
            .ok_or_else(|| CoreError::HoldingNotFound(symbol.trim().to_uppercase()))
    }

    /// Change the share count and purchase price of an existing holding.
    /// Purchase date, price and metadata are kept.
    pub fn update_holding(
        &self,
        portfolio: &mut Portfolio,
        symbol: &str,
        shares: u64,
        purchase_price: f64,
    ) -> Result<(), CoreError> {
        Holding::validate_position(shares, purchase_price)?;
        let holding = portfolio
            .get_mut(symbol)
            .ok_or_else(|| CoreError::HoldingNotFound(symbol.trim().to_uppercase()))?;
        holding.shares = shares;
        holding.purchase_price = purchase_price;
        Ok(())
    }

    /// Compute cost, value, profit/loss and change for every holding,
    /// in insertion order, using the prices currently held in memory.
    pub fn build_report(&self, portfolio: &Portfolio) -> PortfolioReport {
        let rows: Vec<HoldingRow> = portfolio
            .iter()
            .map(|h| HoldingRow {
                symbol: h.symbol.clone(),
                shares: h.shares,
                purchase_price: h.purchase_price,
                purchase_date: h.purchase_date,
                current_price: h.current_price,
                cost: h.cost_basis(),
                value: h.market_value(),
                profit_loss: h.profit_loss(),
                change_pct: h.change_percent(),
                priced: h.has_price(),
                company_info: h.company_info.clone(),
            })
            .collect();

        let total_cost: f64 = rows.iter().map(|r| r.cost).sum();
        let total_value: f64 = rows.iter().map(|r| r.value).sum();
        let total_change_pct = if total_cost > 0.0 {
            (total_value / total_cost - 1.0) * 100.0
        } else {
            0.0
        };

        PortfolioReport {
            rows,
            total_cost,
            total_value,
            total_profit_loss: total_value - total_cost,
            total_change_pct,
        }
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
