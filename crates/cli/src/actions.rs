use stock_tracker_core::errors::CoreError;
use stock_tracker_core::StockTracker;

use crate::render;

/// Add a holding and announce it.
pub(crate) async fn add(
    tracker: &mut StockTracker,
    symbol: &str,
    shares: u64,
    price: f64,
) -> Result<(), String> {
    match tracker.add_stock(symbol, shares, price).await {
        Ok(holding) => {
            println!(
                "Added {} shares of {} at ${:.2} per share",
                holding.shares, holding.symbol, holding.purchase_price
            );
            Ok(())
        }
        Err(e) => Err(explain(&e, symbol)),
    }
}

pub(crate) fn remove(tracker: &mut StockTracker, symbol: &str) -> Result<(), String> {
    match tracker.remove_stock(symbol) {
        Ok(removed) => {
            println!("Removed {} from portfolio", removed.symbol);
            Ok(())
        }
        Err(e) => Err(explain(&e, symbol)),
    }
}

pub(crate) fn update(
    tracker: &mut StockTracker,
    symbol: &str,
    shares: u64,
    price: f64,
) -> Result<(), String> {
    match tracker.update_stock(symbol, shares, price) {
        Ok(holding) => {
            println!(
                "Updated {}: {} shares at ${:.2} per share",
                holding.symbol, holding.shares, holding.purchase_price
            );
            Ok(())
        }
        Err(e) => Err(explain(&e, symbol)),
    }
}

/// Print the portfolio, refreshing prices first unless `offline`.
pub(crate) async fn view(tracker: &mut StockTracker, offline: bool) {
    let report = if offline {
        tracker.cached_report()
    } else {
        tracker.portfolio_report().await
    };
    print!("{}", render::portfolio(&report));
}

/// Turn a library error into the message shown to the user.
pub(crate) fn explain(error: &CoreError, symbol: &str) -> String {
    let symbol = symbol.trim().to_uppercase();
    if error.is_fetch_error() {
        format!("Error: Could not verify stock {symbol}. Please check the symbol and try again.")
    } else if error.is_persistence_error() {
        format!("Error saving portfolio: {error}")
    } else {
        match error {
            CoreError::DuplicateHolding(_) | CoreError::HoldingNotFound(_) => error.to_string(),
            other => format!("Error: {other}"),
        }
    }
}
