use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::company_info::CompanyInfo;
use crate::models::holding::Holding;
use crate::models::portfolio::Portfolio;
use crate::models::quote::Quote;
use crate::providers::registry::QuoteProviderRegistry;

/// Fetches live quotes from the registered providers.
///
/// Each provider gets exactly one attempt per call. Providers are tried
/// in registration order until one returns a usable price; company info
/// is then taken from the first provider able to supply it.
///
/// A failed fetch is logged at `warn` and returned as `Err`. The caller
/// decides whether that is fatal (adding a stock) or merely leaves data
/// stale (refreshing a holding).
pub struct QuoteService {
    registry: QuoteProviderRegistry,
}

impl QuoteService {
    pub fn new(registry: QuoteProviderRegistry) -> Self {
        Self { registry }
    }

    /// Names of the configured providers, in priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Latest price plus best-effort company metadata for `symbol`.
    pub async fn fetch_quote(&self, symbol: &str) -> Result<Quote, CoreError> {
        let symbol = Holding::normalize_symbol(symbol)?;
        match self.fetch_price(&symbol).await {
            Ok(price) => {
                let info = self.fetch_company_info(&symbol).await;
                Ok(Quote::new(symbol, price, info))
            }
            Err(e) => {
                warn!(%symbol, error = %e, "Error fetching stock data");
                Err(e)
            }
        }
    }

    /// Refresh a holding in place.
    ///
    /// On failure the holding's price and metadata are left untouched.
    /// Returns `Ok(true)` if the fetched quote changed the holding.
    pub async fn refresh_holding(&self, holding: &mut Holding) -> Result<bool, CoreError> {
        let quote = self.fetch_quote(&holding.symbol).await?;
        Ok(holding.apply_quote(&quote))
    }

    /// Refresh every holding one after another, in portfolio order.
    /// Returns how many holdings changed.
    pub async fn refresh_portfolio(&self, portfolio: &mut Portfolio) -> usize {
        let mut changed = 0;
        for holding in portfolio.iter_mut() {
            if let Ok(true) = self.refresh_holding(holding).await {
                changed += 1;
            }
        }
        changed
    }

    /// Try each provider in order; reject non-finite or non-positive prices.
    async fn fetch_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider(format!(
                "no provider configured to quote {symbol}"
            )));
        }

        let mut last_error = None;
        for provider in &providers {
            debug!(provider = provider.name(), %symbol, "Fetching price");
            match provider.get_current_price(symbol).await {
                Ok(price) if price.is_finite() && price > 0.0 => return Ok(price),
                Ok(price) => {
                    last_error = Some(CoreError::Api {
                        provider: provider.name().to_string(),
                        message: format!(
                            "Invalid price returned for {symbol}: {price} (must be finite and positive)"
                        ),
                    });
                }
                Err(e) => {
                    debug!(provider = provider.name(), %symbol, error = %e, "Provider failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::PriceNotAvailable {
            symbol: symbol.to_string(),
        }))
    }

    async fn fetch_company_info(&self, symbol: &str) -> Option<CompanyInfo> {
        for provider in self.registry.providers() {
            match provider.get_company_info(symbol).await {
                Ok(info) if !info.is_empty() => return Some(info),
                Ok(_) => {}
                Err(e) => {
                    debug!(provider = provider.name(), %symbol, error = %e, "No company info");
                }
            }
        }
        None
    }
}
