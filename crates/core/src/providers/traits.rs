use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::company_info::CompanyInfo;

/// Trait abstraction for market-data providers.
///
/// Each upstream API (Yahoo Finance, Alpha Vantage) implements this trait.
/// A provider makes a single best-effort attempt per call: no retries,
/// no rate-limit handling.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Latest closing/trading price for `symbol`.
    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError>;

    /// Descriptive metadata for `symbol`.
    ///
    /// Providers without a metadata endpoint keep the default, which
    /// reports the lookup as unsupported.
    async fn get_company_info(&self, symbol: &str) -> Result<CompanyInfo, CoreError> {
        Err(CoreError::Api {
            provider: self.name().to_string(),
            message: format!("Company information for {symbol} is not supported"),
        })
    }
}
